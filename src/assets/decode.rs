use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::ShotResult;
use crate::foundation::math::premultiply_rgba8_in_place;

/// Where a bitmap's bytes came from.
///
/// Cross-origin bitmaps may be drawn, but a raster that contains one cannot be exported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Origin {
    /// Read from the local asset root or handed over in memory by the caller.
    #[default]
    Local,
    /// Obtained from a foreign origin.
    CrossOrigin,
}

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Provenance, used to taint exports.
    pub origin: Origin,
}

impl Bitmap {
    /// Build from straight-alpha RGBA8 pixels.
    pub fn from_rgba8_straight(width: u32, height: u32, mut rgba: Vec<u8>) -> ShotResult<Self> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return Err(crate::ShotError::asset("bitmap byte len mismatch"));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
            origin: Origin::Local,
        })
    }

    /// Same pixels with a different provenance.
    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// Decode any format supported by the `image` crate into a premultiplied [`Bitmap`].
pub fn decode_image(bytes: &[u8]) -> ShotResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Bitmap::from_rgba8_straight(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
