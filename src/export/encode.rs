use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{ShotError, ShotResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::compositor::Raster;

/// Output container for exported frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// JPEG at `quality` (1..=100). Alpha is dropped.
    Jpeg {
        /// Encoder quality.
        quality: u8,
    },
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOpts {
    pub(crate) format: ExportFormat,
    pub(crate) scale: f64,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            scale: 1.0,
        }
    }
}

impl ExportOpts {
    /// Return options with the given container.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Return options resizing the frame by `scale` before encoding.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Configured container.
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Configured scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn validate(&self) -> ShotResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ShotError::validation("export scale must be finite and > 0"));
        }
        if let ExportFormat::Jpeg { quality } = self.format
            && !(1..=100).contains(&quality)
        {
            return Err(ShotError::validation("jpeg quality must be in 1..=100"));
        }
        Ok(())
    }
}

/// Pixel size of `raster` after applying `scale`.
pub fn scaled_size(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (f64::from(width) * scale).round().max(1.0) as u32;
    let h = (f64::from(height) * scale).round().max(1.0) as u32;
    (w, h)
}

/// Encode `raster` to image bytes.
///
/// A tainted raster cannot be read back; it yields an empty buffer and a warning instead of an
/// error, so callers can surface "export unavailable" without aborting.
#[tracing::instrument(skip(raster), fields(width = raster.width, height = raster.height))]
pub fn encode_raster(raster: &Raster, opts: &ExportOpts) -> ShotResult<Vec<u8>> {
    opts.validate()?;
    if raster.tainted {
        tracing::warn!("frame contains cross-origin pixels, export refused");
        return Ok(Vec::new());
    }

    let mut straight = raster.data.clone();
    unpremultiply_rgba8_in_place(&mut straight);
    let mut img = image::RgbaImage::from_raw(raster.width, raster.height, straight)
        .ok_or_else(|| ShotError::render("raster byte len does not match its size"))?;

    let (w, h) = scaled_size(raster.width, raster.height, opts.scale);
    if (w, h) != (raster.width, raster.height) {
        img = image::imageops::resize(&img, w, h, image::imageops::FilterType::Lanczos3);
    }

    let mut buf = Vec::new();
    match opts.format {
        ExportFormat::Png => {
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .context("encode png")?;
        }
        ExportFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
                .encode_image(&rgb)
                .context("encode jpeg")?;
        }
    }
    tracing::debug!(bytes = buf.len(), out_w = w, out_h = h, "frame exported");
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
