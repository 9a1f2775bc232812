use std::sync::Arc;

use glam::{Vec2, Vec4};

use crate::assets::decode::Bitmap;

/// Screenshot texels, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    texels: Arc<Vec<u8>>,
}

impl Texture {
    /// Share the bitmap's pixels as a texture.
    pub fn from_bitmap(bitmap: &Bitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            texels: bitmap.rgba8_premul.clone(),
        }
    }

    fn texel(&self, x: u32, y: u32) -> Vec4 {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let t = &self.texels[i..i + 4];
        Vec4::new(
            f32::from(t[0]),
            f32::from(t[1]),
            f32::from(t[2]),
            f32::from(t[3]),
        ) / 255.0
    }

    /// Bilinear sample with clamp-to-edge addressing. Returns premultiplied RGBA in `0..=1`.
    pub fn sample(&self, uv: Vec2) -> Vec4 {
        if self.width == 0 || self.height == 0 {
            return Vec4::ZERO;
        }
        let x = (uv.x.clamp(0.0, 1.0) * self.width as f32 - 0.5).max(0.0);
        let y = (uv.y.clamp(0.0, 1.0) * self.height as f32 - 0.5).max(0.0);
        let x0 = (x.floor() as u32).min(self.width - 1);
        let y0 = (y.floor() as u32).min(self.height - 1);
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;
        let top = self.texel(x0, y0).lerp(self.texel(x1, y0), fx);
        let bottom = self.texel(x0, y1).lerp(self.texel(x1, y1), fx);
        top.lerp(bottom, fy)
    }
}

/// Holds the one live screenshot texture and rebuilds it only when the bitmap changes.
#[derive(Debug, Default)]
pub struct TextureSlot {
    current: Option<(String, Arc<Texture>)>,
    uploads: u64,
    disposals: u64,
}

impl TextureSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `bitmap` (known as `source`) the live texture. Returns `true` when a rebuild happened.
    ///
    /// A new bitmap under the same source (a re-decoded edit) also rebuilds.
    pub fn sync(&mut self, source: &str, bitmap: &Bitmap) -> bool {
        if matches!(
            &self.current,
            Some((s, t)) if s == source && Arc::ptr_eq(&t.texels, &bitmap.rgba8_premul)
        ) {
            return false;
        }
        self.dispose();
        self.current = Some((source.to_owned(), Arc::new(Texture::from_bitmap(bitmap))));
        self.uploads += 1;
        tracing::debug!(source, width = bitmap.width, height = bitmap.height, "texture uploaded");
        true
    }

    /// Drop the live texture, if any.
    pub fn dispose(&mut self) {
        if let Some((source, _)) = self.current.take() {
            self.disposals += 1;
            tracing::debug!(source = %source, "texture disposed");
        }
    }

    /// Live texture.
    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.current.as_ref().map(|(_, t)| t)
    }

    /// Source reference of the live texture.
    pub fn source(&self) -> Option<&str> {
        self.current.as_ref().map(|(s, _)| s.as_str())
    }

    /// Textures built so far.
    pub fn uploads(&self) -> u64 {
        self.uploads
    }

    /// Textures released so far.
    pub fn disposals(&self) -> u64 {
        self.disposals
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview3d/texture.rs"]
mod tests;
