use std::sync::Arc;

use crate::assets::cache::BitmapSource;
use crate::assets::decode::{Bitmap, Origin};
use crate::assets::text::TextEngine;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ShotError, ShotResult};
use crate::render::background::draw_background;
use crate::render::badge::draw_badges;
use crate::render::coords::CoordinateMapper;
use crate::render::noise::{NoiseMode, apply_noise};
use crate::render::screenshot::draw_screenshot;
use crate::render::text::draw_text_layer;
use crate::scene::model::Scene;
use crate::scene::resolution::OutputResolution;

/// Environment variable selecting the noise mode (`blend` or `legacy`).
pub const NOISE_MODE_ENV: &str = "SHOTFRAME_NOISE_MODE";

/// Options for the raster compositor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompositorOpts {
    pub(crate) noise_mode: NoiseMode,
    pub(crate) noise_seed: Option<u64>,
    pub(crate) clear_rgba: Option<[u8; 4]>,
}

impl CompositorOpts {
    /// Return options with the given noise mode.
    pub fn with_noise_mode(mut self, mode: NoiseMode) -> Self {
        self.noise_mode = mode;
        self
    }

    /// Return options with a fixed noise seed. Without one, every render draws fresh grain.
    pub fn with_noise_seed(mut self, seed: Option<u64>) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Return options with a color painted before the background.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Defaults, with the noise mode taken from [`NOISE_MODE_ENV`] when set.
    pub fn from_env() -> ShotResult<Self> {
        let mut opts = Self::default();
        if let Ok(v) = std::env::var(NOISE_MODE_ENV) {
            opts.noise_mode = v.parse()?;
        }
        Ok(opts)
    }

    /// Configured noise mode.
    pub fn noise_mode(&self) -> NoiseMode {
        self.noise_mode
    }
}

/// Layers that depend on external inputs, reported when skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Solid, gradient, or image backdrop.
    Background,
    /// Transformed screenshot bitmap.
    Screenshot,
    /// Headline text.
    Headline,
    /// Subheadline text.
    Subheadline,
    /// Badge pills.
    Badges,
}

/// Composited frame as premultiplied RGBA8, row-major, no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` premultiplied bytes.
    pub data: Vec<u8>,
    /// A cross-origin bitmap was drawn; pixel readback for export is refused.
    pub tainted: bool,
    /// Layers that were not drawn because their inputs were not ready.
    pub skipped: Vec<LayerKind>,
}

impl Raster {
    /// Premultiplied RGBA at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Whether `layer` was skipped in this pass.
    pub fn was_skipped(&self, layer: LayerKind) -> bool {
        self.skipped.contains(&layer)
    }
}

/// Per-pass drawing state shared by the layer functions.
pub(crate) struct LayerCx<'a> {
    pub(crate) ctx: &'a mut vello_cpu::RenderContext,
    pub(crate) canvas: Canvas,
    pub(crate) mapper: CoordinateMapper,
    bitmaps: &'a dyn BitmapSource,
    tainted: bool,
    skipped: Vec<LayerKind>,
}

impl<'a> LayerCx<'a> {
    pub(crate) fn new(
        ctx: &'a mut vello_cpu::RenderContext,
        canvas: Canvas,
        bitmaps: &'a dyn BitmapSource,
    ) -> Self {
        Self {
            ctx,
            canvas,
            mapper: CoordinateMapper::new(canvas),
            bitmaps,
            tainted: false,
            skipped: Vec::new(),
        }
    }

    /// Fetch a ready bitmap. A miss marks `layer` skipped.
    pub(crate) fn use_bitmap(&mut self, source: &str, layer: LayerKind) -> Option<Arc<Bitmap>> {
        match self.bitmaps.bitmap(source) {
            Some(b) => {
                if b.origin == Origin::CrossOrigin {
                    self.tainted = true;
                }
                Some(b)
            }
            None => {
                tracing::debug!(source, ?layer, "bitmap not ready, layer skipped");
                self.skip(layer);
                None
            }
        }
    }

    pub(crate) fn skip(&mut self, layer: LayerKind) {
        if !self.skipped.contains(&layer) {
            self.skipped.push(layer);
        }
    }
}

/// Deterministic 2-D compositor for one scene at one output size.
///
/// Each call to [`Compositor::render`] is a full pass: clear, background, screenshot, headline,
/// subheadline, badges, then noise. With noise disabled, identical inputs produce identical
/// bytes.
pub struct Compositor {
    opts: CompositorOpts,
    text: TextEngine,
    ctx: Option<(Canvas, vello_cpu::RenderContext)>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorOpts::default())
    }
}

impl Compositor {
    /// Create a compositor with no fonts registered.
    pub fn new(opts: CompositorOpts) -> Self {
        Self {
            opts,
            text: TextEngine::new(),
            ctx: None,
        }
    }

    /// Options in effect.
    pub fn opts(&self) -> &CompositorOpts {
        &self.opts
    }

    /// Font registry used for headline, subheadline, and badges.
    pub fn text_engine(&self) -> &TextEngine {
        &self.text
    }

    /// Mutable access to the font registry.
    pub fn text_engine_mut(&mut self) -> &mut TextEngine {
        &mut self.text
    }

    /// Register a font from raw bytes and return its family name.
    pub fn register_font(&mut self, bytes: Vec<u8>) -> ShotResult<String> {
        self.text.register_font(bytes)
    }

    /// Composite `scene` at `resolution` using text for `lang`.
    #[tracing::instrument(skip(self, scene, bitmaps), fields(resolution = %resolution))]
    pub fn render(
        &mut self,
        scene: &Scene,
        resolution: OutputResolution,
        lang: &str,
        bitmaps: &dyn BitmapSource,
    ) -> ShotResult<Raster> {
        let canvas = resolution.canvas()?;
        let (w, h) = canvas.as_u16()?;

        let mut ctx = match self.ctx.take() {
            Some((c, ctx)) if c == canvas => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        let (tainted, skipped) = {
            let mut cx = LayerCx::new(&mut ctx, canvas, bitmaps);
            draw_layers(&mut cx, &mut self.text, &self.opts, scene, lang)?;
            (cx.tainted, cx.skipped)
        };

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some((canvas, ctx));

        let mut data = pixmap.data_as_u8_slice().to_vec();
        if data.len() != canvas.rgba_len() {
            return Err(ShotError::render("pixmap size does not match the canvas"));
        }

        if scene.noise.enabled {
            let seed = self.opts.noise_seed.unwrap_or_else(entropy_seed);
            apply_noise(&mut data, scene.noise.opacity, self.opts.noise_mode, seed);
        }

        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            tainted,
            ?skipped,
            "frame composited"
        );
        Ok(Raster {
            width: canvas.width,
            height: canvas.height,
            data,
            tainted,
            skipped,
        })
    }
}

fn draw_layers(
    cx: &mut LayerCx<'_>,
    text: &mut TextEngine,
    opts: &CompositorOpts,
    scene: &Scene,
    lang: &str,
) -> ShotResult<()> {
    if let Some(clear) = opts.clear_rgba {
        let [r, g, b, a] = clear;
        cx.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        cx.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        cx.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            cx.canvas.w(),
            cx.canvas.h(),
        ));
    }
    draw_background(cx, &scene.background)?;
    draw_screenshot(cx, &scene.screenshot)?;
    draw_text_layer(cx, text, &scene.headline, lang, LayerKind::Headline)?;
    draw_text_layer(cx, text, &scene.subheadline, lang, LayerKind::Subheadline)?;
    draw_badges(cx, text, &scene.badges)?;
    Ok(())
}

fn entropy_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
