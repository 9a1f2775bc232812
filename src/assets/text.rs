use std::borrow::Cow;

use crate::foundation::error::{ShotError, ShotResult};

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Anything that can report the advance width of a string in pixels.
///
/// Word-wrap and badge sizing are written against this trait so they can be exercised with a
/// deterministic measurer.
pub trait TextMeasure {
    /// Width of `text` on a single line, in pixels.
    fn measure(&mut self, text: &str) -> f64;
}

/// Font selection and sizing for one shaping request.
#[derive(Clone, Debug, PartialEq)]
pub struct FontRequest {
    /// Family name as written in the scene; matched case-insensitively.
    pub family: String,
    /// CSS-style weight (400 regular, 700 bold).
    pub weight: f32,
    /// Font size in pixels.
    pub size_px: f32,
    /// Extra advance between glyphs, in pixels.
    pub letter_spacing: f32,
}

#[derive(Clone)]
struct RegisteredFace {
    family: String,
    weight: f32,
    data: vello_cpu::peniko::FontData,
}

/// A single shaped line ready to be drawn.
pub(crate) struct ShapedLine {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

/// Font registry plus Parley shaping contexts.
///
/// Fonts are registered from raw bytes; nothing is loaded from the system. When no font has been
/// registered, shaping reports "not ready" and text layers are skipped.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: Vec<RegisteredFace>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Construct an engine with no fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
        }
    }

    /// Register a font file. Returns the family name it was registered under.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> ShotResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let (family_id, infos) = families
            .first()
            .ok_or_else(|| ShotError::asset("no font families registered from font bytes"))?;

        let family = self
            .font_ctx
            .collection
            .family_name(*family_id)
            .ok_or_else(|| ShotError::asset("registered font family has no name"))?
            .to_string();
        let weight = infos
            .first()
            .map(|info| info.weight().value())
            .unwrap_or(400.0);

        tracing::debug!(family = %family, weight, "font registered");
        self.faces.push(RegisteredFace {
            family: family.clone(),
            weight,
            data: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font_bytes),
                0,
            ),
        });
        Ok(family)
    }

    /// Return `true` when at least one font is registered.
    pub fn has_fonts(&self) -> bool {
        !self.faces.is_empty()
    }

    /// Registered family names, in registration order.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.faces.iter().map(|f| f.family.as_str())
    }

    /// Pick the face for `family`/`weight`: exact family (case-insensitive) with the closest
    /// weight, otherwise the first registered face.
    fn resolve_face(&self, family: &str, weight: f32) -> Option<&RegisteredFace> {
        let by_family = self
            .faces
            .iter()
            .filter(|f| f.family.eq_ignore_ascii_case(family))
            .min_by(|a, b| {
                (a.weight - weight)
                    .abs()
                    .total_cmp(&(b.weight - weight).abs())
            });
        by_family.or_else(|| self.faces.first())
    }

    /// Shape `text` on one line. Returns `None` when no font is available.
    pub(crate) fn shape_line(
        &mut self,
        text: &str,
        req: &FontRequest,
        brush: TextBrushRgba8,
    ) -> ShotResult<Option<ShapedLine>> {
        if !req.size_px.is_finite() || req.size_px <= 0.0 {
            return Err(ShotError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(face) = self.resolve_face(&req.family, req.weight).cloned() else {
            return Ok(None);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(face.weight),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(req.size_px));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            req.letter_spacing,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let width = f64::from(layout.width());
        let height = f64::from(layout.height());
        Ok(Some(ShapedLine {
            layout,
            font: face.data,
            width,
            height,
        }))
    }

    /// Measure `text` with `req`. Returns `None` when no font is available.
    pub(crate) fn measure_line(&mut self, text: &str, req: &FontRequest) -> ShotResult<Option<f64>> {
        Ok(self
            .shape_line(text, req, TextBrushRgba8::default())?
            .map(|l| l.width))
    }
}

/// [`TextMeasure`] adapter over a [`TextEngine`] and a fixed request.
pub(crate) struct EngineMeasure<'a> {
    pub(crate) engine: &'a mut TextEngine,
    pub(crate) req: &'a FontRequest,
}

impl TextMeasure for EngineMeasure<'_> {
    fn measure(&mut self, text: &str) -> f64 {
        match self.engine.measure_line(text, self.req) {
            Ok(Some(w)) => w,
            Ok(None) | Err(_) => 0.0,
        }
    }
}

/// Draw a shaped line with its layout origin (top-left of the line box) at `origin`.
pub(crate) fn fill_shaped_line(
    ctx: &mut vello_cpu::RenderContext,
    line: &ShapedLine,
    origin: vello_cpu::kurbo::Affine,
) {
    ctx.set_transform(origin);
    for layout_line in line.layout.lines() {
        for item in layout_line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&line.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
