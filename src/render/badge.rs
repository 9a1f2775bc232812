use crate::assets::color::Color;
use crate::assets::text::{
    EngineMeasure, FontRequest, TextBrushRgba8, TextEngine, TextMeasure, fill_shaped_line,
};
use crate::foundation::core::{Affine, Canvas, Rect, RoundedRect};
use crate::foundation::error::ShotResult;
use crate::render::compositor::{LayerCx, LayerKind};
use crate::render::pixels::{affine_to_cpu, bezpath_to_cpu};
use crate::render::shadow::{Shadow, draw_shadow};
use crate::scene::model::{Badge, PctPoint};
use kurbo::Shape;

/// Frame width at which badge metrics are authored.
pub const BADGE_REFERENCE_WIDTH: f64 = 1290.0;

const LINE_HEIGHT: f64 = 1.2;
const SUBTEXT_SCALE: f64 = 0.65;
const SHADOW_BLUR: f64 = 24.0;
const SHADOW_OFFSET_Y: f64 = 8.0;

/// Badge box geometry in reference pixels, centered on the badge position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeMetrics {
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Corner radius after clamping to the box.
    pub radius: f64,
    /// Main text size.
    pub text_size: f64,
    /// Secondary line size, `0` without subtext.
    pub subtext_size: f64,
}

impl BadgeMetrics {
    /// Box rect centered on the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(
            -self.width / 2.0,
            -self.height / 2.0,
            self.width / 2.0,
            self.height / 2.0,
        )
    }
}

/// Reference-to-output scale for `badge` on `canvas`.
pub fn badge_scale(badge: &Badge, canvas: Canvas) -> f64 {
    canvas.w() / BADGE_REFERENCE_WIDTH * badge.position.scale
}

/// Size a badge from its measured text. `measure` reports widths at the main text size.
pub fn badge_metrics(badge: &Badge, measure: &mut dyn TextMeasure) -> BadgeMetrics {
    let style = &badge.style;
    let text_size = style.font_size_px;
    let text_w = measure.measure(&badge.text);
    let sub = badge.subtext.as_deref().filter(|s| !s.trim().is_empty());
    let (sub_w, subtext_size) = match sub {
        Some(s) => (measure.measure(s) * SUBTEXT_SCALE, text_size * SUBTEXT_SCALE),
        None => (0.0, 0.0),
    };

    let width = text_w.max(sub_w) + 2.0 * style.padding_x;
    let mut height = text_size * LINE_HEIGHT + 2.0 * style.padding_y;
    if sub.is_some() {
        height += subtext_size * LINE_HEIGHT;
    }
    let radius = style
        .border_radius_px
        .max(0.0)
        .min(width / 2.0)
        .min(height / 2.0);
    BadgeMetrics {
        width,
        height,
        radius,
        text_size,
        subtext_size,
    }
}

pub(crate) fn draw_badges(
    cx: &mut LayerCx<'_>,
    engine: &mut TextEngine,
    badges: &[Badge],
) -> ShotResult<()> {
    if badges.is_empty() {
        return Ok(());
    }
    if !engine.has_fonts() {
        tracing::debug!(count = badges.len(), "no fonts registered, badges skipped");
        cx.skip(LayerKind::Badges);
        return Ok(());
    }
    for badge in badges {
        let s = badge.position.scale;
        if !s.is_finite() || s <= 0.0 {
            continue;
        }
        draw_badge(cx, engine, badge)?;
    }
    Ok(())
}

fn draw_badge(cx: &mut LayerCx<'_>, engine: &mut TextEngine, badge: &Badge) -> ShotResult<()> {
    let style = &badge.style;
    let req = FontRequest {
        family: style.font_family.clone(),
        weight: style.font_weight,
        size_px: style.font_size_px as f32,
        letter_spacing: 0.0,
    };
    let m = badge_metrics(
        badge,
        &mut EngineMeasure {
            engine: &mut *engine,
            req: &req,
        },
    );

    let center = cx.mapper.point(PctPoint {
        x_pct: badge.position.x_pct,
        y_pct: badge.position.y_pct,
    });
    let s = badge_scale(badge, cx.canvas);
    let base = Affine::translate(center.to_vec2())
        * Affine::rotate(badge.position.rotate_deg.to_radians())
        * Affine::scale(s);
    let rect = m.rect();
    let body = RoundedRect::from_rect(rect, m.radius).to_path(0.1);

    if style.shadow {
        let shadow = Shadow {
            color: Color::rgba(0.0, 0.0, 0.0, 0.15),
            blur_px: SHADOW_BLUR * s,
            offset_x: 0.0,
            offset_y: SHADOW_OFFSET_Y * s,
        };
        draw_shadow(cx.ctx, cx.canvas, base, &body, shadow)?;
    }
    cx.ctx.set_transform(affine_to_cpu(base));
    cx.ctx.set_paint(style.background_color.to_cpu());
    cx.ctx.fill_path(&bezpath_to_cpu(&body));

    let [r, g, b, a] = style.text_color.to_rgba8();
    let brush = TextBrushRgba8 { r, g, b, a };
    let mut top = rect.y0 + style.padding_y;
    let lines = [
        (Some(badge.text.as_str()), m.text_size),
        (badge.subtext.as_deref(), m.subtext_size),
    ];
    for (text, size) in lines {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        let line_req = FontRequest {
            size_px: size as f32,
            ..req.clone()
        };
        let box_h = size * LINE_HEIGHT;
        if let Some(shaped) = engine.shape_line(text, &line_req, brush)? {
            let y = top + (box_h - shaped.height) / 2.0;
            let origin = Affine::translate((-shaped.width / 2.0, y));
            fill_shaped_line(cx.ctx, &shaped, affine_to_cpu(base * origin));
        }
        top += box_h;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/badge.rs"]
mod tests;
