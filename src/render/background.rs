use rayon::prelude::*;

use crate::assets::color::Color;
use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::foundation::error::ShotResult;
use crate::foundation::math::normalize_deg;
use crate::render::compositor::{LayerCx, LayerKind};
use crate::render::pixels::{affine_to_cpu, blur_rgba8_premul, image_paint, render_offscreen};
use crate::scene::model::{BackgroundSpec, GradientKind, GradientSpec, GradientStop, ImageBackground};

pub(crate) fn draw_background(cx: &mut LayerCx<'_>, spec: &BackgroundSpec) -> ShotResult<()> {
    let frame = Rect::new(0.0, 0.0, cx.canvas.w(), cx.canvas.h());
    match spec {
        BackgroundSpec::Solid { color } => {
            cx.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            cx.ctx.set_paint(color.to_cpu());
            cx.ctx.fill_rect(&rect_to_cpu(frame));
            Ok(())
        }
        BackgroundSpec::Gradient(g) => {
            if g.stops.is_empty() {
                return Ok(());
            }
            let bytes = gradient_pixels(g, cx.canvas);
            let paint = image_paint(&bytes, cx.canvas.width, cx.canvas.height)?;
            cx.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            cx.ctx.set_paint(paint);
            cx.ctx.fill_rect(&rect_to_cpu(frame));
            Ok(())
        }
        BackgroundSpec::Image(img) => draw_image_background(cx, img),
    }
}

fn draw_image_background(cx: &mut LayerCx<'_>, img: &ImageBackground) -> ShotResult<()> {
    let Some(bitmap) = cx.use_bitmap(&img.source, LayerKind::Background) else {
        return Ok(());
    };
    let canvas = cx.canvas;
    let frame = rect_to_cpu(Rect::new(0.0, 0.0, canvas.w(), canvas.h()));
    let fit = cover_fit(bitmap.width, bitmap.height, canvas);
    let placement = Affine::translate((fit.offset_x, fit.offset_y)) * Affine::scale(fit.scale);
    let src = image_paint(&bitmap.rgba8_premul, bitmap.width, bitmap.height)?;
    let native = vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(bitmap.width),
        f64::from(bitmap.height),
    );

    if img.blur_px > 0.0 {
        let (w, h) = canvas.as_u16()?;
        let drawn = render_offscreen(w, h, |ctx| {
            ctx.set_transform(affine_to_cpu(placement));
            ctx.set_paint(src);
            ctx.fill_rect(&native);
            Ok(())
        })?;
        let blurred = blur_rgba8_premul(&drawn, canvas.width, canvas.height, img.blur_px)?;
        cx.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        cx.ctx.set_paint(image_paint(&blurred, canvas.width, canvas.height)?);
        cx.ctx.fill_rect(&frame);
    } else {
        cx.ctx.set_transform(affine_to_cpu(placement));
        cx.ctx.set_paint(src);
        cx.ctx.fill_rect(&native);
    }

    if img.overlay_opacity > 0.0 {
        cx.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        cx.ctx.set_paint(
            img.overlay_color
                .with_alpha_mul(img.overlay_opacity.clamp(0.0, 1.0))
                .to_cpu(),
        );
        cx.ctx.fill_rect(&frame);
    }
    Ok(())
}

/// Cover-fit placement of an image inside a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Uniform scale applied to the image.
    pub scale: f64,
    /// Left edge of the scaled image (≤ 0 when cropped horizontally).
    pub offset_x: f64,
    /// Top edge of the scaled image (≤ 0 when cropped vertically).
    pub offset_y: f64,
}

/// `scale = max(frameW / imgW, frameH / imgH)`, centered.
pub fn cover_fit(img_w: u32, img_h: u32, canvas: Canvas) -> CoverFit {
    let iw = f64::from(img_w.max(1));
    let ih = f64::from(img_h.max(1));
    let scale = (canvas.w() / iw).max(canvas.h() / ih);
    CoverFit {
        scale,
        offset_x: (canvas.w() - iw * scale) / 2.0,
        offset_y: (canvas.h() - ih * scale) / 2.0,
    }
}

/// Linear gradient axis `(start, end)`.
///
/// With `d = (cos(angle − 90°), sin(angle − 90°))`, the axis runs from `center + d × frame`
/// to `center − d × frame` (per axis: x scaled by width, y by height), so 0° runs top to
/// bottom. The angle is normalized into `[0, 360)` first.
pub fn linear_endpoints(angle_deg: f64, canvas: Canvas) -> (Point, Point) {
    let rad = (normalize_deg(angle_deg) - 90.0).to_radians();
    let (dx, dy) = (rad.cos() * canvas.w(), rad.sin() * canvas.h());
    let c = Point::new(canvas.w() / 2.0, canvas.h() / 2.0);
    (
        Point::new(c.x + dx, c.y + dy),
        Point::new(c.x - dx, c.y - dy),
    )
}

/// Stops in ascending position order; ties keep their input order.
pub fn sorted_stops(stops: &[GradientStop]) -> Vec<GradientStop> {
    let mut out = stops.to_vec();
    out.sort_by(|a, b| a.position.total_cmp(&b.position));
    out
}

/// Color at `t ∈ [0, 1]` along sorted stops, padded at both ends.
pub fn sample_stops(sorted: &[GradientStop], t: f64) -> Color {
    let Some(first) = sorted.first() else {
        return Color::rgba(0.0, 0.0, 0.0, 0.0);
    };
    let pos = t * 100.0;
    if pos <= first.position {
        return first.color;
    }
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if pos <= b.position {
            let span = b.position - a.position;
            if span <= 0.0 {
                return b.color;
            }
            let u = (pos - a.position) / span;
            let mix = |x: f64, y: f64| x + (y - x) * u;
            return Color::rgba(
                mix(a.color.r, b.color.r),
                mix(a.color.g, b.color.g),
                mix(a.color.b, b.color.b),
                mix(a.color.a, b.color.a),
            );
        }
    }
    sorted.last().map(|s| s.color).unwrap_or(first.color)
}

/// Full-frame premultiplied RGBA8 gradient.
pub fn gradient_pixels(spec: &GradientSpec, canvas: Canvas) -> Vec<u8> {
    let stops = sorted_stops(&spec.stops);
    let mut bytes = vec![0u8; canvas.rgba_len()];
    let row_len = (canvas.width as usize) * 4;

    let param: Box<dyn Fn(f64, f64) -> f64 + Sync> = match spec.kind {
        GradientKind::Linear => {
            let (p0, p1) = linear_endpoints(spec.angle_deg, canvas);
            let (vx, vy) = (p1.x - p0.x, p1.y - p0.y);
            let len2 = vx * vx + vy * vy;
            Box::new(move |x, y| {
                if len2 <= 0.0 {
                    0.0
                } else {
                    ((x - p0.x) * vx + (y - p0.y) * vy) / len2
                }
            })
        }
        GradientKind::Radial => {
            let (cx, cy) = (canvas.w() / 2.0, canvas.h() / 2.0);
            let radius = canvas.w().max(canvas.h()) / 2.0;
            Box::new(move |x, y| ((x - cx).hypot(y - cy)) / radius)
        }
    };

    bytes.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let py = y as f64 + 0.5;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let t = param(x as f64 + 0.5, py).clamp(0.0, 1.0);
            px.copy_from_slice(&sample_stops(&stops, t).to_rgba8_premul().to_array());
        }
    });
    bytes
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
