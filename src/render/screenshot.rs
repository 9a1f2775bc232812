use crate::assets::color::Color;
use crate::assets::decode::Bitmap;
use crate::foundation::core::{Affine, BezPath, Point, Rect, RoundedRect};
use crate::foundation::error::ShotResult;
use crate::render::compositor::{LayerCx, LayerKind};
use crate::render::pixels::{affine_to_cpu, bezpath_to_cpu, image_paint};
use crate::render::shadow::{Shadow, draw_shadow};
use crate::scene::model::{ScreenshotLayer, ScreenshotTransform};
use kurbo::Shape;

/// Largest radius that keeps the rounded rect from self-intersecting.
pub fn clamp_corner_radius(radius_px: f64, scaled_w: f64, scaled_h: f64) -> f64 {
    let max = scaled_w.min(scaled_h) / 2.0;
    radius_px.clamp(0.0, max.max(0.0))
}

/// One step of the screenshot draw sequence, in canvas-state terms.
#[derive(Clone, Debug, PartialEq)]
pub enum ScreenshotOp {
    /// Translate to the mapped center, then rotate about it.
    Transform(Affine),
    /// Activate a drop shadow for subsequent fills.
    SetShadow(Shadow),
    /// Clip subsequent drawing to a rounded rect centered on the origin.
    ClipRoundedRect {
        /// Clip bounds.
        rect: Rect,
        /// Clamped corner radius.
        radius: f64,
    },
    /// Draw the bitmap centered on the origin at `scale × native size`.
    DrawBitmap {
        /// Destination bounds.
        rect: Rect,
        /// Uniform scale over the native size.
        scale: f64,
    },
    /// Drop the clip pushed by `ClipRoundedRect`.
    PopClip,
    /// Reset shadow state.
    ClearShadow,
    /// Stroke the screenshot outline.
    StrokeBorder {
        /// Outline bounds.
        rect: Rect,
        /// Corner radius, `0` for a plain rect.
        radius: f64,
        /// Stroke color.
        color: Color,
        /// Stroke width in pixels.
        width: f64,
    },
}

/// Build the draw sequence for a screenshot of `native_w`×`native_h` centered at `center`.
pub fn plan_screenshot(
    t: &ScreenshotTransform,
    center: Point,
    native_w: f64,
    native_h: f64,
) -> Vec<ScreenshotOp> {
    let sw = native_w * t.scale;
    let sh = native_h * t.scale;
    let rect = Rect::new(-sw / 2.0, -sh / 2.0, sw / 2.0, sh / 2.0);
    let radius = clamp_corner_radius(t.corner_radius_px, sw, sh);

    let mut ops = Vec::with_capacity(7);
    ops.push(ScreenshotOp::Transform(
        Affine::translate(center.to_vec2()) * Affine::rotate(t.rotation_deg.to_radians()),
    ));
    if t.shadow.enabled {
        ops.push(ScreenshotOp::SetShadow(Shadow {
            color: t.shadow.color,
            blur_px: t.shadow.blur_px,
            offset_x: t.shadow.offset_x,
            offset_y: t.shadow.offset_y,
        }));
    }
    if radius > 0.0 {
        ops.push(ScreenshotOp::ClipRoundedRect { rect, radius });
    }
    ops.push(ScreenshotOp::DrawBitmap {
        rect,
        scale: t.scale,
    });
    if radius > 0.0 {
        ops.push(ScreenshotOp::PopClip);
    }
    ops.push(ScreenshotOp::ClearShadow);
    if t.border.enabled {
        ops.push(ScreenshotOp::StrokeBorder {
            rect,
            radius,
            color: t.border.color,
            width: t.border.width_px,
        });
    }
    ops
}

pub(crate) fn draw_screenshot(cx: &mut LayerCx<'_>, layer: &ScreenshotLayer) -> ShotResult<()> {
    let Some(source) = layer.source.as_deref() else {
        return Ok(());
    };
    let scale = layer.transform.scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Ok(());
    }
    let Some(bitmap) = cx.use_bitmap(source, LayerKind::Screenshot) else {
        return Ok(());
    };
    let center = cx.mapper.point(layer.transform.position);
    let ops = plan_screenshot(
        &layer.transform,
        center,
        f64::from(bitmap.width),
        f64::from(bitmap.height),
    );
    execute(cx, &ops, &bitmap)
}

fn outline(rect: Rect, radius: f64) -> BezPath {
    if radius > 0.0 {
        RoundedRect::from_rect(rect, radius).to_path(0.1)
    } else {
        rect.to_path(0.1)
    }
}

fn execute(cx: &mut LayerCx<'_>, ops: &[ScreenshotOp], bitmap: &Bitmap) -> ShotResult<()> {
    let mut base = Affine::IDENTITY;
    let mut shadow: Option<Shadow> = None;
    let mut clip: Option<BezPath> = None;
    let mut clip_pushed = false;

    for op in ops {
        match op {
            ScreenshotOp::Transform(a) => base = *a,
            ScreenshotOp::SetShadow(s) => shadow = Some(*s),
            // Deferred until the bitmap draw so the shadow is cast by the clipped silhouette
            // instead of being clipped away with it.
            ScreenshotOp::ClipRoundedRect { rect, radius } => {
                clip = Some(RoundedRect::from_rect(*rect, *radius).to_path(0.1));
            }
            ScreenshotOp::DrawBitmap { rect, scale } => {
                let silhouette = clip.clone().unwrap_or_else(|| rect.to_path(0.1));
                if let Some(s) = shadow {
                    draw_shadow(cx.ctx, cx.canvas, base, &silhouette, s)?;
                }
                if let Some(path) = &clip {
                    cx.ctx.set_transform(affine_to_cpu(base));
                    cx.ctx.push_clip_layer(&bezpath_to_cpu(path));
                    clip_pushed = true;
                }
                let placement =
                    base * Affine::translate((rect.x0, rect.y0)) * Affine::scale(*scale);
                cx.ctx.set_transform(affine_to_cpu(placement));
                cx.ctx.set_paint(image_paint(
                    &bitmap.rgba8_premul,
                    bitmap.width,
                    bitmap.height,
                )?);
                cx.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(bitmap.width),
                    f64::from(bitmap.height),
                ));
            }
            ScreenshotOp::PopClip => {
                if clip_pushed {
                    cx.ctx.pop_layer();
                    clip_pushed = false;
                }
                clip = None;
            }
            ScreenshotOp::ClearShadow => shadow = None,
            ScreenshotOp::StrokeBorder {
                rect,
                radius,
                color,
                width,
            } => {
                debug_assert!(shadow.is_none());
                cx.ctx.set_transform(affine_to_cpu(base));
                cx.ctx
                    .set_stroke(vello_cpu::kurbo::Stroke::new(width.max(0.0)));
                cx.ctx.set_paint(color.to_cpu());
                cx.ctx.stroke_path(&bezpath_to_cpu(&outline(*rect, *radius)));
            }
        }
    }
    if clip_pushed {
        cx.ctx.pop_layer();
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/screenshot.rs"]
mod tests;
