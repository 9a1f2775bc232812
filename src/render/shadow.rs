use crate::assets::color::Color;
use crate::foundation::core::{Affine, BezPath, Canvas, Rect, Vec2};
use crate::foundation::error::ShotResult;
use crate::render::pixels::{
    affine_to_cpu, bezpath_to_cpu, blur_radius_for_sigma, blur_rgba8_premul, image_paint,
    render_offscreen,
};
use kurbo::Shape;

/// Drop shadow in device pixels. Offsets are not affected by the current transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow color; alpha scales the silhouette.
    pub color: Color,
    /// Blur extent; the gaussian sigma is half of it.
    pub blur_px: f64,
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
}

impl Shadow {
    pub(crate) fn sigma(self) -> f64 {
        self.blur_px.max(0.0) / 2.0
    }
}

/// Paint the blurred silhouette of `path` (in `base` space) under whatever is drawn next.
pub(crate) fn draw_shadow(
    ctx: &mut vello_cpu::RenderContext,
    canvas: Canvas,
    base: Affine,
    path: &BezPath,
    shadow: Shadow,
) -> ShotResult<()> {
    if shadow.color.a <= 0.0 {
        return Ok(());
    }
    let sigma = shadow.sigma();
    let pad = f64::from(blur_radius_for_sigma(sigma)) + 1.0;
    let bbox = (base * path.clone()).bounding_box() + Vec2::new(shadow.offset_x, shadow.offset_y);
    let visible = Rect::new(0.0, 0.0, canvas.w(), canvas.h()).inflate(pad, pad);
    let region = bbox.inflate(pad, pad).intersect(visible).expand();
    if region.width() <= 0.0 || region.height() <= 0.0 {
        return Ok(());
    }

    let (w, h) = (region.width() as u32, region.height() as u32);
    let (Ok(w16), Ok(h16)) = (u16::try_from(w), u16::try_from(h)) else {
        tracing::warn!(w, h, "shadow region too large, skipping");
        return Ok(());
    };

    let local = Affine::translate((
        shadow.offset_x - region.x0,
        shadow.offset_y - region.y0,
    )) * base;
    let silhouette = render_offscreen(w16, h16, |c| {
        c.set_transform(affine_to_cpu(local));
        c.set_paint(shadow.color.to_cpu());
        c.fill_path(&bezpath_to_cpu(path));
        Ok(())
    })?;
    let blurred = if sigma > 0.0 {
        blur_rgba8_premul(&silhouette, w, h, sigma)?
    } else {
        silhouette
    };

    ctx.set_transform(affine_to_cpu(Affine::translate((region.x0, region.y0))));
    ctx.set_paint(image_paint(&blurred, w, h)?);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/shadow.rs"]
mod tests;
