use crate::assets::text::{
    EngineMeasure, FontRequest, TextBrushRgba8, TextEngine, TextMeasure, fill_shaped_line,
};
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::ShotResult;
use crate::render::compositor::{LayerCx, LayerKind};
use crate::render::pixels::affine_to_cpu;
use crate::scene::model::{AnchorEdge, TextAlign, TextLayer, TextStyle};

/// Greedy word wrap against `max_width_px`.
///
/// Words are never split; a single word wider than the limit gets a line of its own. Explicit
/// `\n` starts a new paragraph. Trailing blank lines are dropped so they do not shift
/// bottom-anchored blocks.
pub fn wrap_words(text: &str, max_width_px: f64, measure: &mut dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if measure.measure(&candidate) > max_width_px {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Maximum line width for `style` on `canvas`.
pub fn max_width_px(style: &TextStyle, canvas: Canvas) -> f64 {
    canvas.w() * style.max_width_pct / 100.0
}

/// Vertical distance between consecutive line boxes.
pub fn line_advance(style: &TextStyle) -> f64 {
    style.size_px * style.line_height_multiplier
}

/// X coordinate the text block is aligned against.
pub fn anchor_x(align: TextAlign, canvas: Canvas, max_width_px: f64) -> f64 {
    let margin = (canvas.w() - max_width_px) / 2.0;
    match align {
        TextAlign::Left => margin,
        TextAlign::Center => canvas.w() / 2.0,
        TextAlign::Right => canvas.w() - margin,
    }
}

/// Top-left corner of each line box, given the measured width of each line.
pub fn place_lines(style: &TextStyle, canvas: Canvas, widths: &[f64]) -> Vec<Point> {
    let ax = anchor_x(style.alignment, canvas, max_width_px(style, canvas));
    let advance = line_advance(style);
    let block = advance * widths.len() as f64;
    let y0 = match style.anchor_edge {
        AnchorEdge::Top => style.offset_y_px,
        AnchorEdge::Bottom => canvas.h() - style.offset_y_px - block,
    };
    widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let x = match style.alignment {
                TextAlign::Left => ax,
                TextAlign::Center => ax - w / 2.0,
                TextAlign::Right => ax - w,
            };
            Point::new(x, y0 + advance * i as f64)
        })
        .collect()
}

pub(crate) fn font_request(style: &TextStyle) -> FontRequest {
    FontRequest {
        family: style.font_family.clone(),
        weight: style.weight,
        size_px: style.size_px as f32,
        letter_spacing: style.letter_spacing as f32,
    }
}

pub(crate) fn draw_text_layer(
    cx: &mut LayerCx<'_>,
    engine: &mut TextEngine,
    layer: &TextLayer,
    lang: &str,
    kind: LayerKind,
) -> ShotResult<()> {
    let Some(text) = layer.text.resolve(lang) else {
        return Ok(());
    };
    if text.trim().is_empty() || !(layer.style.size_px.is_finite() && layer.style.size_px > 0.0) {
        return Ok(());
    }
    if !engine.has_fonts() {
        tracing::debug!(?kind, "no fonts registered, text layer skipped");
        cx.skip(kind);
        return Ok(());
    }

    let style = &layer.style;
    let req = font_request(style);
    let max_w = max_width_px(style, cx.canvas);
    let lines = wrap_words(
        text,
        max_w,
        &mut EngineMeasure {
            engine: &mut *engine,
            req: &req,
        },
    );

    let [r, g, b, a] = style.color.to_rgba8();
    let brush = TextBrushRgba8 { r, g, b, a };
    let mut shaped = Vec::with_capacity(lines.len());
    for line in &lines {
        shaped.push(engine.shape_line(line, &req, brush)?);
    }
    let widths = shaped
        .iter()
        .map(|s| s.as_ref().map_or(0.0, |s| s.width))
        .collect::<Vec<_>>();
    let origins = place_lines(style, cx.canvas, &widths);
    let advance = line_advance(style);

    for (line, origin) in shaped.iter().zip(origins) {
        let Some(line) = line else {
            continue;
        };
        let y = origin.y + (advance - line.height) / 2.0;
        fill_shaped_line(
            cx.ctx,
            line,
            affine_to_cpu(kurbo::Affine::translate((origin.x, y))),
        );
    }
    tracing::debug!(?kind, lines = lines.len(), "text layer drawn");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
