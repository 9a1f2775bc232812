use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assets::color::Color;
use crate::foundation::error::{ShotError, ShotResult};

/// Full declarative description of one marketing screenshot.
///
/// A scene is a value object: the compositor reads it and never mutates or retains it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Frame background.
    pub background: BackgroundSpec,
    /// The captured device image and its placement.
    pub screenshot: ScreenshotLayer,
    /// Headline text layer.
    pub headline: TextLayer,
    /// Subheadline text layer.
    pub subheadline: TextLayer,
    /// Full-frame grain.
    pub noise: NoiseSpec,
    /// Decorative badges, drawn in order.
    pub badges: Vec<Badge>,
}

impl Scene {
    /// Parse a scene from JSON.
    pub fn from_json(json: &str) -> ShotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every bitmap reference the scene draws, background first.
    pub fn bitmap_sources(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let BackgroundSpec::Image(img) = &self.background {
            out.push(img.source.as_str());
        }
        if let Some(s) = self.screenshot.source.as_deref() {
            out.push(s);
        }
        out
    }

    /// Editor-side sanity checks.
    ///
    /// Rendering never calls this: degenerate values draw nothing. The CLI uses it to reject
    /// bad input files early.
    pub fn validate(&self) -> ShotResult<()> {
        if let BackgroundSpec::Gradient(g) = &self.background
            && g.stops.len() < 2
        {
            return Err(ShotError::validation("gradient needs at least 2 stops"));
        }
        if let BackgroundSpec::Image(img) = &self.background
            && !(0.0..=1.0).contains(&img.overlay_opacity)
        {
            return Err(ShotError::validation("overlay_opacity must be in [0, 1]"));
        }
        let t = &self.screenshot.transform;
        if !t.scale.is_finite() || t.scale <= 0.0 {
            return Err(ShotError::validation("screenshot scale must be finite and > 0"));
        }
        if t.corner_radius_px < 0.0 {
            return Err(ShotError::validation("corner_radius_px must be >= 0"));
        }
        for (name, layer) in [("headline", &self.headline), ("subheadline", &self.subheadline)] {
            if !layer.style.size_px.is_finite() || layer.style.size_px <= 0.0 {
                return Err(ShotError::validation(format!(
                    "{name} size_px must be finite and > 0"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.noise.opacity) {
            return Err(ShotError::validation("noise opacity must be in [0, 1]"));
        }
        for badge in &self.badges {
            if !badge.position.scale.is_finite() || badge.position.scale <= 0.0 {
                return Err(ShotError::validation("badge scale must be finite and > 0"));
            }
        }
        Ok(())
    }
}

/// Frame background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundSpec {
    /// Flat fill.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// Linear or radial gradient.
    Gradient(GradientSpec),
    /// Cover-fit image with optional blur and color overlay.
    Image(ImageBackground),
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        Self::Solid {
            color: Color::WHITE,
        }
    }
}

/// Gradient geometry kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientKind {
    /// Axis through the frame center at `angle_deg` (0° runs top to bottom).
    #[default]
    Linear,
    /// Centered circle, radius = half the larger frame side.
    Radial,
}

/// Gradient background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    /// Linear or radial.
    #[serde(default)]
    pub kind: GradientKind,
    /// Axis angle in degrees (linear only).
    #[serde(default)]
    pub angle_deg: f64,
    /// Color stops in any order; rendering sorts them by position.
    pub stops: Vec<GradientStop>,
}

/// One gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Stop color.
    pub color: Color,
    /// Position along the gradient in `0..=100`.
    pub position: f64,
}

/// Image background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBackground {
    /// Bitmap reference.
    pub source: String,
    /// Gaussian blur applied to the drawn image, in pixels. `0` disables it.
    #[serde(default)]
    pub blur_px: f64,
    /// Overlay color filled over the image.
    #[serde(default)]
    pub overlay_color: Color,
    /// Overlay opacity in `0..=1`. `0` disables the overlay.
    #[serde(default)]
    pub overlay_opacity: f64,
}

/// Percentage-relative point. `0..=100` is on-frame; other values are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PctPoint {
    /// Horizontal percentage.
    pub x_pct: f64,
    /// Vertical percentage.
    pub y_pct: f64,
}

impl Default for PctPoint {
    fn default() -> Self {
        Self {
            x_pct: 50.0,
            y_pct: 50.0,
        }
    }
}

/// Screenshot bitmap plus its transform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotLayer {
    /// Bitmap reference; `None` draws nothing.
    pub source: Option<String>,
    /// Placement and decoration.
    pub transform: ScreenshotTransform,
}

/// Placement and decoration of the screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotTransform {
    /// Center of the screenshot.
    pub position: PctPoint,
    /// Multiplier over the bitmap's native size.
    pub scale: f64,
    /// Clockwise rotation in degrees about the center.
    pub rotation_deg: f64,
    /// Corner radius in output pixels (clamped to half the smaller scaled side).
    pub corner_radius_px: f64,
    /// Drop shadow under the screenshot.
    pub shadow: ShadowSpec,
    /// Stroke around the screenshot.
    pub border: BorderSpec,
}

impl Default for ScreenshotTransform {
    fn default() -> Self {
        Self {
            position: PctPoint::default(),
            scale: 1.0,
            rotation_deg: 0.0,
            corner_radius_px: 0.0,
            shadow: ShadowSpec::default(),
            border: BorderSpec::default(),
        }
    }
}

/// Drop shadow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSpec {
    /// Draw the shadow.
    pub enabled: bool,
    /// Shadow color (alpha included).
    pub color: Color,
    /// Blur in pixels, with canvas `shadowBlur` semantics (sigma = blur / 2).
    pub blur_px: f64,
    /// Horizontal offset in pixels, unaffected by rotation.
    pub offset_x: f64,
    /// Vertical offset in pixels, unaffected by rotation.
    pub offset_y: f64,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::rgba(0.0, 0.0, 0.0, 0.35),
            blur_px: 40.0,
            offset_x: 0.0,
            offset_y: 20.0,
        }
    }
}

/// Border stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSpec {
    /// Draw the border.
    pub enabled: bool,
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width_px: f64,
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color::WHITE,
            width_px: 4.0,
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Left edge of the text column.
    Left,
    /// Frame center.
    #[default]
    Center,
    /// Right edge of the text column.
    Right,
}

/// Which frame edge the text block hangs from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorEdge {
    /// `offset_y_px` below the top edge.
    #[default]
    Top,
    /// `offset_y_px` above the bottom edge.
    Bottom,
}

/// Typography for one text layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// CSS-style weight.
    pub weight: f32,
    /// Font size in pixels.
    pub size_px: f64,
    /// Text color.
    pub color: Color,
    /// Horizontal alignment.
    pub alignment: TextAlign,
    /// Vertical anchor edge.
    pub anchor_edge: AnchorEdge,
    /// Distance from the anchor edge in pixels.
    pub offset_y_px: f64,
    /// Extra advance between glyphs in pixels.
    pub letter_spacing: f64,
    /// Line advance as a multiple of `size_px`.
    pub line_height_multiplier: f64,
    /// Wrap width as a percentage of the frame width.
    pub max_width_pct: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_owned(),
            weight: 700.0,
            size_px: 96.0,
            color: Color::BLACK,
            alignment: TextAlign::Center,
            anchor_edge: AnchorEdge::Top,
            offset_y_px: 160.0,
            letter_spacing: 0.0,
            line_height_multiplier: 1.2,
            max_width_pct: 85.0,
        }
    }
}

/// Language code to string map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    /// Single-language convenience constructor.
    pub fn single(lang: &str, text: &str) -> Self {
        let mut m = BTreeMap::new();
        m.insert(lang.to_owned(), text.to_owned());
        Self(m)
    }

    /// Resolve `lang`, then `en`, then the first available key (in key order).
    pub fn resolve(&self, lang: &str) -> Option<&str> {
        self.0
            .get(lang)
            .or_else(|| self.0.get("en"))
            .or_else(|| self.0.values().next())
            .map(String::as_str)
    }
}

/// Text style paired with its localized strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextLayer {
    /// Typography.
    pub style: TextStyle,
    /// Per-language text.
    pub text: LocalizedText,
}

/// Grain layer settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSpec {
    /// Draw the grain.
    pub enabled: bool,
    /// Grain alpha in `0..=1`.
    pub opacity: f64,
}

/// What a badge represents. Rendering is identical for every kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    /// Short pill label ("New", "Free").
    #[default]
    Pill,
    /// Star rating.
    Rating,
    /// Award or press quote.
    Award,
    /// Free-form widget.
    Custom,
}

/// Badge placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgePosition {
    /// Horizontal center percentage.
    pub x_pct: f64,
    /// Vertical center percentage.
    pub y_pct: f64,
    /// Clockwise rotation in degrees about the badge center.
    pub rotate_deg: f64,
    /// Extra scale on top of the resolution scale.
    pub scale: f64,
}

impl Default for BadgePosition {
    fn default() -> Self {
        Self {
            x_pct: 50.0,
            y_pct: 50.0,
            rotate_deg: 0.0,
            scale: 1.0,
        }
    }
}

/// Badge look. Pixel metrics are defined at the 1290 px reference width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeStyle {
    /// Box fill.
    pub background_color: Color,
    /// Text color.
    pub text_color: Color,
    /// Corner radius.
    pub border_radius_px: f64,
    /// Horizontal padding.
    pub padding_x: f64,
    /// Vertical padding.
    pub padding_y: f64,
    /// Drop a soft shadow under the box.
    pub shadow: bool,
    /// Font family.
    pub font_family: String,
    /// CSS-style weight.
    pub font_weight: f32,
    /// Main text size.
    pub font_size_px: f64,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            text_color: Color::BLACK,
            border_radius_px: 999.0,
            padding_x: 32.0,
            padding_y: 16.0,
            shadow: true,
            font_family: "Inter".to_owned(),
            font_weight: 600.0,
            font_size_px: 40.0,
        }
    }
}

/// Decorative badge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Badge {
    /// Category.
    pub kind: BadgeKind,
    /// Main line.
    pub text: String,
    /// Optional smaller second line.
    pub subtext: Option<String>,
    /// Placement.
    pub position: BadgePosition,
    /// Look.
    pub style: BadgeStyle,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
