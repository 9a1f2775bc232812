//! Shotframe turns a declarative App Store screenshot scene into exact pixels.
//!
//! Two paths share the same inputs:
//!
//! - A deterministic 2-D [`Compositor`] that draws background, screenshot, headline,
//!   subheadline, badges, and grain into a [`Raster`] at any [`OutputResolution`], used for both
//!   live preview ([`PreviewSession`]) and export ([`encode_raster`]).
//! - A software 3-D [`PreviewRenderer`] that maps the screenshot onto a rotatable device mesh and
//!   runs on its own [`FrameLoop`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod export;
pub(crate) mod preview3d;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{ShotError, ShotResult};
pub use crate::foundation::math::{lerp, normalize_deg};

pub use crate::assets::cache::{BitmapCache, BitmapSource, BitmapState, NoBitmaps};
pub use crate::assets::color::Color;
pub use crate::assets::decode::{Bitmap, Origin, decode_image};
pub use crate::assets::text::{FontRequest, TextEngine, TextMeasure};

pub use crate::scene::model::{
    AnchorEdge, Badge, BadgeKind, BadgePosition, BadgeStyle, BackgroundSpec, BorderSpec,
    GradientKind, GradientSpec, GradientStop, ImageBackground, LocalizedText, NoiseSpec,
    PctPoint, Scene, ScreenshotLayer, ScreenshotTransform, ShadowSpec, TextAlign, TextLayer,
    TextStyle,
};
pub use crate::scene::resolution::OutputResolution;

pub use crate::render::background::{
    CoverFit, cover_fit, gradient_pixels, linear_endpoints, sample_stops, sorted_stops,
};
pub use crate::render::badge::{BADGE_REFERENCE_WIDTH, BadgeMetrics, badge_metrics, badge_scale};
pub use crate::render::compositor::{
    Compositor, CompositorOpts, LayerKind, NOISE_MODE_ENV, Raster,
};
pub use crate::render::coords::{CoordinateMapper, map_pct};
pub use crate::render::noise::{NoiseMode, noise_alpha};
pub use crate::render::schedule::{SchedulePolicy, Scheduler};
pub use crate::render::screenshot::{ScreenshotOp, clamp_corner_radius, plan_screenshot};
pub use crate::render::shadow::Shadow;
pub use crate::render::text::{anchor_x, line_advance, max_width_px, place_lines, wrap_words};

pub use crate::export::encode::{ExportFormat, ExportOpts, encode_raster, scaled_size};
pub use crate::session::preview_session::PreviewSession;

pub use crate::preview3d::frame_loop::{FrameLoop, run_preview};
pub use crate::preview3d::mesh::{Material, Mesh, MeshTriangle, MeshVertex};
pub use crate::preview3d::raster::{Camera, LightRig, Rasterizer, SpotLight, rotation_matrix};
pub use crate::preview3d::renderer::{
    MODEL_HEIGHT, MeshSource, Preview3dOpts, PreviewRenderer, PreviewState,
};
pub use crate::preview3d::rotation::{ROTATION_SMOOTHING, RotationSmoother};
pub use crate::preview3d::texture::{Texture, TextureSlot};
