use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::assets::cache::BitmapCache;
use crate::export::encode::{ExportOpts, encode_raster};
use crate::foundation::error::ShotResult;
use crate::render::compositor::{Compositor, Raster};
use crate::render::schedule::{SchedulePolicy, Scheduler};
use crate::scene::model::{PctPoint, Scene};
use crate::scene::resolution::OutputResolution;

/// Live 2-D preview: one scene, one output size, bitmaps decoded in the background.
///
/// Every mutation renders synchronously. Bitmaps that finish decoding later trigger one extra
/// pass from [`PreviewSession::pump`]. Export goes through the same render call, so the preview
/// and the exported file match.
pub struct PreviewSession {
    compositor: Compositor,
    cache: BitmapCache,
    scheduler: Scheduler,
    scene: Scene,
    resolution: OutputResolution,
    lang: String,
    last: Option<Raster>,
}

impl PreviewSession {
    /// Session resolving bitmap sources under `assets_root`.
    pub fn new(
        compositor: Compositor,
        assets_root: impl Into<PathBuf>,
        resolution: OutputResolution,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            compositor,
            cache: BitmapCache::new(assets_root),
            scheduler: Scheduler::new(SchedulePolicy::OnDemand),
            scene: Scene::default(),
            resolution,
            lang: lang.into(),
            last: None,
        }
    }

    /// Current scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Bitmap cache backing this session.
    pub fn cache(&self) -> &BitmapCache {
        &self.cache
    }

    /// Mutable bitmap cache, e.g. to insert pre-decoded or cross-origin bitmaps.
    pub fn cache_mut(&mut self) -> &mut BitmapCache {
        &mut self.cache
    }

    /// Compositor used for every pass.
    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<&Raster> {
        self.last.as_ref()
    }

    /// Render passes performed so far.
    pub fn render_count(&self) -> u64 {
        self.scheduler.passes()
    }

    /// Replace the whole scene and render.
    pub fn set_scene(&mut self, scene: Scene) -> ShotResult<&Raster> {
        self.update_scene(|s| *s = scene)
    }

    /// Apply `edit` to the scene and render.
    pub fn update_scene(&mut self, edit: impl FnOnce(&mut Scene)) -> ShotResult<&Raster> {
        let before = sources(&self.scene);
        edit(&mut self.scene);
        let after = sources(&self.scene);
        for stale in before.difference(&after) {
            self.cache.evict(stale);
        }
        self.scheduler.invalidate();
        self.render_now()
    }

    /// Drag handler: move the screenshot center and render.
    pub fn set_screenshot_position(&mut self, position: PctPoint) -> ShotResult<&Raster> {
        self.update_scene(|s| s.screenshot.transform.position = position)
    }

    /// Switch the active language and render.
    pub fn set_language(&mut self, lang: impl Into<String>) -> ShotResult<&Raster> {
        self.lang = lang.into();
        self.scheduler.invalidate();
        self.render_now()
    }

    /// Switch the output device and render.
    pub fn set_resolution(&mut self, resolution: OutputResolution) -> ShotResult<&Raster> {
        self.resolution = resolution;
        self.scheduler.invalidate();
        self.render_now()
    }

    /// Collect finished decodes; renders once more if any bitmap became ready.
    pub fn pump(&mut self) -> ShotResult<Option<&Raster>> {
        if self.cache.poll() > 0 {
            self.scheduler.invalidate();
        }
        self.render_if_due()
    }

    /// Wait up to `timeout` for pending decodes, then behave like [`PreviewSession::pump`].
    pub fn wait_for_assets(&mut self, timeout: Duration) -> ShotResult<Option<&Raster>> {
        if self.cache.wait_settled(timeout) > 0 {
            self.scheduler.invalidate();
        }
        self.render_if_due()
    }

    /// Render the current scene once more and encode it.
    pub fn export(&mut self, opts: &ExportOpts) -> ShotResult<Vec<u8>> {
        self.scheduler.invalidate();
        let raster = self.render_now()?;
        encode_raster(raster, opts)
    }

    fn render_if_due(&mut self) -> ShotResult<Option<&Raster>> {
        if !self.scheduler.is_due() {
            return Ok(None);
        }
        self.render_now().map(Some)
    }

    fn render_now(&mut self) -> ShotResult<&Raster> {
        self.scheduler.take_due();
        for source in self.scene.bitmap_sources() {
            self.cache.request(source);
        }
        let raster = self.compositor.render(
            &self.scene,
            self.resolution,
            &self.lang,
            &self.cache,
        )?;
        if !raster.skipped.is_empty() {
            tracing::debug!(skipped = ?raster.skipped, "render pass incomplete");
        }
        Ok(self.last.insert(raster))
    }
}

fn sources(scene: &Scene) -> BTreeSet<String> {
    scene
        .bitmap_sources()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview_session.rs"]
mod tests;
