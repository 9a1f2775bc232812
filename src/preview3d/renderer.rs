use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use anyhow::Context;
use glam::{Vec3, Vec4};

use crate::assets::decode::Bitmap;
use crate::foundation::error::{ShotError, ShotResult};
use crate::preview3d::mesh::Mesh;
use crate::preview3d::raster::{Camera, LightRig, Rasterizer, rotation_matrix};
use crate::preview3d::rotation::{ROTATION_SMOOTHING, RotationSmoother};
use crate::preview3d::texture::TextureSlot;
use crate::render::compositor::Raster;
use crate::render::schedule::{SchedulePolicy, Scheduler};

/// Height of the loaded device model in world units.
pub const MODEL_HEIGHT: f32 = 2.0;

/// Lifecycle of the 3-D preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewState {
    /// Not entered.
    Idle,
    /// Mesh load in flight.
    Loading,
    /// Mesh available, no frame drawn yet.
    Ready,
    /// Frames are being produced.
    Rendering,
}

/// Where the device model comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshSource {
    /// Flat plane with the screenshot's aspect ratio.
    Plane,
    /// Wavefront OBJ text.
    ObjText(String),
    /// Wavefront OBJ file on disk.
    ObjFile(PathBuf),
}

/// Options for the 3-D preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preview3dOpts {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) smoothing: f32,
    pub(crate) fps: u32,
    pub(crate) clear_rgba: [u8; 4],
    pub(crate) body_rgba: [u8; 4],
}

impl Default for Preview3dOpts {
    fn default() -> Self {
        Self {
            width: 540,
            height: 960,
            smoothing: ROTATION_SMOOTHING,
            fps: 60,
            clear_rgba: [0, 0, 0, 0],
            body_rgba: [28, 28, 30, 255],
        }
    }
}

impl Preview3dOpts {
    /// Return options with the given viewport size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Return options with the given per-frame rotation blend weight.
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Return options with the given frame-loop rate.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Return options with the given background color (straight RGBA8).
    pub fn with_clear_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.clear_rgba = rgba;
        self
    }

    /// Return options with the given device body color (straight RGBA8).
    pub fn with_body_rgba(mut self, rgba: [u8; 4]) -> Self {
        self.body_rgba = rgba;
        self
    }

    /// Frame-loop rate.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    fn validate(&self) -> ShotResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ShotError::validation("preview size must be non-zero"));
        }
        if self.fps == 0 {
            return Err(ShotError::validation("preview fps must be > 0"));
        }
        Ok(())
    }
}

fn premul(rgba: [u8; 4]) -> Vec4 {
    let a = f32::from(rgba[3]) / 255.0;
    Vec4::new(
        f32::from(rgba[0]) / 255.0 * a,
        f32::from(rgba[1]) / 255.0 * a,
        f32::from(rgba[2]) / 255.0 * a,
        a,
    )
}

/// Renders the screenshot on a rotatable device mesh.
///
/// The mesh loads off-thread; [`PreviewRenderer::tick`] polls it, keeps the screenshot texture
/// in sync, eases the rotation one step, and draws a frame.
pub struct PreviewRenderer {
    opts: Preview3dOpts,
    state: PreviewState,
    camera: Camera,
    lights: LightRig,
    mesh: Option<Arc<Mesh>>,
    mesh_rx: Option<Receiver<ShotResult<Option<Mesh>>>>,
    fallback: bool,
    screenshot: Option<(String, Arc<Bitmap>)>,
    slot: TextureSlot,
    rotation: RotationSmoother,
    scheduler: Scheduler,
    raster: Rasterizer,
    frames: u64,
}

impl PreviewRenderer {
    /// Idle renderer.
    pub fn new(opts: Preview3dOpts) -> ShotResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            state: PreviewState::Idle,
            camera: Camera::default(),
            lights: LightRig::default(),
            mesh: None,
            mesh_rx: None,
            fallback: false,
            screenshot: None,
            slot: TextureSlot::new(),
            rotation: RotationSmoother::new(opts.smoothing),
            scheduler: Scheduler::new(SchedulePolicy::EveryFrame),
            raster: Rasterizer::new(opts.width, opts.height),
            frames: 0,
        })
    }

    /// Options in effect.
    pub fn opts(&self) -> &Preview3dOpts {
        &self.opts
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PreviewState {
        self.state
    }

    /// Enter 3-D mode: start loading `mesh` and show `screenshot` (known as `source`) on it.
    pub fn enter(&mut self, mesh: MeshSource, source: &str, screenshot: Arc<Bitmap>) {
        self.exit();
        self.screenshot = Some((source.to_owned(), screenshot));
        self.state = PreviewState::Loading;

        let (tx, rx) = mpsc::channel();
        self.mesh_rx = Some(rx);
        rayon::spawn(move || {
            let res = load_mesh(mesh);
            // The receiver is gone only if the preview was exited first.
            let _ = tx.send(res);
        });
        tracing::debug!(source, "3-D preview loading");
    }

    /// Leave 3-D mode, releasing the mesh and texture.
    pub fn exit(&mut self) {
        self.slot.dispose();
        self.mesh = None;
        self.mesh_rx = None;
        self.fallback = false;
        if self.state != PreviewState::Idle {
            tracing::debug!(frames = self.frames, "3-D preview exited");
        }
        self.state = PreviewState::Idle;
    }

    /// Swap the screenshot. The texture is rebuilt on the next tick if `source` changed.
    pub fn set_screenshot(&mut self, source: &str, screenshot: Arc<Bitmap>) {
        self.screenshot = Some((source.to_owned(), screenshot));
    }

    /// Rotation (degrees, X/Y/Z) the mesh eases toward.
    pub fn set_rotation_target(&mut self, degrees: Vec3) {
        self.rotation.set_target(degrees);
    }

    /// Rotation state.
    pub fn rotation(&self) -> &RotationSmoother {
        &self.rotation
    }

    /// Texture bookkeeping.
    pub fn texture_slot(&self) -> &TextureSlot {
        &self.slot
    }

    /// Loaded mesh, if any.
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        self.mesh.as_ref()
    }

    /// Whether the mesh failed to load and the flat plane is shown instead.
    pub fn used_fallback(&self) -> bool {
        self.fallback
    }

    /// Frames drawn since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Pick up a finished mesh load. Returns `true` when the preview became ready.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.mesh_rx else {
            return false;
        };
        match rx.try_recv() {
            Ok(res) => {
                self.finish_load(res);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.finish_load(Err(ShotError::asset("mesh loader vanished")));
                true
            }
        }
    }

    /// Block until the mesh load finishes or `timeout` elapses.
    pub fn wait_ready(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state == PreviewState::Loading {
            let Some(rx) = &self.mesh_rx else {
                return false;
            };
            let left = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(left) {
                Ok(res) => self.finish_load(res),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => {
                    self.finish_load(Err(ShotError::asset("mesh loader vanished")));
                }
            }
        }
        self.state != PreviewState::Idle
    }

    fn finish_load(&mut self, res: ShotResult<Option<Mesh>>) {
        self.mesh_rx = None;
        let aspect = self
            .screenshot
            .as_ref()
            .map_or(1.0, |(_, b)| b.aspect() as f32);
        let mesh = match res {
            Ok(Some(mesh)) => mesh.fit_height(MODEL_HEIGHT),
            Ok(None) => Mesh::plane(aspect),
            Err(e) => {
                tracing::warn!(error = %e, "device mesh failed to load, using flat plane");
                self.fallback = true;
                Mesh::plane(aspect)
            }
        };
        tracing::debug!(triangles = mesh.triangles.len(), "3-D preview ready");
        self.mesh = Some(Arc::new(mesh));
        self.state = PreviewState::Ready;
    }

    /// Advance one frame. Returns `None` until the mesh is ready.
    pub fn tick(&mut self) -> Option<Raster> {
        self.poll();
        if matches!(self.state, PreviewState::Idle | PreviewState::Loading) {
            return None;
        }
        let mesh = self.mesh.clone()?;

        if let Some((source, bitmap)) = &self.screenshot {
            self.slot.sync(source, bitmap);
        }
        let degrees = self.rotation.step();
        if !self.scheduler.take_due() {
            return None;
        }

        self.raster.clear(premul(self.opts.clear_rgba));
        self.raster.draw_mesh(
            &mesh,
            rotation_matrix(degrees),
            &self.camera,
            &self.lights,
            self.slot.texture().map(|t| t.as_ref()),
            premul(self.opts.body_rgba),
        );
        self.state = PreviewState::Rendering;
        self.frames += 1;
        Some(Raster {
            width: self.raster.width(),
            height: self.raster.height(),
            data: self.raster.to_rgba8_premul(),
            tainted: false,
            skipped: Vec::new(),
        })
    }
}

fn load_mesh(source: MeshSource) -> ShotResult<Option<Mesh>> {
    match source {
        MeshSource::Plane => Ok(None),
        MeshSource::ObjText(text) => Mesh::parse_obj(&text).map(Some),
        MeshSource::ObjFile(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("read mesh '{}'", path.display()))?;
            Mesh::parse_obj(&text).map(Some)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview3d/renderer.rs"]
mod tests;
