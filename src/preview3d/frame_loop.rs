use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::foundation::error::{ShotError, ShotResult};
use crate::preview3d::renderer::PreviewRenderer;
use crate::render::compositor::Raster;

/// Background thread calling a tick function at a fixed rate until stopped.
///
/// Stopping is cooperative: [`FrameLoop::stop`] (or dropping the loop) raises a flag and joins
/// the thread, so no loop outlives its owner.
pub struct FrameLoop {
    stop: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl FrameLoop {
    /// Start ticking at `fps`. `on_tick` receives the tick index and returns `false` to end
    /// the loop early.
    pub fn start<F>(fps: u32, mut on_tick: F) -> ShotResult<Self>
    where
        F: FnMut(u64) -> bool + Send + 'static,
    {
        if fps == 0 {
            return Err(ShotError::validation("frame loop fps must be > 0"));
        }
        let interval = Duration::from_secs_f64(1.0 / f64::from(fps));
        let stop = Arc::new(AtomicBool::new(false));
        let ticks = Arc::new(AtomicU64::new(0));

        let (stop_t, ticks_t) = (stop.clone(), ticks.clone());
        let handle = std::thread::Builder::new()
            .name("shotframe-frame-loop".to_owned())
            .spawn(move || {
                let mut n = 0u64;
                while !stop_t.load(Ordering::Acquire) {
                    let started = Instant::now();
                    let keep = on_tick(n);
                    n += 1;
                    ticks_t.store(n, Ordering::Release);
                    if !keep {
                        break;
                    }
                    std::thread::sleep(interval.saturating_sub(started.elapsed()));
                }
            })
            .context("spawn frame loop thread")?;

        tracing::debug!(fps, "frame loop started");
        Ok(Self {
            stop,
            ticks,
            handle: Some(handle),
        })
    }

    /// Signal the thread and wait for it to exit. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("frame loop thread panicked");
            }
            tracing::debug!(ticks = self.ticks(), "frame loop stopped");
        }
    }

    /// Whether the thread is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drive `renderer` on its own frame loop, handing each drawn frame to `sink`.
pub fn run_preview<S>(renderer: Arc<Mutex<PreviewRenderer>>, mut sink: S) -> ShotResult<FrameLoop>
where
    S: FnMut(Raster) + Send + 'static,
{
    let fps = renderer
        .lock()
        .map_err(|_| ShotError::render("preview renderer lock poisoned"))?
        .opts()
        .fps();
    FrameLoop::start(fps, move |_| {
        let frame = match renderer.lock() {
            Ok(mut r) => r.tick(),
            Err(_) => return false,
        };
        if let Some(frame) = frame {
            sink(frame);
        }
        true
    })
}

#[cfg(test)]
#[path = "../../tests/unit/preview3d/frame_loop.rs"]
mod tests;
