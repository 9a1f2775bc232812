use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crate::assets::decode::{Bitmap, decode_image};
use crate::foundation::error::{ShotError, ShotResult};

/// Read-only bitmap lookup used by the compositor.
///
/// A `None` answer means "not decoded yet"; the layer that needed it is skipped for this pass.
pub trait BitmapSource {
    /// Return the decoded bitmap for `source`, if it is ready.
    fn bitmap(&self, source: &str) -> Option<Arc<Bitmap>>;
}

/// Empty source, useful for scenes without image assets.
pub struct NoBitmaps;

impl BitmapSource for NoBitmaps {
    fn bitmap(&self, _source: &str) -> Option<Arc<Bitmap>> {
        None
    }
}

/// Lifecycle of one cache entry.
#[derive(Clone, Debug)]
pub enum BitmapState {
    /// A decode is in flight.
    Pending {
        /// Ticket identifying the in-flight decode; stale completions are dropped.
        ticket: u64,
    },
    /// Decoded and ready to draw.
    Ready(Arc<Bitmap>),
    /// The source could not be read or decoded. Not retried until evicted.
    Failed(String),
}

type Completion = (String, u64, ShotResult<Bitmap>);

/// Content-keyed cache of decoded bitmaps.
///
/// Decodes run on the rayon pool. Entries live until their source reference is evicted or
/// replaced, so repeated renders never decode the same asset twice.
pub struct BitmapCache {
    assets_root: PathBuf,
    entries: HashMap<String, BitmapState>,
    decode_counts: HashMap<String, u32>,
    next_ticket: u64,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
}

impl BitmapCache {
    /// Create a cache resolving relative sources against `assets_root`.
    pub fn new(assets_root: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            assets_root: assets_root.into(),
            entries: HashMap::new(),
            decode_counts: HashMap::new(),
            next_ticket: 0,
            tx,
            rx,
        }
    }

    /// Current state for `source`, if the cache knows about it.
    pub fn state(&self, source: &str) -> Option<&BitmapState> {
        self.entries.get(source)
    }

    /// Number of decodes started for `source` since it was last evicted.
    pub fn decode_count(&self, source: &str) -> u32 {
        self.decode_counts.get(source).copied().unwrap_or(0)
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return `true` while any decode is in flight.
    pub fn has_pending(&self) -> bool {
        self.entries
            .values()
            .any(|s| matches!(s, BitmapState::Pending { .. }))
    }

    /// Return the bitmap if ready; otherwise start an asynchronous decode (once) and return
    /// `None`.
    pub fn request(&mut self, source: &str) -> Option<Arc<Bitmap>> {
        match self.entries.get(source) {
            Some(BitmapState::Ready(b)) => return Some(b.clone()),
            Some(BitmapState::Pending { .. } | BitmapState::Failed(_)) => return None,
            None => {}
        }

        let path = match self.resolve(source) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(source, error = %e, "bitmap source rejected");
                self.entries
                    .insert(source.to_owned(), BitmapState::Failed(e.to_string()));
                return None;
            }
        };

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.entries
            .insert(source.to_owned(), BitmapState::Pending { ticket });
        *self.decode_counts.entry(source.to_owned()).or_default() += 1;

        let tx = self.tx.clone();
        let key = source.to_owned();
        rayon::spawn(move || {
            let res = read_and_decode(&path);
            // The receiver only disappears when the cache is dropped; nothing to report then.
            let _ = tx.send((key, ticket, res));
        });
        tracing::debug!(source, ticket, "bitmap decode started");
        None
    }

    /// Insert an already decoded bitmap, replacing any existing entry.
    pub fn insert_decoded(&mut self, source: impl Into<String>, bitmap: Bitmap) -> Arc<Bitmap> {
        let bitmap = Arc::new(bitmap);
        self.entries
            .insert(source.into(), BitmapState::Ready(bitmap.clone()));
        bitmap
    }

    /// Drop the entry for `source`. In-flight decodes for it are discarded on arrival.
    pub fn evict(&mut self, source: &str) -> bool {
        let removed = self.entries.remove(source).is_some();
        self.decode_counts.remove(source);
        if removed {
            tracing::debug!(source, "bitmap evicted");
        }
        removed
    }

    /// Evict `old` (when it differs from `new`) and request `new`.
    pub fn replace(&mut self, old: &str, new: &str) -> Option<Arc<Bitmap>> {
        if old != new {
            self.evict(old);
        }
        self.request(new)
    }

    /// Drain finished decodes. Returns how many entries became ready.
    pub fn poll(&mut self) -> usize {
        let mut ready = 0usize;
        while let Ok(done) = self.rx.try_recv() {
            if self.apply(done) {
                ready += 1;
            }
        }
        ready
    }

    /// Block until no decode is pending or `timeout` elapses. Returns how many entries became
    /// ready.
    pub fn wait_settled(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut ready = self.poll();
        while self.has_pending() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(done) => {
                    if self.apply(done) {
                        ready += 1;
                    }
                }
                Err(_) => break,
            }
        }
        ready
    }

    fn apply(&mut self, (source, ticket, res): Completion) -> bool {
        let current = match self.entries.get(&source) {
            Some(BitmapState::Pending { ticket: t }) => *t,
            _ => {
                tracing::debug!(source = %source, ticket, "dropping stale bitmap decode");
                return false;
            }
        };
        if current != ticket {
            return false;
        }
        match res {
            Ok(bitmap) => {
                tracing::debug!(
                    source = %source,
                    width = bitmap.width,
                    height = bitmap.height,
                    "bitmap ready"
                );
                self.entries
                    .insert(source, BitmapState::Ready(Arc::new(bitmap)));
                true
            }
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "bitmap decode failed");
                self.entries
                    .insert(source, BitmapState::Failed(e.to_string()));
                false
            }
        }
    }

    fn resolve(&self, source: &str) -> ShotResult<PathBuf> {
        if source.contains("://") {
            return Err(ShotError::asset(format!(
                "remote bitmap source '{source}' is not fetched; insert it decoded instead"
            )));
        }
        let norm = normalize_rel_path(source)?;
        Ok(self.assets_root.join(Path::new(&norm)))
    }
}

impl BitmapSource for BitmapCache {
    fn bitmap(&self, source: &str) -> Option<Arc<Bitmap>> {
        match self.entries.get(source) {
            Some(BitmapState::Ready(b)) => Some(b.clone()),
            _ => None,
        }
    }
}

fn read_and_decode(path: &Path) -> ShotResult<Bitmap> {
    let bytes = std::fs::read(path).map_err(|e| {
        ShotError::asset(format!("failed to read bitmap '{}': {e}", path.display()))
    })?;
    decode_image(&bytes)
}

/// Normalize and validate asset-root-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> ShotResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ShotError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(ShotError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ShotError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ShotError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
