//! Per-path memoisation of probe results.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::Result;
use crate::prober::Prober;
use crate::types::{AudioProbe, StreamCounts};

/// Wraps a [`Prober`] so each operation runs at most once per path.
///
/// Failures are not cached; a failed probe is retried on the next call.
pub struct CachingProber<P> {
    inner: P,
    streams: Mutex<HashMap<PathBuf, StreamCounts>>,
    audio: Mutex<HashMap<PathBuf, AudioProbe>>,
    fps: Mutex<HashMap<PathBuf, Option<f64>>>,
}

impl<P: Prober> CachingProber<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            streams: Mutex::new(HashMap::new()),
            audio: Mutex::new(HashMap::new()),
            fps: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

fn cached<V: Clone>(
    cache: &Mutex<HashMap<PathBuf, V>>,
    key: &Path,
    probe: impl FnOnce() -> Result<V>,
) -> Result<V> {
    if let Some(hit) = cache.lock().get(key) {
        tracing::trace!(path = %key.display(), "probe cache hit");
        return Ok(hit.clone());
    }
    let value = probe()?;
    cache.lock().insert(key.to_path_buf(), value.clone());
    Ok(value)
}

impl<P: Prober> Prober for CachingProber<P> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn probe_video_audio(&self, path: &Path) -> Result<StreamCounts> {
        cached(&self.streams, path, || self.inner.probe_video_audio(path))
    }

    fn probe_audio(&self, path: &Path) -> Result<AudioProbe> {
        cached(&self.audio, path, || self.inner.probe_audio(path))
    }

    fn probe_fps(&self, path: &Path) -> Result<Option<f64>> {
        cached(&self.fps, path, || self.inner.probe_fps(path))
    }
}
