//! The [`Prober`] trait defining the interface for media introspection.

use std::path::Path;

use crate::error::Result;
use crate::types::{AudioProbe, MediaSummary, StreamCounts};

/// A media prober used while rebuilding a timeline from a shot list.
///
/// Implementations must be safe to share across threads (`Send + Sync`) so
/// independent conversions can run in parallel.
pub trait Prober: Send + Sync {
    /// Human-readable name identifying this prober implementation.
    fn name(&self) -> &'static str;

    /// Count the video and audio streams in the file.
    fn probe_video_audio(&self, path: &Path) -> Result<StreamCounts>;

    /// Count the audio streams and read the running time of an audio file.
    fn probe_audio(&self, path: &Path) -> Result<AudioProbe>;

    /// Read the frame rate of the first video stream.
    ///
    /// Returns `Ok(None)` when the tool ran but reported no rate; callers
    /// decide on a fallback.
    fn probe_fps(&self, path: &Path) -> Result<Option<f64>>;

    /// Gather all three probes for one file.
    fn summary(&self, path: &Path) -> Result<MediaSummary> {
        let streams = self.probe_video_audio(path)?;
        let audio = self.probe_audio(path)?;
        let fps = self.probe_fps(path)?;
        Ok(MediaSummary {
            path: path.to_path_buf(),
            streams,
            duration_seconds: audio.duration_seconds,
            fps,
        })
    }
}
