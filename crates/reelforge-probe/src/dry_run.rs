//! A [`Prober`] that never runs an external process.

use std::path::Path;

use crate::error::Result;
use crate::prober::Prober;
use crate::types::{AudioProbe, StreamCounts};

/// Returns fixed values for every path and only logs the command it would
/// have run. Useful for deterministic tests and `--dry-run` conversions.
///
/// The defaults are sentinels: one video and one audio stream, one second of
/// audio, one frame per second.
#[derive(Debug, Clone)]
pub struct DryRunProber {
    command: Vec<String>,
    streams: StreamCounts,
    audio: AudioProbe,
    fps: Option<f64>,
}

impl DryRunProber {
    pub fn new() -> Self {
        Self {
            command: vec!["ffprobe".to_string(), "-hide_banner".to_string()],
            streams: StreamCounts::new(1, 1),
            audio: AudioProbe {
                audio: 1,
                duration_seconds: 1.0,
            },
            fps: Some(1.0),
        }
    }

    /// Set the command line echoed in the log (tool followed by arguments).
    pub fn with_command(mut self, command: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_streams(mut self, video: u32, audio: u32) -> Self {
        self.streams = StreamCounts::new(video, audio);
        self
    }

    pub fn with_audio(mut self, audio: u32, duration_seconds: f64) -> Self {
        self.audio = AudioProbe {
            audio,
            duration_seconds,
        };
        self
    }

    pub fn with_fps(mut self, fps: Option<f64>) -> Self {
        self.fps = fps;
        self
    }

    fn log(&self, path: &Path) {
        tracing::info!("dry run: {} {}", self.command.join(" "), path.display());
    }
}

impl Default for DryRunProber {
    fn default() -> Self {
        Self::new()
    }
}

impl Prober for DryRunProber {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    fn probe_video_audio(&self, path: &Path) -> Result<StreamCounts> {
        self.log(path);
        Ok(self.streams)
    }

    fn probe_audio(&self, path: &Path) -> Result<AudioProbe> {
        self.log(path);
        Ok(self.audio)
    }

    fn probe_fps(&self, path: &Path) -> Result<Option<f64>> {
        self.log(path);
        Ok(self.fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sentinels() {
        let prober = DryRunProber::new();
        let path = Path::new("/nowhere/a.mov");
        assert_eq!(prober.probe_video_audio(path).unwrap(), StreamCounts::new(1, 1));
        assert_eq!(prober.probe_fps(path).unwrap(), Some(1.0));
        assert_eq!(prober.probe_audio(path).unwrap().duration_seconds, 1.0);
    }

    #[test]
    fn builders_override_values() {
        let prober = DryRunProber::new()
            .with_streams(2, 0)
            .with_audio(1, 12.5)
            .with_fps(None);
        let summary = prober.summary(Path::new("b.mov")).unwrap();
        assert_eq!(summary.streams, StreamCounts::new(2, 0));
        assert_eq!(summary.duration_seconds, 12.5);
        assert_eq!(summary.fps, None);
    }
}
