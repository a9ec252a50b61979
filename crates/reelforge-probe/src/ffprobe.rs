//! FFprobe-based [`Prober`] implementation.
//!
//! Runs `ffprobe <args> <path>` and reads the human-readable stream summary
//! ffprobe prints for every input, e.g.
//!
//! ```text
//! Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'a.mov':
//!   Duration: 00:00:04.17, start: 0.000000, bitrate: 5012 kb/s
//!   Stream #0:0[0x1](und): Video: h264 (High), yuv420p, 1920x1080, 24 fps, 24 tbr
//!   Stream #0:1[0x2](und): Audio: aac (LC), 48000 Hz, stereo, fltp, 192 kb/s
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::prober::Prober;
use crate::tools::get_tool_path;
use crate::types::{AudioProbe, StreamCounts};

pub(crate) const TOOL: &str = "ffprobe";

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration:\s+(\d+):(\d{1,2}):(\d{1,2}(?:\.\d+)?)").expect("valid duration regex")
});

static STREAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Stream #\d+:\d+\S*:\s+(\w+):").expect("valid stream regex")
});

static FPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)(k?)\s+fps").expect("valid fps regex"));

/// Text captured from one ffprobe run.
#[derive(Debug, Clone)]
struct ToolOutput {
    stdout: String,
    stderr: String,
}

impl ToolOutput {
    /// ffprobe prints its stream summary on stderr, but wrappers and
    /// `-report` setups may redirect it, so both streams are read.
    fn text(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    /// Path to the ffprobe binary.
    ffprobe_path: PathBuf,
    /// Arguments placed before the media path.
    args: Vec<String>,
}

impl FfprobeProber {
    /// Create a new prober using the given ffprobe path.
    pub fn new(ffprobe_path: PathBuf) -> Self {
        Self {
            ffprobe_path,
            args: vec!["-hide_banner".to_string()],
        }
    }

    /// Create a prober that finds ffprobe on `PATH`.
    pub fn from_path() -> Result<Self> {
        Self::from_config(None)
    }

    /// Create a prober preferring a configured binary over `PATH` lookup.
    pub fn from_config(configured: Option<&Path>) -> Result<Self> {
        get_tool_path(TOOL, configured).map(Self::new)
    }

    /// Replace the arguments placed before the media path.
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe_path
    }

    fn run(&self, path: &Path, purpose: &str) -> Result<ToolOutput> {
        tracing::debug!(path = %path.display(), purpose, "running {}", TOOL);

        let output = Command::new(&self.ffprobe_path)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::tool_not_found(self.ffprobe_path.display().to_string())
                } else {
                    Error::Io(e)
                }
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(Error::probe_failure(
                TOOL,
                path,
                format!("exited with status {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr,
        })
    }
}

impl Prober for FfprobeProber {
    fn name(&self) -> &'static str {
        TOOL
    }

    fn probe_video_audio(&self, path: &Path) -> Result<StreamCounts> {
        let output = self.run(path, "video/audio")?;
        Ok(parse_stream_counts(&output.text()))
    }

    fn probe_audio(&self, path: &Path) -> Result<AudioProbe> {
        let text = self.run(path, "audio")?.text();
        Ok(AudioProbe {
            audio: parse_stream_counts(&text).audio,
            duration_seconds: parse_duration(&text).unwrap_or(0.0),
        })
    }

    fn probe_fps(&self, path: &Path) -> Result<Option<f64>> {
        let output = self.run(path, "framerate")?;
        Ok(parse_fps(&output.text()))
    }
}

/// Count `Video` and `Audio` stream lines.
pub fn parse_stream_counts(text: &str) -> StreamCounts {
    let mut counts = StreamCounts::default();
    for caps in text.lines().filter_map(|line| STREAM_RE.captures(line)) {
        match &caps[1] {
            "Video" => counts.video += 1,
            "Audio" => counts.audio += 1,
            _ => {}
        }
    }
    counts
}

/// Read the container duration (`Duration: H:MM:SS.fff`) in seconds.
pub fn parse_duration(text: &str) -> Option<f64> {
    let caps = DURATION_RE.captures(text)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Read the frame rate of the first video stream that reports one.
pub fn parse_fps(text: &str) -> Option<f64> {
    text.lines()
        .filter(|line| {
            STREAM_RE
                .captures(line)
                .is_some_and(|caps| &caps[1] == "Video")
        })
        .find_map(|line| {
            let caps = FPS_RE.captures(line)?;
            let value: f64 = caps[1].parse().ok()?;
            let scale = if &caps[2] == "k" { 1000.0 } else { 1.0 };
            Some(value * scale).filter(|fps| *fps > 0.0)
        })
}
