//! Probe result types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of concurrent streams of each kind in a media file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCounts {
    pub video: u32,
    pub audio: u32,
}

impl StreamCounts {
    pub const fn new(video: u32, audio: u32) -> Self {
        Self { video, audio }
    }
}

/// Audio stream count and running time of a pure-audio attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioProbe {
    pub audio: u32,
    pub duration_seconds: f64,
}

/// Everything the prober can tell about one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub path: PathBuf,
    pub streams: StreamCounts,
    pub duration_seconds: f64,
    /// `None` when no frame rate was reported.
    pub fps: Option<f64>,
}
