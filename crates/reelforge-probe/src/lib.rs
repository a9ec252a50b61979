//! # reelforge-probe
//!
//! Media introspection for the Reel converter.
//!
//! The converter needs three facts about a referenced media file: how many
//! video and audio streams it carries, how long its audio runs, and its frame
//! rate. [`FfprobeProber`] gets them by running `ffprobe` and reading its
//! diagnostic output; [`DryRunProber`] returns fixed values without running
//! anything; [`CachingProber`] wraps either one so each path is probed once.
//!
//! ## Example
//!
//! ```no_run
//! use reelforge_probe::{CachingProber, FfprobeProber, Prober};
//! use std::path::Path;
//!
//! let prober = CachingProber::new(FfprobeProber::from_path()?);
//! let streams = prober.probe_video_audio(Path::new("/shots/a.mov"))?;
//! println!("video: {}, audio: {}", streams.video, streams.audio);
//! # Ok::<(), reelforge_probe::Error>(())
//! ```

pub mod cache;
pub mod dry_run;
mod error;
pub mod ffprobe;
pub mod prober;
pub mod tools;
pub mod types;

// Re-exports
pub use cache::CachingProber;
pub use dry_run::DryRunProber;
pub use error::{Error, Result};
pub use ffprobe::FfprobeProber;
pub use prober::Prober;
pub use tools::{check_tool, check_tools, get_tool_path, require_tool, ToolInfo};
pub use types::{AudioProbe, MediaSummary, StreamCounts};
