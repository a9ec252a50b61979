//! # reelforge-reel
//!
//! Conversion between Reel shot lists and [`reelforge_timeline`] timelines.
//!
//! A Reel file is a line-oriented list of shots:
//!
//! ```text
//! Version 4.0
//! Ghosting 5 5
//! "/shots/a.mov" 1 100 1 100 24
//! audio: /sound/dialog.wav
//! audio offset: 12
//! "Black Gap" 1 48 1 48 24
//! EDL
//! ```
//!
//! Reading runs the text through [`filter`], [`classify`] and the
//! [`TimelineBuilder`]; the builder asks a [`reelforge_probe::Prober`] for
//! whatever the file leaves out (frame rates, stream layout, audio length).
//! Writing flattens the video tracks of a timeline and emits one line per
//! video item plus `audio:` annotations for overlapping audio clips.
//!
//! Recoverable problems never fail a conversion; they are returned as
//! [`ReelWarning`]s alongside the result in a [`Converted`].
//!
//! ## Example
//!
//! ```
//! use reelforge_probe::DryRunProber;
//! use reelforge_reel::{read_reel, write_timeline, ReaderConfig, WriterConfig};
//!
//! let text = "\"/shots/a.mov\" 1 100 1 100 24\nEDL\n";
//! let prober = DryRunProber::new().with_streams(1, 0);
//! let read = read_reel(text, &ReaderConfig::new("demo"), &prober)?;
//! assert!(read.warnings.is_empty());
//!
//! let reel = write_timeline(&read.value, &WriterConfig::default())?;
//! assert!(reel.contains("\"/shots/a.mov\" 1 100 1 100 24\n"));
//! # Ok::<(), reelforge_reel::Error>(())
//! ```

pub mod builder;
pub mod classify;
mod error;
pub mod filter;
pub mod serializer;
pub mod studio;
pub mod tokens;
pub mod warning;

// Re-exports
pub use builder::{read_reel, ReaderConfig, TimelineBuilder};
pub use classify::{classify, ReelLine, ShotKind, ShotLine};
pub use error::{Error, Result};
pub use filter::{filter, filter_lines, Line};
pub use serializer::{write_document, write_timeline, WriterConfig};
pub use studio::StudioMetadata;
pub use tokens::{Token, TokenStream};
pub use warning::{Converted, ReelWarning};
