//! # reelforge-timeline
//!
//! Editorial timeline model used by the Reel converter.
//!
//! A [`Timeline`] owns an ordered stack of [`Track`]s. Each track holds a
//! sequence of [`Item`]s (clips, gaps and transitions) laid end to end; an
//! item's position in its track is derived from the durations of the items
//! before it. All times are [`RationalTime`] values: a number paired with a
//! rate, so `100` at `24` is a little over four seconds.
//!
//! ## Example
//!
//! ```
//! use reelforge_timeline::{Clip, Item, MediaReference, RationalTime, TimeRange, Timeline, Track, TrackKind};
//!
//! let range = TimeRange::new(RationalTime::new(0.0, 24.0), RationalTime::new(100.0, 24.0));
//! let clip = Clip::new("shot 1")
//!     .with_media_reference(MediaReference::external("file:///shots/a.mov", Some(range)));
//!
//! let mut track = Track::new("Video #1", TrackKind::Video);
//! track.append(Item::Clip(clip));
//!
//! let mut timeline = Timeline::new("demo");
//! timeline.push_track(track);
//! assert_eq!(timeline.video_tracks().len(), 1);
//! ```

mod error;
pub mod flatten;
pub mod item;
pub mod time;
pub mod timeline;
pub mod track;

// Re-exports
pub use error::{Error, Result};
pub use flatten::flatten_stack;
pub use item::{Clip, Gap, Item, MediaReference, Metadata, Transition};
pub use time::{RationalTime, TimeRange};
pub use timeline::{Collection, Document, Timeline};
pub use track::{Placement, Track, TrackKind};
