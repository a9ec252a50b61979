//! Tracks: ordered sequences of items of a single kind.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::time::{RationalTime, TimeRange};

/// The stream type a track carries. Fixed when the track is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Video => write!(f, "Video"),
            TrackKind::Audio => write!(f, "Audio"),
        }
    }
}

/// An item together with the range it occupies in its track.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub item: &'a Item,
    pub range: TimeRange,
}

/// Items laid end to end. Each item starts where the previous one ends, so
/// items on one track never overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    kind: TrackKind,
    #[serde(default)]
    items: Vec<Item>,
}

impl Track {
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            name: name.into(),
            kind,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn append(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every item with its range in this track, in order.
    ///
    /// A clip without any range is placed with zero duration; call
    /// [`Item::validate`] first to reject such clips.
    pub fn placements(&self) -> Vec<Placement<'_>> {
        let mut placements = Vec::with_capacity(self.items.len());
        let mut cursor: Option<RationalTime> = None;

        for item in &self.items {
            let rate = cursor.map(|c| c.rate);
            let duration = item
                .duration()
                .unwrap_or_else(|| RationalTime::zero(rate.unwrap_or(1.0)));
            let start = cursor.unwrap_or_else(|| RationalTime::zero(duration.rate));
            let range = TimeRange::new(start, duration);
            cursor = Some(range.end_time_exclusive());
            placements.push(Placement { item, range });
        }

        placements
    }

    /// Range of the item at `index` within this track.
    pub fn range_of_child_at_index(&self, index: usize) -> Option<TimeRange> {
        self.placements().get(index).map(|p| p.range)
    }

    /// Total duration, `None` for an empty track.
    pub fn duration(&self) -> Option<RationalTime> {
        self.placements()
            .last()
            .map(|p| p.range.end_time_exclusive())
    }
}
