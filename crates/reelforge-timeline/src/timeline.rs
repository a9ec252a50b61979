//! Timelines and the documents that hold them.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::item::Metadata;
use crate::time::RationalTime;
use crate::track::{Track, TrackKind};

/// A named stack of tracks. Later tracks sit on top of earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub name: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    #[serde(default)]
    tracks: Vec<Track>,
}

impl Timeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Metadata::new(),
            tracks: Vec::new(),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Append a track on top of the stack and return its index.
    pub fn push_track(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    pub fn video_tracks(&self) -> Vec<&Track> {
        self.tracks_of_kind(TrackKind::Video)
    }

    pub fn audio_tracks(&self) -> Vec<&Track> {
        self.tracks_of_kind(TrackKind::Audio)
    }

    fn tracks_of_kind(&self, kind: TrackKind) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.kind() == kind).collect()
    }

    /// True when no track holds any item.
    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(Track::is_empty)
    }

    /// Duration of the longest track.
    pub fn duration(&self) -> Option<RationalTime> {
        self.tracks
            .iter()
            .filter_map(Track::duration)
            .reduce(RationalTime::latest)
    }

    /// Check every item of every track against the model invariants.
    pub fn validate(&self) -> Result<()> {
        for track in &self.tracks {
            for item in track.items() {
                item.validate()?;
            }
        }
        Ok(())
    }
}

/// A named group of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Document>,
}

/// The root of a serialized timeline file: one timeline, or a collection
/// that may nest further collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema")]
pub enum Document {
    Timeline(Timeline),
    Collection(Collection),
}

impl Document {
    /// All timelines in the document, depth first.
    pub fn timelines(&self) -> Vec<&Timeline> {
        let mut out = Vec::new();
        self.collect_timelines(&mut out);
        out
    }

    fn collect_timelines<'a>(&'a self, out: &mut Vec<&'a Timeline>) {
        match self {
            Document::Timeline(timeline) => out.push(timeline),
            Document::Collection(collection) => {
                for child in &collection.children {
                    child.collect_timelines(out);
                }
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Timeline> for Document {
    fn from(timeline: Timeline) -> Self {
        Document::Timeline(timeline)
    }
}
