//! Track items: clips, gaps and transitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::{RationalTime, TimeRange};

/// Free-form metadata attached to timelines and items.
pub type Metadata = BTreeMap<String, serde_json::Value>;

const FILE_SCHEME: &str = "file://";

/// Where a clip's media lives and how much of it is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaReference {
    /// Target URL; empty for a missing reference.
    #[serde(default)]
    pub target_url: String,
    /// Full usable extent of the media, independent of what a clip uses.
    #[serde(default)]
    pub available_range: Option<TimeRange>,
    /// Set when the media is known to be unavailable (a placeholder).
    #[serde(default)]
    pub missing: bool,
}

impl MediaReference {
    pub fn external(target_url: impl Into<String>, available_range: Option<TimeRange>) -> Self {
        Self {
            target_url: target_url.into(),
            available_range,
            missing: false,
        }
    }

    pub fn missing(available_range: Option<TimeRange>) -> Self {
        Self {
            target_url: String::new(),
            available_range,
            missing: true,
        }
    }

    pub fn is_missing_reference(&self) -> bool {
        self.missing
    }

    /// The target as a filesystem path, with any `file://` scheme removed.
    pub fn path(&self) -> Option<&str> {
        if self.missing {
            return None;
        }
        Some(
            self.target_url
                .strip_prefix(FILE_SCHEME)
                .unwrap_or(&self.target_url),
        )
    }

    /// Build a `file://` URL for a path.
    pub fn file_url(path: &str) -> String {
        format!("{FILE_SCHEME}{path}")
    }
}

/// A segment of media placed on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    #[serde(default)]
    pub media_reference: Option<MediaReference>,
    /// The used part of the media; absent means the whole available range.
    #[serde(default)]
    pub source_range: Option<TimeRange>,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl Clip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_reference: None,
            source_range: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_media_reference(mut self, media_reference: MediaReference) -> Self {
        self.media_reference = Some(media_reference);
        self
    }

    pub fn with_source_range(mut self, source_range: TimeRange) -> Self {
        self.source_range = Some(source_range);
        self
    }

    pub fn available_range(&self) -> Option<TimeRange> {
        self.media_reference
            .as_ref()
            .and_then(|r| r.available_range)
    }

    /// The range this clip occupies: its source range, else the full
    /// available range of its media.
    pub fn trimmed_range(&self) -> Option<TimeRange> {
        self.source_range.or_else(|| self.available_range())
    }

    pub fn is_missing_reference(&self) -> bool {
        self.media_reference
            .as_ref()
            .map_or(true, MediaReference::is_missing_reference)
    }

    /// Media path of the clip, `None` for missing references.
    pub fn media_path(&self) -> Option<&str> {
        self.media_reference.as_ref().and_then(MediaReference::path)
    }

    /// A copy of this clip cut down to `window`, where `placed` is the
    /// clip's current position in its parent track.
    pub fn trimmed_to(&self, placed: &TimeRange, window: &TimeRange) -> Clip {
        if window.start_time.cmp_instant(&placed.start_time).is_eq()
            && window.duration.almost_equal(&placed.duration, 1e-9)
        {
            return self.clone();
        }

        let mut clip = self.clone();
        if let Some(trimmed) = self.trimmed_range() {
            let offset = window.start_time - placed.start_time;
            let start = trimmed.start_time + offset;
            clip.source_range = Some(TimeRange::new(start, window.duration));
        }
        clip
    }
}

/// Empty space on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    #[serde(default)]
    pub name: String,
    pub source_range: TimeRange,
}

impl Gap {
    pub fn new(source_range: TimeRange) -> Self {
        Self {
            name: String::new(),
            source_range,
        }
    }

    /// A gap of `duration` starting at zero.
    pub fn with_duration(duration: RationalTime) -> Self {
        Self::new(TimeRange::new(RationalTime::zero(duration.rate), duration))
    }
}

/// A transition between two neighbouring items. Transitions overlap their
/// neighbours and take up no time of their own on the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub transition_type: String,
    pub in_offset: RationalTime,
    pub out_offset: RationalTime,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

/// An entry of a [`crate::Track`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Item {
    Clip(Clip),
    Gap(Gap),
    Transition(Transition),
}

impl Item {
    pub fn name(&self) -> &str {
        match self {
            Item::Clip(clip) => &clip.name,
            Item::Gap(gap) => &gap.name,
            Item::Transition(transition) => &transition.name,
        }
    }

    /// Time this item takes up in its track. `None` only for a clip with no
    /// range at all.
    pub fn duration(&self) -> Option<RationalTime> {
        match self {
            Item::Clip(clip) => clip.trimmed_range().map(|r| r.duration),
            Item::Gap(gap) => Some(gap.source_range.duration),
            Item::Transition(transition) => Some(RationalTime::zero(transition.in_offset.rate)),
        }
    }

    /// Check the item's ranges against the model invariants.
    pub fn validate(&self) -> Result<()> {
        match self {
            Item::Clip(clip) => {
                let context = format!("clip '{}'", clip.name);
                let trimmed = clip
                    .trimmed_range()
                    .ok_or_else(|| Error::missing_range(context.clone()))?;
                trimmed.validate(&context)?;
                if let Some(available) = clip.available_range() {
                    available.validate(&context)?;
                }
                Ok(())
            }
            Item::Gap(gap) => gap.source_range.validate(&format!("gap '{}'", gap.name)),
            Item::Transition(transition) => {
                let context = format!("transition '{}'", transition.name);
                for offset in [&transition.in_offset, &transition.out_offset] {
                    if !offset.has_valid_rate() {
                        return Err(Error::non_positive_rate(offset.rate, context));
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn range(start: f64, duration: f64) -> TimeRange {
        TimeRange::new(RationalTime::new(start, 24.0), RationalTime::new(duration, 24.0))
    }

    #[test]
    fn trimmed_range_prefers_source_range() {
        let clip = Clip::new("a")
            .with_media_reference(MediaReference::external("file:///a.mov", Some(range(0.0, 100.0))));
        assert_eq!(clip.trimmed_range(), Some(range(0.0, 100.0)));

        let clip = clip.with_source_range(range(10.0, 20.0));
        assert_eq!(clip.trimmed_range(), Some(range(10.0, 20.0)));
    }

    #[test]
    fn media_path_strips_scheme() {
        let clip = Clip::new("a").with_media_reference(MediaReference::external("file:///shots/a.mov", None));
        assert_eq!(clip.media_path(), Some("/shots/a.mov"));
        assert!(!clip.is_missing_reference());

        let missing = Clip::new("b").with_media_reference(MediaReference::missing(None));
        assert_eq!(missing.media_path(), None);
        assert!(missing.is_missing_reference());
        assert!(Clip::new("c").is_missing_reference());
    }

    #[test]
    fn trimmed_to_shifts_source_start() {
        let clip = Clip::new("a")
            .with_media_reference(MediaReference::external("file:///a.mov", Some(range(100.0, 50.0))));
        let placed = range(0.0, 50.0);

        let whole = clip.trimmed_to(&placed, &placed);
        assert_eq!(whole, clip);

        let cut = clip.trimmed_to(&placed, &range(10.0, 5.0));
        assert_eq!(cut.source_range, Some(range(110.0, 5.0)));
    }

    #[test]
    fn item_serializes_with_kind_tag() {
        let item = Item::Gap(Gap::with_duration(RationalTime::new(50.0, 24.0)));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["kind"], "Gap");
        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn validate_flags_rangeless_clip() {
        let item = Item::Clip(Clip::new("lonely"));
        assert_matches!(item.validate(), Err(Error::MissingRange { .. }));
        assert_eq!(item.duration(), None);
    }

    #[test]
    fn transition_takes_no_time() {
        let item = Item::Transition(Transition {
            name: "dissolve".into(),
            transition_type: "SMPTE_Dissolve".into(),
            in_offset: RationalTime::new(6.0, 24.0),
            out_offset: RationalTime::new(6.0, 24.0),
            metadata: Metadata::new(),
        });
        assert_eq!(item.duration(), Some(RationalTime::zero(24.0)));
        assert!(item.validate().is_ok());
    }
}
