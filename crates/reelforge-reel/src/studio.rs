//! Studio identity embedded in produced timelines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use reelforge_timeline::Metadata;

/// Production identifiers stamped onto timelines and clips, keyed by the
/// studio name.
///
/// Resolved once by the caller (configuration file, environment) and passed
/// into the builder; the builder never reads the environment itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioMetadata {
    /// Metadata key. Without it nothing is stamped.
    pub name: Option<String>,
    pub show: Option<String>,
    pub sequence: Option<String>,
    pub shot: Option<String>,
    pub take: Option<String>,
    pub artist: Option<String>,
}

impl StudioMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Add `{name: {showID}}` to timeline metadata.
    pub fn stamp_timeline(&self, metadata: &mut Metadata) {
        self.stamp(metadata, &[("showID", &self.show)]);
    }

    /// Add `{name: {seqID, shotID, takeID, artist}}` to clip metadata.
    pub fn stamp_clip(&self, metadata: &mut Metadata) {
        self.stamp(
            metadata,
            &[
                ("seqID", &self.sequence),
                ("shotID", &self.shot),
                ("takeID", &self.take),
                ("artist", &self.artist),
            ],
        );
    }

    fn stamp(&self, metadata: &mut Metadata, fields: &[(&str, &Option<String>)]) {
        let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) else {
            return;
        };
        let entry: Map<String, Value> = fields
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_ref()
                    .map(|v| (key.to_string(), Value::String(v.clone())))
            })
            .collect();
        metadata.insert(name.to_string(), Value::Object(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_fields_are_omitted() {
        let studio = StudioMetadata {
            sequence: Some("sq010".into()),
            artist: Some("ana".into()),
            ..StudioMetadata::new("aura")
        };
        let mut metadata = Metadata::new();
        studio.stamp_clip(&mut metadata);
        assert_eq!(
            metadata.get("aura"),
            Some(&json!({"seqID": "sq010", "artist": "ana"}))
        );
    }

    #[test]
    fn timeline_gets_show() {
        let studio = StudioMetadata {
            show: Some("pilot".into()),
            ..StudioMetadata::new("aura")
        };
        let mut metadata = Metadata::new();
        studio.stamp_timeline(&mut metadata);
        assert_eq!(metadata.get("aura"), Some(&json!({"showID": "pilot"})));
    }

    #[test]
    fn no_studio_name_no_entry() {
        let studio = StudioMetadata {
            shot: Some("0040".into()),
            ..Default::default()
        };
        let mut metadata = Metadata::new();
        studio.stamp_clip(&mut metadata);
        studio.stamp_timeline(&mut metadata);
        assert!(metadata.is_empty());
    }
}
