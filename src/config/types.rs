use reelforge_reel::StudioMetadata;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub studio: StudioConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub reel: ReelConfig,
}

/// Production identity stamped onto timelines and clips.
///
/// Any field left unset here is taken from the environment when the config
/// is resolved: `STUDIO`, `SHOW`, `SEQ`, `SHOT`, `TAKE`, and `USER` (or
/// `USERNAME`) for the artist.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StudioConfig {
    /// Metadata key the identifiers are stored under
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub show: Option<String>,

    #[serde(default)]
    pub sequence: Option<String>,

    #[serde(default)]
    pub shot: Option<String>,

    #[serde(default)]
    pub take: Option<String>,

    #[serde(default)]
    pub artist: Option<String>,
}

impl StudioConfig {
    /// Fill unset fields from the process environment.
    pub fn resolve(&self) -> StudioMetadata {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Fill unset fields from `env`. Empty values count as unset.
    pub fn resolve_with(&self, env: impl Fn(&str) -> Option<String>) -> StudioMetadata {
        let lookup = |configured: &Option<String>, keys: &[&str]| {
            configured
                .clone()
                .filter(|v| !v.is_empty())
                .or_else(|| keys.iter().find_map(|k| env(*k).filter(|v| !v.is_empty())))
        };

        StudioMetadata {
            name: lookup(&self.name, &["STUDIO"]),
            show: lookup(&self.show, &["SHOW"]),
            sequence: lookup(&self.sequence, &["SEQ"]),
            shot: lookup(&self.shot, &["SHOT"]),
            take: lookup(&self.take, &["TAKE"]),
            artist: lookup(&self.artist, &["USER", "USERNAME"]),
        }
    }

    /// Whether any identifier other than the name is configured.
    pub fn has_identifiers(&self) -> bool {
        [&self.show, &self.sequence, &self.shot, &self.take, &self.artist]
            .iter()
            .any(|v| v.is_some())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Explicit ffprobe binary; looked up on PATH when unset
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    /// Arguments passed to ffprobe before the media path
    #[serde(default = "default_probe_args")]
    pub probe_args: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: None,
            probe_args: default_probe_args(),
        }
    }
}

fn default_probe_args() -> Vec<String> {
    vec!["-hide_banner".to_string()]
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReelConfig {
    /// Keep media paths relative instead of storing absolute ones
    #[serde(default)]
    pub relative_paths: bool,
}
