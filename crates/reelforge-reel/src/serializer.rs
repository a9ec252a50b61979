//! Writing timelines as Reel text.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use reelforge_timeline::{flatten_stack, Document, Item, Placement, TimeRange, Timeline, Track};

use crate::classify::{BLACK_GAP, CHECKERED};
use crate::error::{Error, Result};

const GENERATOR: &str = "reelforge";

/// Settings for writing Reel text.
#[derive(Debug, Clone, Default)]
pub struct WriterConfig {
    /// Directory the output file will live in. Needed for relative paths.
    pub output_dir: Option<PathBuf>,
    /// Write media paths below `output_dir` relative to it.
    pub relative_paths: bool,
    /// Timestamp for the header; the current local time when unset.
    pub created_at: Option<NaiveDateTime>,
}

impl WriterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn with_relative_paths(mut self, relative_paths: bool) -> Self {
        self.relative_paths = relative_paths;
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    fn header(&self) -> String {
        let created = self
            .created_at
            .unwrap_or_else(|| Local::now().naive_local());
        format!(
            "#\n# File created with {GENERATOR}\n#\n# Date: {}\n#\n\nVersion 4.0\nGhosting 5 5\n",
            created.format("%Y-%m-%d %H:%M:%S")
        )
    }

    fn display_path(&self, path: &str) -> String {
        if !self.relative_paths {
            return path.to_string();
        }
        self.output_dir
            .as_deref()
            .and_then(|dir| Path::new(path).strip_prefix(dir).ok())
            .map(|relative| relative.display().to_string())
            .unwrap_or_else(|| path.to_string())
    }
}

/// Write every timeline of `document`, in depth-first order.
pub fn write_document(document: &Document, config: &WriterConfig) -> Result<Vec<String>> {
    document
        .timelines()
        .into_iter()
        .map(|timeline| write_timeline(timeline, config))
        .collect()
}

/// Write one timeline as Reel text.
pub fn write_timeline(timeline: &Timeline, config: &WriterConfig) -> Result<String> {
    timeline
        .validate()
        .map_err(|e| Error::invalid_timeline(&timeline.name, e))?;

    let mut out = config.header();
    if timeline.is_empty() {
        tracing::info!(name = %timeline.name, "timeline is empty");
        out.push_str("EDL\n");
        return Ok(out);
    }

    let video = flatten_stack(&timeline.video_tracks());
    let audio = AudioGrid::new(&timeline.audio_tracks());

    let mut shots = 0;
    for placement in video.placements() {
        let Some(shot) = ShotFields::from_item(placement.item, &placement.range) else {
            continue;
        };
        let name = match &shot.path {
            Some(path) => config.display_path(path),
            None => shot.label.to_string(),
        };
        out.push_str(&format!(
            "\"{}\" {} {} {} {} {}\n",
            name, shot.first, shot.last, shot.start, shot.end, shot.rate
        ));
        shots += 1;

        for (path, offset) in audio.attachments(&placement, shot.path.as_deref()) {
            out.push_str(&format!(
                "audio: {}\naudio offset: {offset}\n",
                config.display_path(path)
            ));
        }
    }

    out.push_str("EDL\n");
    tracing::debug!(name = %timeline.name, shots, "wrote shot list");
    Ok(out)
}

/// 1-based inclusive `(first, last)` frames of a range at its own rate.
fn frames(range: &TimeRange) -> (i64, i64) {
    let first = range.start_time.to_frames() + 1;
    let last = first + range.duration.to_frames() - 1;
    (first, last)
}

/// The fields of one shot line.
#[derive(Debug, PartialEq)]
struct ShotFields<'a> {
    path: Option<&'a str>,
    label: &'static str,
    first: i64,
    last: i64,
    start: i64,
    end: i64,
    rate: f64,
}

impl<'a> ShotFields<'a> {
    fn from_item(item: &'a Item, placed: &TimeRange) -> Option<Self> {
        match item {
            Item::Transition(_) => None,
            Item::Gap(gap) => {
                let (first, last) = frames(&gap.source_range);
                Some(Self {
                    path: None,
                    label: BLACK_GAP,
                    first,
                    last,
                    start: first,
                    end: last,
                    rate: gap.source_range.rate(),
                })
            }
            Item::Clip(clip) => {
                let range = clip
                    .available_range()
                    .or_else(|| clip.trimmed_range())
                    .unwrap_or(*placed);
                let (first, last) = frames(&range);
                let (start, end) = clip
                    .source_range
                    .map(|source| frames(&source.rescaled_to(range.rate())))
                    .unwrap_or((first, last));
                Some(Self {
                    path: clip.media_path(),
                    label: CHECKERED,
                    first,
                    last,
                    start,
                    end,
                    rate: range.rate(),
                })
            }
        }
    }
}

/// Placements of every audio track, stored densely and addressed by
/// `(track, item)`.
struct AudioGrid<'a> {
    cells: Vec<Placement<'a>>,
    /// `bounds[t]..bounds[t + 1]` are the cells of track `t`.
    bounds: Vec<usize>,
}

impl<'a> AudioGrid<'a> {
    fn new(tracks: &[&'a Track]) -> Self {
        let mut cells = Vec::with_capacity(tracks.iter().map(|t| t.len()).sum());
        let mut bounds = Vec::with_capacity(tracks.len() + 1);
        bounds.push(0);
        for track in tracks {
            cells.extend(track.placements());
            bounds.push(cells.len());
        }
        Self { cells, bounds }
    }

    fn track_count(&self) -> usize {
        self.bounds.len() - 1
    }

    fn track(&self, index: usize) -> &[Placement<'a>] {
        &self.cells[self.bounds[index]..self.bounds[index + 1]]
    }

    /// `(path, offset)` of each audio clip overlapping `video` whose media
    /// differs from `video_path`. The offset is in frames at the video
    /// item's rate, advanced by however far into the audio clip the video
    /// item starts. Repeats across tracks are listed once.
    fn attachments(&self, video: &Placement<'_>, video_path: Option<&str>) -> Vec<(&'a str, i64)> {
        let rate = video.range.rate();
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        for index in 0..self.track_count() {
            for cell in self.track(index) {
                let Item::Clip(clip) = cell.item else {
                    continue;
                };
                let Some(path) = clip.media_path() else {
                    continue;
                };
                if Some(path) == video_path || !cell.range.overlaps(&video.range) {
                    continue;
                }

                let source_start = clip
                    .trimmed_range()
                    .map_or(cell.range.start_time, |r| r.start_time);
                let mut start = source_start.rescaled_to(rate);
                if cell.range.start_time.is_before(&video.range.start_time) {
                    start += video.range.start_time - cell.range.start_time;
                }
                let offset = start.to_frames();

                if seen.insert((path, offset)) {
                    out.push((path, offset));
                }
            }
        }
        out
    }
}
