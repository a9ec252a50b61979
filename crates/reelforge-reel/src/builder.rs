//! Reconstruction of a timeline from a Reel shot list.
//!
//! The builder walks the classified lines with a small state machine. A shot
//! line opens a shot; an `audio:` line and then an `audio offset:` line may
//! attach to it. As soon as the next token cannot attach, the shot is placed:
//! tracks are created on first use, the shot goes onto every video track,
//! every audio track receives either the attached audio or a gap of the same
//! length, and the playhead moves to the end of the shot.

use std::path::{Path, PathBuf};

use reelforge_probe::{Prober, StreamCounts};
use reelforge_timeline::{
    Clip, Gap, Item, MediaReference, RationalTime, TimeRange, Timeline, Track, TrackKind,
};

use crate::classify::{ReelLine, ShotKind, ShotLine};
use crate::error::{Error, Result};
use crate::filter::filter;
use crate::studio::StudioMetadata;
use crate::tokens::{Token, TokenStream};
use crate::warning::{Converted, ReelWarning};

/// Frame rate used when neither the line, the prober nor an earlier line
/// provides one.
pub const FALLBACK_FPS: f64 = 30.0;

/// Placeholder streams: one video stream, no audio.
const PLACEHOLDER_STREAMS: StreamCounts = StreamCounts::new(1, 0);

/// Settings for reading a shot list.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Name given to the timeline.
    pub name: String,
    /// Directory relative media paths are resolved against.
    pub base_dir: PathBuf,
    /// Keep relative media paths as written instead of storing absolute ones.
    pub relative_paths: bool,
    pub studio: StudioMetadata,
}

impl ReaderConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_dir: PathBuf::from("."),
            relative_paths: false,
            studio: StudioMetadata::default(),
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_relative_paths(mut self, relative_paths: bool) -> Self {
        self.relative_paths = relative_paths;
        self
    }

    pub fn with_studio(mut self, studio: StudioMetadata) -> Self {
        self.studio = studio;
        self
    }
}

/// Read Reel text into a timeline.
pub fn read_reel(
    text: &str,
    config: &ReaderConfig,
    prober: &dyn Prober,
) -> Result<Converted<Timeline>> {
    TimelineBuilder::new(config.clone(), prober).build(text)
}

#[derive(Debug, Clone, PartialEq)]
struct PendingShot {
    line: usize,
    shot: ShotLine,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingAudio {
    line: usize,
    path: String,
}

#[derive(Debug, Clone, PartialEq)]
struct AudioAttachment {
    line: usize,
    path: String,
    offset: u64,
}

/// A shot and whatever was attached to it, ready to be placed.
#[derive(Debug, Clone, PartialEq)]
struct ShotGroup {
    shot: PendingShot,
    audio: Option<AudioAttachment>,
}

impl ShotGroup {
    fn new(shot: PendingShot, audio: Option<PendingAudio>, offset: Option<u64>) -> Self {
        Self {
            shot,
            audio: audio.map(|a| AudioAttachment {
                line: a.line,
                path: a.path,
                offset: offset.unwrap_or(0),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    HaveShot(PendingShot),
    HaveShotWithAudio(PendingShot, PendingAudio),
}

/// Outcome of feeding one token to the state machine.
#[derive(Debug, PartialEq)]
struct Step {
    state: State,
    complete: Option<ShotGroup>,
    warning: Option<ReelWarning>,
}

impl Step {
    fn to(state: State) -> Self {
        Self {
            state,
            complete: None,
            warning: None,
        }
    }

    fn completing(mut self, group: Option<ShotGroup>) -> Self {
        self.complete = group;
        self
    }

    fn warning(mut self, warning: ReelWarning) -> Self {
        self.warning = Some(warning);
        self
    }
}

impl State {
    fn step(self, token: Token) -> Step {
        let Token { line, kind } = token;
        match (self, kind) {
            (state, ReelLine::Shot(shot)) => {
                Step::to(State::HaveShot(PendingShot { line, shot })).completing(state.finish())
            }
            (State::Idle, ReelLine::Audio(path)) => Step::to(State::Idle).warning(
                ReelWarning::OrphanAudio {
                    line,
                    path: path.into(),
                },
            ),
            (State::HaveShot(shot), ReelLine::Audio(path)) => {
                Step::to(State::HaveShotWithAudio(shot, PendingAudio { line, path }))
            }
            (State::HaveShotWithAudio(shot, audio), ReelLine::Audio(path)) => Step::to(State::Idle)
                .completing(Some(ShotGroup::new(shot, Some(audio), None)))
                .warning(ReelWarning::OrphanAudio {
                    line,
                    path: path.into(),
                }),
            (State::HaveShotWithAudio(shot, audio), ReelLine::AudioOffset(offset)) => {
                Step::to(State::Idle).completing(Some(ShotGroup::new(shot, Some(audio), Some(offset))))
            }
            (state @ (State::Idle | State::HaveShot(_)), ReelLine::AudioOffset(offset)) => {
                Step::to(state).warning(ReelWarning::OrphanAudioOffset { line, offset })
            }
        }
    }

    /// Whether `next` would attach to the pending shot.
    fn accepts(&self, next: Option<&ReelLine>) -> bool {
        matches!(
            (self, next),
            (State::HaveShot(_), Some(ReelLine::Audio(_)))
                | (State::HaveShotWithAudio(..), Some(ReelLine::AudioOffset(_)))
        )
    }

    fn finish(self) -> Option<ShotGroup> {
        match self {
            State::Idle => None,
            State::HaveShot(shot) => Some(ShotGroup::new(shot, None, None)),
            State::HaveShotWithAudio(shot, audio) => Some(ShotGroup::new(shot, Some(audio), None)),
        }
    }
}

/// Where a referenced media file is probed and how it is stored.
#[derive(Debug, Clone)]
struct MediaLocation {
    probe: PathBuf,
    stored: String,
}

fn probed<T>(line: usize, path: &Path, result: reelforge_probe::Result<T>) -> Result<T> {
    result.map_err(|e| Error::probe_failure(path, line, e))
}

/// Range covering 1-based inclusive frames `first..=last` at `fps`.
fn frame_range(first: u64, last: u64, fps: f64) -> TimeRange {
    TimeRange::new(
        RationalTime::new((first - 1) as f64, fps),
        RationalTime::new((last + 1 - first) as f64, fps),
    )
}

/// Builds one timeline from one shot list.
pub struct TimelineBuilder<'a> {
    prober: &'a dyn Prober,
    config: ReaderConfig,
    tracks: Vec<Track>,
    video: Vec<usize>,
    audio: Vec<usize>,
    playhead: Option<RationalTime>,
    previous_fps: Option<f64>,
    shots: usize,
    warnings: Vec<ReelWarning>,
}

impl<'a> TimelineBuilder<'a> {
    pub fn new(config: ReaderConfig, prober: &'a dyn Prober) -> Self {
        Self {
            prober,
            config,
            tracks: Vec::new(),
            video: Vec::new(),
            audio: Vec::new(),
            playhead: None,
            previous_fps: None,
            shots: 0,
            warnings: Vec::new(),
        }
    }

    /// Filter, classify and place every line of `text`.
    pub fn build(mut self, text: &str) -> Result<Converted<Timeline>> {
        let tokens = TokenStream::new(filter(text), &mut self.warnings);
        self.run(tokens)
    }

    /// Place every token of an already classified stream.
    pub fn run(mut self, mut tokens: TokenStream) -> Result<Converted<Timeline>> {
        let mut state = State::Idle;

        while let Some(token) = tokens.next() {
            let step = state.step(token);
            if let Some(group) = step.complete {
                self.place(group)?;
            }
            self.warnings.extend(step.warning);

            state = step.state;
            if !state.accepts(tokens.peek()) {
                if let Some(group) = std::mem::replace(&mut state, State::Idle).finish() {
                    self.place(group)?;
                }
            }
        }

        let mut timeline = Timeline::new(self.config.name.clone());
        self.config.studio.stamp_timeline(&mut timeline.metadata);
        for track in self.tracks {
            timeline.push_track(track);
        }

        tracing::info!(
            name = %timeline.name,
            tracks = timeline.tracks().len(),
            shots = self.shots,
            warnings = self.warnings.len(),
            "built timeline from shot list"
        );
        Ok(Converted::new(timeline, self.warnings))
    }

    fn place(&mut self, group: ShotGroup) -> Result<()> {
        let ShotGroup {
            shot: PendingShot { line, shot },
            audio,
        } = group;
        tracing::debug!(line, name = shot.kind.name(), "placing shot");

        let location = match &shot.kind {
            ShotKind::Media(path) => Some(self.locate(path)),
            ShotKind::BlackGap | ShotKind::Checkered => None,
        };

        let fps = self.resolve_fps(line, &shot, location.as_ref())?;
        let streams = match &location {
            Some(loc) => probed(line, &loc.probe, self.prober.probe_video_audio(&loc.probe))?,
            None => PLACEHOLDER_STREAMS,
        };

        self.ensure_tracks(TrackKind::Video, streams.video.max(1), fps);
        self.ensure_tracks(TrackKind::Audio, streams.audio, fps);

        self.shots += 1;
        let name = format!("shot {}", self.shots);
        let available = frame_range(shot.first, shot.last, fps);
        let source = match shot.kind {
            ShotKind::BlackGap => None,
            _ if shot.has_distinct_source() => Some(self.source_range(line, &shot, fps)),
            _ => None,
        };
        let duration = source.map_or(available.duration, |r| r.duration);

        let item = match &shot.kind {
            ShotKind::BlackGap => Item::Gap(Gap {
                name,
                source_range: available,
            }),
            ShotKind::Checkered => Item::Clip(self.shot_clip(
                name,
                MediaReference::missing(Some(available)),
                source,
            )),
            ShotKind::Media(_) => {
                let url = location
                    .as_ref()
                    .map(|loc| MediaReference::file_url(&loc.stored))
                    .unwrap_or_default();
                Item::Clip(self.shot_clip(
                    name,
                    MediaReference::external(url, Some(available)),
                    source,
                ))
            }
        };

        for &index in &self.video {
            self.tracks[index].append(item.clone());
        }

        let audio_items = match audio {
            Some(attachment) => {
                self.attach_audio(attachment, location.as_ref(), fps, duration)?
            }
            None => None,
        };
        let silence = Item::Gap(Gap::with_duration(duration));
        for &index in &self.audio {
            match &audio_items {
                Some(items) => {
                    for item in items {
                        self.tracks[index].append(item.clone());
                    }
                }
                None => self.tracks[index].append(silence.clone()),
            }
        }

        self.playhead = Some(self.playhead_at(fps) + duration);
        self.previous_fps = Some(fps);
        Ok(())
    }

    fn shot_clip(
        &self,
        name: String,
        reference: MediaReference,
        source: Option<TimeRange>,
    ) -> Clip {
        let mut clip = Clip::new(name).with_media_reference(reference);
        if let Some(source) = source {
            clip.source_range = Some(source);
            self.config.studio.stamp_clip(&mut clip.metadata);
        }
        clip
    }

    /// Source range from the start/end frames, kept inside first/last.
    fn source_range(&mut self, line: usize, shot: &ShotLine, fps: f64) -> TimeRange {
        let (requested_start, requested_end) = (shot.start_frame(), shot.end_frame());
        let start = requested_start.clamp(shot.first, shot.last);
        let end = requested_end.clamp(start, shot.last);

        if (start, end) != (requested_start, requested_end) {
            self.warnings.push(ReelWarning::SourceRangeClamped {
                line,
                path: shot.kind.name().into(),
                reason: format!(
                    "frames {requested_start}-{requested_end} outside {}-{}, using {start}-{end}",
                    shot.first, shot.last
                ),
            });
        }
        frame_range(start, end, fps)
    }

    /// Build the items the attached audio contributes to each audio track,
    /// or `None` when the tracks should get silence instead.
    fn attach_audio(
        &mut self,
        audio: AudioAttachment,
        video: Option<&MediaLocation>,
        fps: f64,
        shot_duration: RationalTime,
    ) -> Result<Option<Vec<Item>>> {
        let location = self.locate(&audio.path);
        if video.is_some_and(|v| v.probe == location.probe) {
            tracing::debug!(line = audio.line, path = %audio.path, "audio is the shot's own media");
            return Ok(None);
        }

        let probe = probed(audio.line, &location.probe, self.prober.probe_audio(&location.probe))?;
        self.ensure_tracks(TrackKind::Audio, probe.audio.max(1), fps);

        let media = RationalTime::from_seconds(probe.duration_seconds, fps);
        let offset = RationalTime::new(audio.offset as f64, fps);
        let remaining = media - offset;
        if remaining.value <= 0.0 {
            self.warnings.push(ReelWarning::AudioOffsetBeyondMedia {
                line: audio.line,
                path: audio.path.into(),
                offset: audio.offset,
            });
            return Ok(None);
        }

        let playhead = self.playhead_at(fps);
        let shot_range = TimeRange::new(playhead, shot_duration);
        if !shot_range.overlaps(&TimeRange::new(playhead, remaining)) {
            return Ok(None);
        }

        let used = if shot_duration.is_before(&remaining) {
            tracing::debug!(path = %audio.path, "audio is longer than its shot, truncating");
            self.warnings.push(ReelWarning::AudioTooLong {
                line: audio.line,
                path: audio.path.clone().into(),
                audio_seconds: remaining.to_seconds(),
                shot_seconds: shot_duration.to_seconds(),
            });
            shot_duration
        } else {
            remaining
        };

        let available = TimeRange::new(RationalTime::zero(fps), media);
        let mut clip = Clip::new(audio.path.clone())
            .with_media_reference(MediaReference::external(
                MediaReference::file_url(&location.stored),
                Some(available),
            ))
            .with_source_range(TimeRange::new(offset, used));
        self.config.studio.stamp_clip(&mut clip.metadata);

        let mut items = vec![Item::Clip(clip)];
        let short_by = shot_duration - used;
        if short_by.to_seconds() > 1e-9 {
            items.push(Item::Gap(Gap::with_duration(short_by)));
        }
        Ok(Some(items))
    }

    /// Frame rate for a shot: its own, the media's, the previous shot's, or
    /// the fallback.
    fn resolve_fps(
        &mut self,
        line: usize,
        shot: &ShotLine,
        location: Option<&MediaLocation>,
    ) -> Result<f64> {
        if let Some(fps) = shot.fps {
            return Ok(fps);
        }
        if let Some(loc) = location {
            let probed_fps = probed(line, &loc.probe, self.prober.probe_fps(&loc.probe))?;
            if let Some(fps) = probed_fps.filter(|fps| fps.is_finite() && *fps > 0.0) {
                return Ok(fps);
            }
        }
        if let Some(fps) = self.previous_fps {
            return Ok(fps);
        }
        tracing::debug!(line, "no frame rate found, defaulting to {}", FALLBACK_FPS);
        self.warnings.push(ReelWarning::FrameRateUnresolved {
            line,
            path: shot.kind.name().into(),
        });
        Ok(FALLBACK_FPS)
    }

    /// Create `count` tracks of `kind` unless that kind already exists. New
    /// tracks start with a gap up to the playhead.
    fn ensure_tracks(&mut self, kind: TrackKind, count: u32, fps: f64) {
        let existing = match kind {
            TrackKind::Video => &self.video,
            TrackKind::Audio => &self.audio,
        };
        if !existing.is_empty() || count == 0 {
            return;
        }

        let lead = self.playhead_at(fps);
        for n in 1..=count {
            let mut track = Track::new(format!("{kind} #{n}"), kind);
            if lead.value > 0.0 {
                track.append(Item::Gap(Gap::with_duration(lead)));
            }
            self.tracks.push(track);
            let index = self.tracks.len() - 1;
            match kind {
                TrackKind::Video => self.video.push(index),
                TrackKind::Audio => self.audio.push(index),
            }
        }
        tracing::debug!(%kind, count, "created tracks");
    }

    fn playhead_at(&self, fps: f64) -> RationalTime {
        self.playhead
            .map_or(RationalTime::zero(fps), |p| p.rescaled_to(fps))
    }

    fn locate(&self, written: &str) -> MediaLocation {
        let path = Path::new(written);
        if path.is_absolute() {
            return MediaLocation {
                probe: path.to_path_buf(),
                stored: written.to_string(),
            };
        }

        let probe = self.config.base_dir.join(path);
        let stored = if self.config.relative_paths {
            written.to_string()
        } else {
            std::path::absolute(&probe)
                .unwrap_or_else(|_| probe.clone())
                .display()
                .to_string()
        };
        MediaLocation { probe, stored }
    }
}
