//! Reading and writing shot lists end to end.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reelforge_probe::{AudioProbe, DryRunProber, Prober, StreamCounts};
use reelforge_reel::{
    filter, filter_lines, read_reel, write_document, write_timeline, ReaderConfig, ReelWarning,
    WriterConfig,
};
use reelforge_timeline::{Collection, Document, Item, RationalTime, Timeline, TrackKind};

/// Answers probes from a table, failing for unknown paths.
#[derive(Default)]
struct TableProber {
    media: HashMap<PathBuf, (StreamCounts, f64, Option<f64>)>,
}

impl TableProber {
    fn with(mut self, path: &str, streams: StreamCounts, seconds: f64, fps: Option<f64>) -> Self {
        self.media.insert(PathBuf::from(path), (streams, seconds, fps));
        self
    }

    fn lookup(&self, path: &Path) -> reelforge_probe::Result<&(StreamCounts, f64, Option<f64>)> {
        self.media.get(path).ok_or_else(|| {
            reelforge_probe::Error::probe_failure("table", path, "No such file or directory")
        })
    }
}

impl Prober for TableProber {
    fn name(&self) -> &'static str {
        "table"
    }

    fn probe_video_audio(&self, path: &Path) -> reelforge_probe::Result<StreamCounts> {
        self.lookup(path).map(|m| m.0)
    }

    fn probe_audio(&self, path: &Path) -> reelforge_probe::Result<AudioProbe> {
        self.lookup(path).map(|m| AudioProbe {
            audio: m.0.audio,
            duration_seconds: m.1,
        })
    }

    fn probe_fps(&self, path: &Path) -> reelforge_probe::Result<Option<f64>> {
        self.lookup(path).map(|m| m.2)
    }
}

fn config() -> ReaderConfig {
    ReaderConfig::new("cut").with_base_dir("/project")
}

/// The shot and audio lines of a written file.
fn body(text: &str) -> Vec<String> {
    filter(text).into_iter().map(|l| l.text).collect()
}

const EDIT: &str = "\
Version 4.0
Ghosting 5 5
\"/shots/a.mov\" 1 100 1 100 24
audio: /sound/dialog.wav
audio offset: 12
\"Black Gap\" 1 24 1 24 24
\"/shots/b.mov\" 1 48 9 40 24
\"Checkered\" 1 12 1 12 24
EDL
";

fn edit_prober() -> TableProber {
    TableProber::default()
        .with("/shots/a.mov", StreamCounts::new(1, 2), 10.0, Some(24.0))
        .with("/shots/b.mov", StreamCounts::new(1, 0), 2.0, Some(24.0))
        .with("/sound/dialog.wav", StreamCounts::new(0, 1), 60.0, None)
}

#[test]
fn reel_survives_read_and_write() {
    let read = read_reel(EDIT, &config(), &edit_prober()).unwrap();
    let text = write_timeline(&read.value, &WriterConfig::default()).unwrap();

    assert_eq!(
        body(&text),
        vec![
            "\"/shots/a.mov\" 1 100 1 100 24",
            "audio: /sound/dialog.wav",
            "audio offset: 12",
            "\"Black Gap\" 1 24 1 24 24",
            "\"/shots/b.mov\" 1 48 9 40 24",
            "\"Checkered\" 1 12 1 12 24",
        ]
    );
    assert!(text.ends_with("EDL\n"));
}

#[test]
fn tracks_hold_only_their_own_kind() {
    let timeline = read_reel(EDIT, &config(), &edit_prober()).unwrap().value;

    let names: Vec<&str> = timeline.tracks().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Video #1", "Audio #1", "Audio #2"]);

    for track in timeline.tracks() {
        for item in track.items() {
            if let Item::Clip(clip) = item {
                let is_audio = clip.name.ends_with(".wav");
                assert_eq!(is_audio, track.kind() == TrackKind::Audio, "{}", clip.name);
            }
        }
    }
}

#[test]
fn every_track_ends_with_the_playhead() {
    let timeline = read_reel(EDIT, &config(), &edit_prober()).unwrap().value;
    let video = timeline.video_tracks()[0];

    let ends: Vec<RationalTime> = video
        .placements()
        .iter()
        .map(|p| p.range.end_time_exclusive())
        .collect();
    assert!(ends.windows(2).all(|w| !w[1].is_before(&w[0])));

    let total = video.duration().unwrap();
    assert_eq!(total, RationalTime::new(100.0 + 24.0 + 32.0 + 12.0, 24.0));
    for track in timeline.audio_tracks() {
        assert!(track.duration().unwrap().almost_equal(&total, 1e-9));
    }
}

#[test]
fn probe_failure_aborts_with_path_and_line() {
    let text = "\"/shots/a.mov\" 1 10 1 10 24\n\"/shots/gone.mov\" 1 10 1 10 24\n";
    let err = read_reel(text, &config(), &edit_prober()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("/shots/gone.mov"), "{message}");
    assert!(message.contains("line 2"), "{message}");
}

#[test]
fn malformed_lines_are_reported_not_fatal() {
    let prober = DryRunProber::new().with_streams(1, 0);
    let text = "\"a.mov\" 1 10 1 10 24\nthis is not a shot\n\"b.mov\" 10 1\n";
    let read = read_reel(text, &config(), &prober).unwrap();

    assert_eq!(read.value.video_tracks()[0].len(), 1);
    assert_eq!(read.dropped_lines(), 2);
    assert_eq!(read.warnings[0].line(), 2);
    assert!(matches!(&read.warnings[1], ReelWarning::MalformedLine { line: 3, .. }));
}

#[test]
fn frame_math_round_trips() {
    let prober = DryRunProber::new().with_streams(1, 0);
    for (first, last, fps) in [
        (1u64, 1u64, "24"),
        (1, 100, "24"),
        (101, 250, "25"),
        (7, 1441, "23.976"),
        (1001, 1001, "29.97"),
        (3, 60000, "60"),
    ] {
        let line = format!("\"/shots/a.mov\" {first} {last} {first} {last} {fps}\n");
        let timeline = read_reel(&line, &config(), &prober).unwrap().value;
        let text = write_timeline(&timeline, &WriterConfig::default()).unwrap();
        assert_eq!(body(&text), vec![line.trim_end()]);
    }
}

#[test]
fn filtering_twice_changes_nothing() {
    let once = filter(EDIT);
    assert_eq!(filter_lines(once.clone()), once);
}

#[test]
fn collection_writes_each_timeline() {
    let prober = DryRunProber::new().with_streams(1, 0);
    let first = read_reel("\"/a.mov\" 1 10 1 10 24\n", &config(), &prober).unwrap().value;
    let second = read_reel("\"/b.mov\" 1 20 1 20 24\n", &config(), &prober).unwrap().value;
    let document = Document::Collection(Collection {
        name: "reels".into(),
        children: vec![first.into(), Document::from(Timeline::new("empty")), second.into()],
    });

    let texts = write_document(&document, &WriterConfig::default()).unwrap();
    assert_eq!(texts.len(), 3);
    assert_eq!(body(&texts[0]), vec!["\"/a.mov\" 1 10 1 10 24"]);
    assert!(body(&texts[1]).is_empty());
    assert_eq!(body(&texts[2]), vec!["\"/b.mov\" 1 20 1 20 24"]);
}

#[test]
fn json_round_trip_keeps_the_timeline() {
    let timeline = read_reel(EDIT, &config(), &edit_prober()).unwrap().value;
    let json = Document::from(timeline.clone()).to_json().unwrap();
    let back = Document::from_json(&json).unwrap();
    assert_eq!(back, Document::Timeline(timeline));
}
