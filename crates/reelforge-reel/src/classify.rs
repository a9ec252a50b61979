//! Classification of filtered Reel lines.
//!
//! A shot line is a quoted name followed by two to five numbers:
//!
//! ```text
//! "<name>" first last [start] [end] [fps]
//! ```
//!
//! Frame numbers are whole numbers no larger than 2^53, so they convert to
//! `f64` exactly. The frame rate is recognised by its decimal point, exponent
//! or sign, or by being the fifth number. With three whole numbers the third
//! is the frame rate of a shot but the end frame of a placeholder.

use std::sync::LazyLock;

use regex::Regex;

/// Reserved name of a black gap placeholder.
pub const BLACK_GAP: &str = "Black Gap";

/// Reserved name of a missing-media placeholder.
pub const CHECKERED: &str = "Checkered";

/// Largest frame number accepted on a shot line.
pub const MAX_FRAME: u64 = 1 << 53;

static AUDIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^audio:\s*(.+)$").expect("valid audio regex"));

static AUDIO_OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^audio offset:\s*(\d+)$").expect("valid audio offset regex"));

/// What a shot line places on the video tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShotKind {
    /// A media file, as written in the line.
    Media(String),
    BlackGap,
    Checkered,
}

impl ShotKind {
    fn from_name(name: &str) -> Self {
        match name {
            BLACK_GAP => ShotKind::BlackGap,
            CHECKERED => ShotKind::Checkered,
            path => ShotKind::Media(path.to_string()),
        }
    }

    /// The name as it appears between the quotes.
    pub fn name(&self) -> &str {
        match self {
            ShotKind::Media(path) => path,
            ShotKind::BlackGap => BLACK_GAP,
            ShotKind::Checkered => CHECKERED,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, ShotKind::Media(_))
    }
}

/// A parsed shot line. Frames are 1-based and inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotLine {
    pub kind: ShotKind,
    pub first: u64,
    pub last: u64,
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub fps: Option<f64>,
}

impl ShotLine {
    /// Start frame, defaulting to the first frame.
    pub fn start_frame(&self) -> u64 {
        self.start.unwrap_or(self.first)
    }

    /// End frame, defaulting to the last frame.
    pub fn end_frame(&self) -> u64 {
        self.end.unwrap_or(self.last)
    }

    /// Whether start/end select less than first/last.
    pub fn has_distinct_source(&self) -> bool {
        self.start_frame() != self.first || self.end_frame() != self.last
    }
}

/// A recognised Reel line.
#[derive(Debug, Clone, PartialEq)]
pub enum ReelLine {
    Shot(ShotLine),
    /// `audio: <path>`
    Audio(String),
    /// `audio offset: <frames>`
    AudioOffset(u64),
}

/// Classify one filtered line. `None` means the line matches no shape.
pub fn classify(text: &str) -> Option<ReelLine> {
    if text.starts_with('"') {
        return parse_shot(text).map(ReelLine::Shot);
    }
    if let Some(caps) = AUDIO_OFFSET_RE.captures(text) {
        return caps[1].parse().ok().map(ReelLine::AudioOffset);
    }
    if let Some(caps) = AUDIO_RE.captures(text) {
        let path = caps[1].trim();
        return (!path.is_empty()).then(|| ReelLine::Audio(path.to_string()));
    }
    None
}

fn parse_shot(text: &str) -> Option<ShotLine> {
    let rest = text.strip_prefix('"')?;
    let (name, fields) = rest.split_once('"')?;
    if name.is_empty() || !fields.starts_with(char::is_whitespace) {
        return None;
    }
    let kind = ShotKind::from_name(name);

    let tokens: Vec<&str> = fields.split_whitespace().collect();
    let (frame_tokens, fps) = match tokens.split_last() {
        Some((last, init)) if looks_like_rate(last) => (init, Some(last.parse::<f64>().ok()?)),
        Some((last, init)) if tokens.len() == 5 => (init, Some(last.parse::<f64>().ok()?)),
        Some((last, init)) if tokens.len() == 3 && !kind.is_placeholder() => {
            (init, Some(last.parse::<f64>().ok()?))
        }
        _ => (tokens.as_slice(), None),
    };

    let frames = frame_tokens
        .iter()
        .map(|t| t.parse::<u64>().ok().filter(|&frame| frame <= MAX_FRAME))
        .collect::<Option<Vec<u64>>>()?;

    let (first, last, start, end) = match (frames.as_slice(), &kind) {
        ([first, last], _) => (*first, *last, None, None),
        ([first, last, end], ShotKind::BlackGap | ShotKind::Checkered) => {
            (*first, *last, None, Some(*end))
        }
        ([first, last, start], ShotKind::Media(_)) => (*first, *last, Some(*start), None),
        ([first, last, start, end], _) => (*first, *last, Some(*start), Some(*end)),
        _ => return None,
    };

    if first < 1 || last < first {
        return None;
    }
    if let Some(fps) = fps {
        if !fps.is_finite() || fps <= 0.0 {
            return None;
        }
    }

    Some(ShotLine {
        kind,
        first,
        last,
        start,
        end,
        fps,
    })
}

fn looks_like_rate(token: &str) -> bool {
    token.contains(['.', 'e', 'E', '+', '-'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn shot(text: &str) -> ShotLine {
        match classify(text) {
            Some(ReelLine::Shot(shot)) => shot,
            other => panic!("expected a shot line, got {other:?}"),
        }
    }

    #[test]
    fn full_shot_line() {
        let line = shot("\"/shots/a.mov\" 1 100 5 90 24.0");
        assert_eq!(line.kind, ShotKind::Media("/shots/a.mov".into()));
        assert_eq!((line.first, line.last), (1, 100));
        assert_eq!((line.start, line.end), (Some(5), Some(90)));
        assert_eq!(line.fps, Some(24.0));
        assert!(line.has_distinct_source());
    }

    #[test]
    fn fifth_whole_number_is_the_rate() {
        let line = shot("\"a.mov\" 1 100 1 100 24");
        assert_eq!(line.fps, Some(24.0));
        assert!(!line.has_distinct_source());
    }

    #[test]
    fn frames_only() {
        let line = shot("\"a b.mov\" 10 20");
        assert_eq!(line.kind.name(), "a b.mov");
        assert_eq!((line.start_frame(), line.end_frame()), (10, 20));
        assert_eq!(line.fps, None);
    }

    #[test]
    fn three_numbers_for_shot_and_placeholder() {
        let media = shot("\"a.mov\" 1 100 24");
        assert_eq!((media.first, media.last), (1, 100));
        assert_eq!((media.start, media.end), (None, None));
        assert_eq!(media.fps, Some(24.0));
        assert!(!media.has_distinct_source());

        let media = shot("\"a.mov\" 1 100 10 23.976");
        assert_eq!((media.start, media.end), (Some(10), None));
        assert_eq!(media.fps, Some(23.976));

        let gap = shot("\"Black Gap\" 1 50 40 24.0");
        assert_eq!(gap.kind, ShotKind::BlackGap);
        assert_eq!((gap.start, gap.end), (None, Some(40)));
    }

    #[test]
    fn largest_frame_is_accepted() {
        let line = shot(&format!("\"a.mov\" 1 {MAX_FRAME} 24.0"));
        assert_eq!(line.last, MAX_FRAME);
        assert_eq!((line.last as f64) as u64, MAX_FRAME);
    }

    #[test]
    fn placeholders() {
        assert_eq!(shot("\"Black Gap\" 1 50 1 50 24.0").kind, ShotKind::BlackGap);
        let checkered = shot("\"Checkered\" 1 50 1 50 24.0");
        assert_eq!(checkered.kind, ShotKind::Checkered);
        assert!(checkered.kind.is_placeholder());
    }

    #[test]
    fn audio_lines() {
        assert_eq!(
            classify("audio: /sound/track one.wav"),
            Some(ReelLine::Audio("/sound/track one.wav".into()))
        );
        assert_eq!(classify("audio offset: 12"), Some(ReelLine::AudioOffset(12)));
        assert_eq!(classify("audio offset:12"), Some(ReelLine::AudioOffset(12)));
        assert_matches!(classify("audio:"), None);
        assert_matches!(classify("audio offset: -3"), None);
    }

    #[test]
    fn rejects_malformed_shots() {
        for text in [
            "\"a.mov\"",
            "\"a.mov\" 1",
            "\"a.mov\" 0 10",
            "\"a.mov\" 10 5",
            "\"a.mov\" 1 x",
            "\"a.mov\" 1.5 10",
            "\"a.mov\" 1 10 -24",
            "\"a.mov\" 1 10 1 10 24 25",
            "\"a.mov\" 1 10 0",
            "\"a.mov\" 1 18446744073709551615 24.0",
            "\"a.mov\" 1 18446744073709551616 24.0",
            "\"Black Gap\" 1 10 1 9007199254740993 24.0",
            "\"\" 1 10",
            "\"a.mov\"1 10",
            "\"a.mov 1 10",
            "clip.mov 1 10",
        ] {
            assert_matches!(classify(text), None, "{text}");
        }
    }
}
