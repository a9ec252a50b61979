//! Recoverable conversion diagnostics.

use std::path::PathBuf;

/// A problem the converter worked around. Collected during a conversion and
/// handed back with the result so callers can report them afterwards.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReelWarning {
    /// The line matched no known shape and was dropped.
    #[error("line {line}: unrecognized line dropped: {text}")]
    MalformedLine { line: usize, text: String },

    /// No frame rate in the line, from the prober or from earlier lines.
    #[error("line {line}: no frame rate for {}, assuming 30 fps", path.display())]
    FrameRateUnresolved { line: usize, path: PathBuf },

    /// The attached audio runs past the end of its shot and was cut.
    #[error(
        "line {line}: audio {} is too long ({audio_seconds:.3}s for a {shot_seconds:.3}s shot), using a portion of it",
        path.display()
    )]
    AudioTooLong {
        line: usize,
        path: PathBuf,
        audio_seconds: f64,
        shot_seconds: f64,
    },

    /// The start/end frames fell outside the first/last frames.
    #[error("line {line}: source range of {} clamped: {reason}", path.display())]
    SourceRangeClamped {
        line: usize,
        path: PathBuf,
        reason: String,
    },

    /// An `audio:` line with no shot before it.
    #[error("line {line}: audio {} has no shot to attach to", path.display())]
    OrphanAudio { line: usize, path: PathBuf },

    /// An `audio offset:` line not preceded by an `audio:` line.
    #[error("line {line}: audio offset {offset} has no audio line to apply to")]
    OrphanAudioOffset { line: usize, offset: u64 },

    /// The audio offset lies at or past the end of the audio media.
    #[error("line {line}: audio offset {offset} is beyond the end of {}", path.display())]
    AudioOffsetBeyondMedia {
        line: usize,
        path: PathBuf,
        offset: u64,
    },
}

impl ReelWarning {
    /// The 1-based input line the warning refers to.
    pub fn line(&self) -> usize {
        match self {
            ReelWarning::MalformedLine { line, .. }
            | ReelWarning::FrameRateUnresolved { line, .. }
            | ReelWarning::AudioTooLong { line, .. }
            | ReelWarning::SourceRangeClamped { line, .. }
            | ReelWarning::OrphanAudio { line, .. }
            | ReelWarning::OrphanAudioOffset { line, .. }
            | ReelWarning::AudioOffsetBeyondMedia { line, .. } => *line,
        }
    }
}

/// The result of a conversion together with the warnings it raised.
#[derive(Debug, Clone)]
pub struct Converted<T> {
    pub value: T,
    pub warnings: Vec<ReelWarning>,
}

impl<T> Converted<T> {
    pub fn new(value: T, warnings: Vec<ReelWarning>) -> Self {
        Self { value, warnings }
    }

    /// True when nothing had to be worked around.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Converted<U> {
        Converted {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Number of lines dropped as unrecognized.
    pub fn dropped_lines(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ReelWarning::MalformedLine { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_report_their_line() {
        let warning = ReelWarning::OrphanAudioOffset { line: 9, offset: 12 };
        assert_eq!(warning.line(), 9);
        assert_eq!(
            warning.to_string(),
            "line 9: audio offset 12 has no audio line to apply to"
        );
    }

    #[test]
    fn counts_dropped_lines() {
        let converted = Converted::new(
            (),
            vec![
                ReelWarning::MalformedLine {
                    line: 1,
                    text: "garbage".into(),
                },
                ReelWarning::FrameRateUnresolved {
                    line: 2,
                    path: PathBuf::from("Black Gap"),
                },
                ReelWarning::MalformedLine {
                    line: 3,
                    text: "\"a.mov\" x y".into(),
                },
            ],
        );
        assert!(!converted.is_clean());
        assert_eq!(converted.dropped_lines(), 2);
        assert_eq!(converted.map(|_| 5).value, 5);
    }
}
