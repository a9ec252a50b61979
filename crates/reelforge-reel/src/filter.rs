//! Removal of headers, comments and decoration from Reel text.

use std::sync::LazyLock;

use regex::Regex;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*Version\s+\d+\.*\d*").expect("valid version regex"));

static NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:|#.*|Ghosting \d \d|EDL)$").expect("valid noise regex"));

static SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^GL.*Shape.*$").expect("valid shape regex"));

/// A trimmed input line and its 1-based position in the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Split `input` into lines and keep only those that may carry shots.
pub fn filter(input: &str) -> Vec<Line> {
    filter_lines(
        input
            .lines()
            .enumerate()
            .map(|(index, text)| Line::new(index + 1, text)),
    )
}

/// Trim each line and drop version declarations, blank lines, comments,
/// ghosting directives, the `EDL` sentinel and shape drawings.
pub fn filter_lines(lines: impl IntoIterator<Item = Line>) -> Vec<Line> {
    lines
        .into_iter()
        .filter_map(|line| {
            let text = line.text.trim();
            if is_noise(text) {
                None
            } else {
                Some(Line::new(line.number, text))
            }
        })
        .collect()
}

fn is_noise(text: &str) -> bool {
    VERSION_RE.is_match(text) || NOISE_RE.is_match(text) || SHAPE_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REEL: &str = "\
#
# File created with reelforge
#
# Date: 2024-03-01 10:00:00
#

Version 4.0
Ghosting 5 5
   \"/shots/a.mov\" 1 100 1 100 24   
audio: /sound/a.wav
GLPathShape 1 2 3
\"Black Gap\" 1 10 1 10 24
EDL
";

    fn texts(lines: &[Line]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn keeps_only_content_lines() {
        let lines = filter(REEL);
        assert_eq!(
            texts(&lines),
            vec![
                "\"/shots/a.mov\" 1 100 1 100 24",
                "audio: /sound/a.wav",
                "\"Black Gap\" 1 10 1 10 24",
            ]
        );
    }

    #[test]
    fn keeps_original_line_numbers() {
        let numbers: Vec<usize> = filter(REEL).iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![9, 10, 12]);
    }

    #[test]
    fn version_without_fraction() {
        assert!(filter("Version 3\n").is_empty());
        assert!(filter("  Version 3.0\n").is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = filter(REEL);
        let twice = filter_lines(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn ghosting_requires_two_digits() {
        assert_eq!(texts(&filter("Ghosting 5\n")), vec!["Ghosting 5"]);
    }
}
