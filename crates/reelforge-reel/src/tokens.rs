//! Peekable stream of classified lines.

use std::iter::Peekable;
use std::vec;

use crate::classify::{classify, ReelLine};
use crate::filter::Line;
use crate::warning::ReelWarning;

/// A classified line and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// 1-based line number in the original text.
    pub line: usize,
    pub kind: ReelLine,
}

/// The recognised lines of a shot list, in order, with one token of
/// lookahead.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Peekable<vec::IntoIter<Token>>,
}

impl TokenStream {
    /// Classify filtered lines. Lines that match no shape are dropped and
    /// reported in `warnings`.
    pub fn new(lines: impl IntoIterator<Item = Line>, warnings: &mut Vec<ReelWarning>) -> Self {
        let mut tokens = Vec::new();
        for line in lines {
            match classify(&line.text) {
                Some(kind) => tokens.push(Token {
                    line: line.number,
                    kind,
                }),
                None => {
                    tracing::debug!(line = line.number, text = %line.text, "dropping unrecognized line");
                    warnings.push(ReelWarning::MalformedLine {
                        line: line.number,
                        text: line.text,
                    });
                }
            }
        }
        Self::from_tokens(tokens)
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
        }
    }

    /// The next token without consuming it.
    pub fn peek(&mut self) -> Option<&ReelLine> {
        self.tokens.peek().map(|t| &t.kind)
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;

    #[test]
    fn drops_and_reports_malformed_lines() {
        let mut warnings = Vec::new();
        let mut stream = TokenStream::new(
            filter("\"a.mov\" 1 10 1 10 24\nnot a shot\naudio offset: 3\n"),
            &mut warnings,
        );

        assert!(matches!(stream.peek(), Some(ReelLine::Shot(_))));
        assert_eq!(stream.next().map(|t| t.line), Some(1));
        assert_eq!(stream.next().map(|t| t.kind), Some(ReelLine::AudioOffset(3)));
        assert!(stream.next().is_none());

        assert_eq!(
            warnings,
            vec![ReelWarning::MalformedLine {
                line: 2,
                text: "not a shot".into(),
            }]
        );
    }
}
