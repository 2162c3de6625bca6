//! Multi-pattern scanner.
//!
//! Every step asks each pattern for its first match in the remaining input and
//! keeps the one starting earliest; on a tie the first declared pattern wins.
//! Unmatched text in front of that match becomes a default-kind gap token.

use crate::error::{ErrorKind, ScanError};
use crate::grammar::PatternTable;
use crate::reserved::{Classifier, ReservedMatch};
use crate::token::{Token, INVALID, STRING, WHITESPACE};
use regex::Match;
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub default_kind: String,
    pub whitespace_kind: String,
    pub string_kind: String,
    pub reserved_match: ReservedMatch,
    pub reserved_case_insensitive: bool,
    /// Fail on gap tokens holding a lone `"` instead of emitting them.
    pub strict_strings: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            default_kind: INVALID.to_string(),
            whitespace_kind: WHITESPACE.to_string(),
            string_kind: STRING.to_string(),
            reserved_match: ReservedMatch::Contains,
            reserved_case_insensitive: true,
            strict_strings: false,
        }
    }
}

pub struct Scanner<'g> {
    patterns: &'g PatternTable,
    classifier: Classifier,
    options: ScanOptions,
}

impl<'g> Scanner<'g> {
    pub fn new(patterns: &'g PatternTable, options: ScanOptions) -> Result<Self, ScanError> {
        let classifier = Classifier::new(
            options.reserved_match,
            options.reserved_case_insensitive,
            &options.string_kind,
        )?;
        Ok(Self {
            patterns,
            classifier,
            options,
        })
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn scan(&self, source: &str) -> Result<Vec<Token>, ScanError> {
        let mut tokens = Vec::new();
        let mut cursor = 0;

        while cursor < source.len() {
            let rest = &source[cursor..];
            let best = self.earliest_match(rest);
            let gap = best.as_ref().map_or(rest.len(), |(_, m)| m.start());

            if gap > 0 {
                let text = &rest[..gap];
                if self.options.strict_strings {
                    if let Some(quote) = text.find('"') {
                        return Err(ScanError::at(
                            ErrorKind::UnterminatedString,
                            "string literal is never closed",
                            source,
                            cursor + quote,
                        ));
                    }
                }
                trace!(text, kind = %self.options.default_kind, "gap");
                tokens.push(Token::new(text, self.options.default_kind.as_str()));
            }

            match best {
                Some((kind, m)) => {
                    if kind != self.options.whitespace_kind {
                        let mut token = Token::new(m.as_str(), kind);
                        self.classifier.classify(&mut token);
                        trace!(text = %token.text, kind = %token.kind, "token");
                        tokens.push(token);
                    }
                    cursor += m.end();
                }
                None => cursor += gap,
            }
        }

        debug!(bytes = source.len(), tokens = tokens.len(), "scanned source");
        Ok(tokens)
    }

    fn earliest_match<'s>(&self, rest: &'s str) -> Option<(&'g str, Match<'s>)> {
        let patterns: &'g PatternTable = self.patterns;
        let mut best: Option<(&'g str, Match<'s>)> = None;
        for pattern in patterns.iter() {
            let found = pattern
                .regex()
                .find_iter(rest)
                .find(|m| !m.as_str().is_empty());
            if let Some(m) = found {
                if best.as_ref().map_or(true, |(_, b)| m.start() < b.start()) {
                    best = Some((pattern.kind(), m));
                }
            }
        }
        best
    }
}

/// Scans `source` with the default options apart from the gap token kind.
pub fn scan(source: &str, patterns: &PatternTable, default_kind: &str) -> Vec<Token> {
    let options = ScanOptions {
        default_kind: default_kind.to_string(),
        ..ScanOptions::default()
    };
    Scanner::new(patterns, options)
        .and_then(|scanner| scanner.scan(source))
        .unwrap_or_default()
}
