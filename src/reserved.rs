use crate::error::{ErrorKind, ScanError};
use crate::stdlib::Builtin;
use crate::token::{Token, RESERVED};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const RESERVED_WORDS: [&str; 19] = [
    "%",
    "print",
    "printf",
    "set",
    "rem",
    "if",
    "if_else",
    "loop",
    "while",
    "for",
    "function",
    "true",
    "false",
    "equals",
    "not_equals",
    "less_than",
    "less_or_equals",
    "greater_than",
    "greater_or_equals",
];

/// Exact membership in the reserved-word set.
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// How token text is tested against the classifier vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservedMatch {
    /// The text only has to contain a vocabulary word somewhere.
    #[default]
    Contains,
    /// The whole text must be a vocabulary word.
    Exact,
}

/// Rewrites the kind of tokens naming a built-in to `RESERVED`.
///
/// The vocabulary is the reserved-word set followed by the standard library
/// names. String literals are never rewritten.
#[derive(Debug, Clone)]
pub struct Classifier {
    matcher: Regex,
    string_kind: String,
}

impl Classifier {
    pub fn new(
        policy: ReservedMatch,
        case_insensitive: bool,
        string_kind: &str,
    ) -> Result<Self, ScanError> {
        let alternation = vocabulary()
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        let source = match policy {
            ReservedMatch::Contains => format!("({})", alternation),
            ReservedMatch::Exact => format!("^({})$", alternation),
        };
        let matcher = RegexBuilder::new(&source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| ScanError::new(ErrorKind::InvalidPattern, e.to_string()))?;
        Ok(Self {
            matcher,
            string_kind: string_kind.to_string(),
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    pub fn classify(&self, token: &mut Token) {
        if token.kind != self.string_kind && self.matches(&token.text) {
            trace!(text = %token.text, from = %token.kind, "reclassified as reserved");
            token.kind = RESERVED.to_string();
        }
    }
}

fn vocabulary() -> Vec<&'static str> {
    let mut words: Vec<&'static str> = RESERVED_WORDS.to_vec();
    for builtin in Builtin::ALL {
        if !words.contains(&builtin.name()) {
            words.push(builtin.name());
        }
    }
    words
}
