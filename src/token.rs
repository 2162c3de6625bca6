use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind given to tokens promoted by the reserved-word classifier.
pub const RESERVED: &str = "RESERVED";
/// Kind of double-quoted string literals. Never reclassified.
pub const STRING: &str = "STRING";
/// Kind whose matches are dropped instead of emitted.
pub const WHITESPACE: &str = "WHITESPACE";
/// Kind of the unmatched spans between pattern matches.
pub const INVALID: &str = "INVALID";

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: String,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: kind.into(),
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn is_reserved(&self) -> bool {
        self.is(RESERVED)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:<10} {:?}", self.kind, self.text)
    }
}
