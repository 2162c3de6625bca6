//! Splits the body of a `loop`/`while` call into symbol fragments.

use crate::error::{ErrorKind, ScanError};
use regex::Regex;

const BLOCK_STRINGS: &str = r#""([a-zA-Z]|\s|\d)+""#;
const LINE_BREAKS: &str = r"\n+";
const CALL_DELIMITERS: &str = r"(\(\{|\}\)|\(|\))+";
const CALL_DELIMITER: &str = r"\(\{|\}\)|\(|\)";

/// A tokenized block body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Double-quoted literals found in the body. They stay in the text.
    pub literals: Vec<String>,
    /// Fragments of each space-separated chunk, empties removed.
    pub lines: Vec<Vec<String>>,
}

impl Block {
    pub fn fragments(&self) -> Vec<String> {
        self.lines
            .iter()
            .flatten()
            .filter(|fragment| !fragment.is_empty())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BlockTokenizer {
    strings: Regex,
    line_breaks: Regex,
    delimiters: Regex,
    delimiter: Regex,
}

impl BlockTokenizer {
    pub fn new() -> Result<Self, ScanError> {
        Ok(Self {
            strings: compile(BLOCK_STRINGS)?,
            line_breaks: compile(LINE_BREAKS)?,
            delimiters: compile(CALL_DELIMITERS)?,
            delimiter: compile(CALL_DELIMITER)?,
        })
    }

    pub fn parse(&self, body: &str) -> Block {
        let literals: Vec<String> = self
            .strings
            .find_iter(body)
            .map(|m| m.as_str().to_string())
            .collect();

        let joined = self.line_breaks.replace_all(body, "");
        let lines: Vec<Vec<String>> = joined
            .split(' ')
            .map(|chunk| {
                self.split_delimiters(chunk.trim())
                    .into_iter()
                    .filter(|fragment| !fragment.is_empty())
                    .collect()
            })
            .collect();

        Block { literals, lines }
    }

    pub fn tokenize(&self, body: &str) -> Vec<String> {
        self.parse(body).fragments()
    }

    /// Splits around delimiter clusters. Only the last delimiter of a cluster
    /// is kept as a fragment; the ones before it are dropped.
    fn split_delimiters(&self, chunk: &str) -> Vec<String> {
        let mut parts = Vec::new();
        let mut last = 0;
        for m in self.delimiters.find_iter(chunk) {
            parts.push(chunk[last..m.start()].to_string());
            if let Some(kept) = self.delimiter.find_iter(m.as_str()).last() {
                parts.push(kept.as_str().to_string());
            }
            last = m.end();
        }
        parts.push(chunk[last..].to_string());
        parts
    }
}

fn compile(pattern: &str) -> Result<Regex, ScanError> {
    Regex::new(pattern).map_err(|e| ScanError::new(ErrorKind::InvalidPattern, e.to_string()))
}

/// One-shot form of [`BlockTokenizer::tokenize`].
pub fn block_tokenize(body: &str) -> Result<Vec<String>, ScanError> {
    Ok(BlockTokenizer::new()?.tokenize(body))
}
