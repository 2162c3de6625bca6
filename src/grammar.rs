//! The pattern table consumed by the scanner.
//!
//! A table is an ordered list of `(kind, regex)` entries. Order matters: when
//! two patterns match at the same offset the first declared one wins.

use crate::error::{ErrorKind, ScanError};
use crate::token::{STRING, WHITESPACE};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Serialized form of one grammar rule, as found in grammar files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub kind: String,
    pub pattern: String,
}

#[derive(Debug, Clone)]
pub struct Pattern {
    kind: String,
    regex: Regex,
}

impl Pattern {
    fn compile(kind: &str, pattern: &str) -> Result<Self, ScanError> {
        let regex = Regex::new(pattern).map_err(|e| {
            ScanError::new(
                ErrorKind::InvalidPattern,
                format!("pattern {} for {} does not compile: {}", pattern, kind, e),
            )
        })?;

        // Anything that can match "" could stall the scan loop.
        if regex.is_match("") {
            return Err(ScanError::new(
                ErrorKind::NonTerminatingPattern,
                format!("pattern {} for {} matches the empty string", pattern, kind),
            ));
        }

        Ok(Self {
            kind: kind.to_string(),
            regex,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: Vec<Pattern>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The grammar of the Functional language.
    pub fn functional() -> Result<Self, ScanError> {
        Self::from_rules(&DEFAULT_GRAMMAR)
    }

    fn from_rules(rules: &[(&str, &str)]) -> Result<Self, ScanError> {
        let mut table = Self::new();
        for (kind, pattern) in rules {
            table.push(kind, pattern)?;
        }
        Ok(table)
    }

    pub fn from_entries<'a, I>(entries: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = &'a PatternEntry>,
    {
        let mut table = Self::new();
        for entry in entries {
            table.push(&entry.kind, &entry.pattern)?;
        }
        Ok(table)
    }

    /// Reads a grammar file: a JSON array of `{ "kind", "pattern" }` objects.
    pub fn from_json(contents: &str) -> Result<Self, ScanError> {
        let entries: Vec<PatternEntry> = serde_json::from_str(contents).map_err(|e| {
            ScanError::new(ErrorKind::InvalidPattern, format!("malformed grammar: {}", e))
        })?;
        Self::from_entries(&entries)
    }

    pub fn push(&mut self, kind: &str, pattern: &str) -> Result<(), ScanError> {
        if self.contains(kind) {
            return Err(ScanError::new(
                ErrorKind::DuplicatePattern,
                format!("{} is declared twice", kind),
            ));
        }
        self.patterns.push(Pattern::compile(kind, pattern)?);
        Ok(())
    }

    /// Swaps the rule for `kind`, keeping its position in the table.
    pub fn replace(&mut self, kind: &str, pattern: &str) -> Result<(), ScanError> {
        let compiled = Pattern::compile(kind, pattern)?;
        match self.patterns.iter_mut().find(|p| p.kind == kind) {
            Some(slot) => {
                debug!(kind, pattern, "replaced grammar rule");
                *slot = compiled;
                Ok(())
            }
            None => Err(ScanError::new(
                ErrorKind::UnknownPattern,
                format!("{} is not declared by the grammar", kind),
            )),
        }
    }

    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) -> Result<(), ScanError> {
        for (kind, pattern) in overrides {
            self.replace(kind, pattern)?;
        }
        Ok(())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.patterns.iter().any(|p| p.kind == kind)
    }

    pub fn get(&self, kind: &str) -> Option<&Regex> {
        self.patterns.iter().find(|p| p.kind == kind).map(|p| &p.regex)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn entries(&self) -> Vec<PatternEntry> {
        self.patterns
            .iter()
            .map(|p| PatternEntry {
                kind: p.kind.clone(),
                pattern: p.regex.as_str().to_string(),
            })
            .collect()
    }
}

const DEFAULT_GRAMMAR: [(&str, &str); 10] = [
    (STRING, r#""([a-zA-Z]|\s|\d)+""#),
    (WHITESPACE, r"\s+"),
    ("NUMBER", r"\d+(\.\d+)?"),
    ("BAREWORD", r"[A-Za-z_][A-Za-z0-9_]*"),
    ("LPAREN", r"\("),
    ("RPAREN", r"\)"),
    ("LBRACE", r"\{"),
    ("RBRACE", r"\}"),
    ("COMMA", r","),
    ("OPERATOR", r"[-+*/%<>=!]+"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grammar_keeps_every_rule_in_order() {
        let table = PatternTable::functional().unwrap();
        let kinds: Vec<&str> = table.iter().map(|p| p.kind()).collect();
        let declared: Vec<&str> = DEFAULT_GRAMMAR.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, declared);
        assert_eq!(kinds[0], STRING);
        assert_eq!(kinds[1], WHITESPACE);
    }

    #[test]
    fn default_grammar_passes_validation() {
        let entries = PatternTable::functional().unwrap().entries();
        assert!(PatternTable::from_entries(&entries).is_ok());
    }

    #[test]
    fn broken_built_in_rule_is_reported() {
        let rules = [("WORD", r"\w+"), ("OPEN", "("), ("COMMA", ",")];
        let err = PatternTable::from_rules(&rules).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidPattern);
    }

    #[test]
    fn rejects_patterns_matching_empty_string() {
        let mut table = PatternTable::new();
        let err = table.push("SPACES", r"\s*").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NonTerminatingPattern);
        assert!(table.is_empty());
    }

    #[test]
    fn rejects_bad_regex_and_duplicates() {
        let mut table = PatternTable::new();
        assert_eq!(table.push("OPEN", "(").unwrap_err().kind, ErrorKind::InvalidPattern);
        table.push("WORD", r"\w+").unwrap();
        assert_eq!(table.push("WORD", "x").unwrap_err().kind, ErrorKind::DuplicatePattern);
    }

    #[test]
    fn replace_keeps_position_and_reports_unknown_kinds() {
        let mut table = PatternTable::functional().unwrap();
        table.replace("NUMBER", r"[0-9]+").unwrap();
        assert_eq!(table.iter().nth(2).unwrap().regex().as_str(), "[0-9]+");

        let err = table.replace("FLOAT", r"\d+\.\d+").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownPattern);
    }

    #[test]
    fn loads_grammar_from_json() {
        let table = PatternTable::from_json(
            r#"[{"kind": "WORD", "pattern": "[a-z]+"}, {"kind": "DIGITS", "pattern": "[0-9]+"}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get("DIGITS").unwrap().is_match("42"));
        assert!(PatternTable::from_json("{}").is_err());
    }
}
