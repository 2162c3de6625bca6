use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnterminatedString,
    UnknownPattern,
    NonTerminatingPattern,
    InvalidPattern,
    DuplicatePattern,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorKind::UnterminatedString => "unterminated string",
            ErrorKind::UnknownPattern => "unknown pattern",
            ErrorKind::NonTerminatingPattern => "non-terminating pattern",
            ErrorKind::InvalidPattern => "invalid pattern",
            ErrorKind::DuplicatePattern => "duplicate pattern",
        };
        f.write_str(name)
    }
}

/// Fatal scanner or grammar condition. `line` and `column` are 1-based and
/// zero when the error does not point into source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ScanError: {message}\n  --> {line}:{column}")]
pub struct ScanError {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ScanError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    /// Builds an error located at byte `offset` of `source`.
    pub fn at(kind: ErrorKind, message: impl Into<String>, source: &str, offset: usize) -> Self {
        let before = &source[..offset.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ConfigError: cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ConfigError: malformed {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IOError: {0}")]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("JsonError: {0}")]
    Json(#[from] serde_json::Error),
    #[error("UnknownBuiltin: {0} is not a standard library name")]
    UnknownBuiltin(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_offset_on_later_line() {
        let source = "print(\"a\")\nset(x, \"oops)";
        let err = ScanError::at(ErrorKind::UnterminatedString, "open string", source, 18);
        assert_eq!(err.line, 2);
        assert_eq!(err.column, 8);
        assert_eq!(err.to_string(), "ScanError: open string\n  --> 2:8");
    }
}
