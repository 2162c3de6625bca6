use crate::environment::Admission;
use crate::error::{CliError, ConfigError};
use crate::grammar::PatternTable;
use crate::reserved::ReservedMatch;
use crate::scanner::ScanOptions;
use crate::token::{INVALID, STRING, WHITESPACE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Grammar file replacing the built-in pattern table.
    pub grammar: Option<PathBuf>,
    pub default_kind: String,
    pub whitespace_kind: String,
    pub string_kind: String,
    pub strict_strings: bool,
    pub reserved_match: ReservedMatch,
    pub reserved_case_insensitive: bool,
    pub admission: Admission,
    /// Per-kind replacement patterns applied on top of the grammar.
    pub pattern_overrides: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            grammar: None,
            default_kind: INVALID.to_string(),
            whitespace_kind: WHITESPACE.to_string(),
            string_kind: STRING.to_string(),
            strict_strings: false,
            reserved_match: ReservedMatch::default(),
            reserved_case_insensitive: true,
            admission: Admission::default(),
            pattern_overrides: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, contents).map_err(io_error)
    }

    pub fn get_home_dir() -> PathBuf {
        if let Ok(custom_dir) = env::var("FUNCTIONAL_HOME") {
            return PathBuf::from(custom_dir);
        }

        let env_name = env::var("FUNCTIONAL_ENV").unwrap_or_else(|_| String::from("default"));
        let base_dir = if cfg!(windows) {
            env::var("USERPROFILE")
        } else {
            env::var("HOME")
        };
        PathBuf::from(base_dir.unwrap_or_else(|_| String::from(".")))
            .join(".functional")
            .join(env_name)
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_home_dir().join("config.json")
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            default_kind: self.default_kind.clone(),
            whitespace_kind: self.whitespace_kind.clone(),
            string_kind: self.string_kind.clone(),
            reserved_match: self.reserved_match,
            reserved_case_insensitive: self.reserved_case_insensitive,
            strict_strings: self.strict_strings,
        }
    }

    /// The configured grammar file (or the built-in one) with overrides applied.
    pub fn pattern_table(&self) -> Result<PatternTable, CliError> {
        let mut table = match &self.grammar {
            Some(path) => {
                let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                PatternTable::from_json(&contents)?
            }
            None => PatternTable::functional()?,
        };
        table.apply_overrides(&self.pattern_overrides)?;
        Ok(table)
    }
}
