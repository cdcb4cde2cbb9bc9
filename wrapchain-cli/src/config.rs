//! Optional TOML configuration for the CLI

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wrapchain_format::Limits;

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Cannot read config {path}: {source}")]
    Read {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// The file is not valid TOML or has unknown keys
    #[error("Invalid config {path}: {source}")]
    Parse {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },
    /// A value is out of range
    #[error("Invalid config value: {0}")]
    Value(String),
}

/// Defaults that command-line flags override.
///
/// ```toml
/// output = "chain.txt"
/// padding_character = "M"
/// fast_prefix = false
/// verify = true
///
/// [limits]
/// max_chain_len = 1048576
/// max_buffer_len = 134217728
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub output: Option<PathBuf>,
    pub padding_character: Option<String>,
    pub fast_prefix: Option<bool>,
    pub verify: Option<bool>,
    pub limits: Option<LimitsConfig>,
}

/// `[limits]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_chain_len: Option<usize>,
    pub max_buffer_len: Option<usize>,
}

impl CliConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration text
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Padding byte, if configured
    pub fn padding_byte(&self) -> Result<Option<u8>, ConfigError> {
        self.padding_character
            .as_deref()
            .map(parse_padding_character)
            .transpose()
    }

    /// Limits with configured overrides applied
    pub fn limits(&self) -> Limits {
        let mut limits = Limits::default();
        if let Some(cfg) = &self.limits {
            if let Some(max) = cfg.max_chain_len {
                limits.max_chain_len = max;
            }
            if let Some(max) = cfg.max_buffer_len {
                limits.max_buffer_len = max;
            }
        }
        limits
    }
}

/// A padding character must be a single ASCII character.
pub fn parse_padding_character(value: &str) -> Result<u8, ConfigError> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ConfigError::Value(format!(
            "padding character must be one ASCII character, got {value:?}"
        ))),
    }
}
