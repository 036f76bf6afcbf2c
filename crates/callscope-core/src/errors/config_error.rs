//! Configuration errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Failures while layering `callscope.toml`, the user config and overrides.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// `origin` is the file path, or `inline TOML` for string input.
    #[error("Malformed config in {origin}: {message}")]
    Malformed { origin: String, message: String },

    #[error("Invalid setting {field}: {message}")]
    Invalid { field: &'static str, message: String },

    #[error("Cannot serialize config: {message}")]
    Serialize { message: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        error_code::CONFIG_ERROR
    }
}
