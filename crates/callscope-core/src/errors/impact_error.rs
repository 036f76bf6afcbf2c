//! Impact analysis errors.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors raised by the impact report assembler and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ImpactError {
    #[error("Git error: {message}")]
    Git { message: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Report rendering failed: {message}")]
    Render { message: String },

    #[error("Summarizer failed: {message}")]
    Summarizer { message: String },
}

impl ErrorCode for ImpactError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Git { .. } => error_code::GIT_ERROR,
            _ => error_code::IMPACT_ERROR,
        }
    }
}
