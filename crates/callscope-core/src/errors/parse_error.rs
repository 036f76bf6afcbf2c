//! Parser errors.
//!
//! These never abort a build. The builder records them as failed files and
//! moves on; only direct callers of the extractor see them.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Why one file produced no units.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Cannot load the Python grammar: {message}")]
    Grammar { message: String },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    #[error("{path} has {error_nodes} syntax error node(s)")]
    Syntax { path: PathBuf, error_nodes: u32 },

    #[error("Parser produced no tree for {path}")]
    NoTree { path: PathBuf },
}

impl ErrorCode for ParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => error_code::SYNTAX_ERROR,
            _ => error_code::PARSE_ERROR,
        }
    }
}
