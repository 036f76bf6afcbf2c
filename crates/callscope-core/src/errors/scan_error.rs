//! Scanner errors. All of these are fatal to a build.

use std::path::PathBuf;

use super::error_code::{self, ErrorCode};

/// Errors that can occur while enumerating source files.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Root directory not found: {path}")]
    RootNotFound { path: PathBuf },

    #[error("Root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("IO error scanning {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Directory walk failed at {path}: {message}")]
    Walk { path: PathBuf, message: String },
}

impl ScanError {
    /// Classify an IO error raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::RootNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::IoError { path, source },
        }
    }
}

impl ErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::RootNotFound { .. } | Self::NotADirectory { .. } => error_code::ROOT_NOT_FOUND,
            Self::PermissionDenied { .. } => error_code::PERMISSION_DENIED,
            _ => error_code::SCAN_ERROR,
        }
    }
}
