//! Top-level error for end-to-end runs (build, query, report).

use super::error_code::ErrorCode;
use super::{CallGraphError, ConfigError, ImpactError, ParseError, ScanError};

/// Errors that can occur during a full analysis run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Call graph error: {0}")]
    CallGraph(#[from] CallGraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Impact error: {0}")]
    Impact(#[from] ImpactError),
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Scan(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::CallGraph(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Impact(e) => e.error_code(),
        }
    }
}
