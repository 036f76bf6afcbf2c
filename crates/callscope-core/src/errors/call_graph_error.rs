//! Call graph errors.

use super::error_code::{self, ErrorCode};

/// Errors that can occur while exporting a built call graph.
#[derive(Debug, thiserror::Error)]
pub enum CallGraphError {
    #[error("Call graph export failed: {message}")]
    Export { message: String },
}

impl ErrorCode for CallGraphError {
    fn error_code(&self) -> &'static str {
        error_code::CALL_GRAPH_ERROR
    }
}
