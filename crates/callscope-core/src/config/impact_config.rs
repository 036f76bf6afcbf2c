//! Impact analysis configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_SNIPPET_CHARS};

/// Configuration for impact queries and reports.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ImpactConfig {
    /// Traversal depth for downstream/upstream queries. Default: 3.
    pub max_depth: Option<u32>,
    /// Characters of changed code kept in each function report. Default: 500.
    pub snippet_chars: Option<usize>,
}

impl ImpactConfig {
    /// Returns the effective traversal depth, defaulting to 3.
    pub fn effective_max_depth(&self) -> u32 {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Returns the effective snippet length, defaulting to 500.
    pub fn effective_snippet_chars(&self) -> usize {
        self.snippet_chars.unwrap_or(DEFAULT_SNIPPET_CHARS)
    }
}
