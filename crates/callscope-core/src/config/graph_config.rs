//! Call graph configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_BODY_CHARS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphConfig {
    /// Hard cap on characters kept in each unit's body text. Default: 4000.
    pub max_body_chars: Option<usize>,
}

impl GraphConfig {
    pub fn effective_max_body_chars(&self) -> usize {
        self.max_body_chars.unwrap_or(DEFAULT_MAX_BODY_CHARS)
    }
}
