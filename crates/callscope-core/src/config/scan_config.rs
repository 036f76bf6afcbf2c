//! Scanner configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EXTENSION, DEFAULT_THREADS};

/// Configuration for source file discovery and extraction.
///
/// The excluded directory set is fixed (see `constants::EXCLUDED_DIR_NAMES`)
/// and intentionally not configurable.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions to scan, without the dot. Default: `["py"]`.
    pub extensions: Option<Vec<String>>,
    /// Extraction threads. 0 = rayon default. Default: 0.
    pub threads: Option<usize>,
}

impl ScanConfig {
    /// Returns the effective extension filter, defaulting to `["py"]`.
    /// An empty list counts as unset.
    pub fn effective_extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(exts) if !exts.is_empty() => exts.clone(),
            _ => vec![DEFAULT_EXTENSION.to_string()],
        }
    }

    /// Returns the effective thread count, defaulting to 0 (auto).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(DEFAULT_THREADS)
    }
}
