//! Scanner output types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One eligible source file found under the analysis root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Root joined with the relative path.
    pub path: PathBuf,
    /// Path relative to the analysis root.
    pub relative: PathBuf,
    /// Dotted module path, e.g. `pkg/mod.py` → `pkg.mod`.
    pub module_path: String,
}
