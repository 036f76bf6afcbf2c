//! UnitExtractor trait: the contract every language extractor implements.

use std::path::Path;

use callscope_core::errors::ParseError;

use super::types::ExtractedUnit;

/// Turns one source file into its function-level units.
pub trait UnitExtractor: Send + Sync {
    /// Extract units in source order. Any syntax error fails the whole file.
    fn extract(&self, source: &[u8], path: &Path) -> Result<Vec<ExtractedUnit>, ParseError>;

    /// Read `path` and extract it.
    fn extract_file(&self, path: &Path) -> Result<Vec<ExtractedUnit>, ParseError> {
        let source = std::fs::read(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.extract(&source, path)
    }
}
