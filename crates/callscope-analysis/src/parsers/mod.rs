//! Parser subsystem: per-file extraction of function-level units.
//!
//! Extraction is pure and file-scoped. A file that fails to parse yields an
//! error here; the builder turns that into "zero units" for the file.

pub mod calls;
pub mod python;
pub mod scope;
pub mod traits;
pub mod types;

pub use python::PythonExtractor;
pub use scope::ScopeContext;
pub use traits::UnitExtractor;
pub use types::ExtractedUnit;
