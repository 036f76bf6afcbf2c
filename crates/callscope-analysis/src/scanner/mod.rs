//! Scanner subsystem: eligible source file discovery.
//!
//! Walks the root in a stable order, skipping hidden and well-known
//! dependency/build directories, and derives each file's module path.

pub mod language_detect;
pub mod types;
pub mod walker;

pub use language_detect::Language;
pub use types::SourceFile;
pub use walker::{discover_source_files, is_excluded_name, module_path};
