//! Sorted directory walk using `ignore::WalkBuilder`.
//!
//! Standard gitignore filters are turned off: eligibility is decided only by
//! the extension filter and the fixed exclusion set, so results don't depend
//! on a repository's ignore files. Any walk error is fatal to the build.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use callscope_core::constants::{EXCLUDED_DIR_NAMES, QUALIFIED_NAME_SEPARATOR};
use callscope_core::errors::ScanError;
use ignore::WalkBuilder;

use super::types::SourceFile;

/// True for path components that are never scanned: hidden names and the
/// fixed dependency/build directory names.
pub fn is_excluded_name(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || EXCLUDED_DIR_NAMES.contains(&name.as_ref())
}

/// Dotted module path for a root-relative file path.
pub fn module_path(relative: &Path) -> String {
    let stem = relative.with_extension("");
    let sep = QUALIFIED_NAME_SEPARATOR.to_string();
    stem.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(&sep)
}

/// Enumerate eligible source files under `root`, in sorted walk order.
pub fn discover_source_files(
    root: &Path,
    extensions: &[String],
) -> Result<Vec<SourceFile>, ScanError> {
    let meta = std::fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded_name(entry.file_name()))
        .build();

    let mut files = Vec::new();
    for result in walker {
        let entry = result.map_err(|err| walk_error(root, &err))?;
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| extensions.iter().any(|e| e == ext));
        if !matches_ext {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        files.push(SourceFile {
            path: path.to_path_buf(),
            module_path: module_path(&relative),
            relative,
        });
    }

    tracing::debug!(root = %root.display(), files = files.len(), "source discovery complete");
    Ok(files)
}

fn walk_error(root: &Path, err: &ignore::Error) -> ScanError {
    let path = error_path(err).cloned().unwrap_or_else(|| root.to_path_buf());
    match err.io_error() {
        Some(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
            ScanError::PermissionDenied { path }
        }
        _ => ScanError::Walk {
            path,
            message: err.to_string(),
        },
    }
}

fn error_path(err: &ignore::Error) -> Option<&PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}
