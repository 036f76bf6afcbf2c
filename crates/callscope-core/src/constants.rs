//! Shared constants for the callscope engine.

/// Default source extension.
pub const DEFAULT_EXTENSION: &str = "py";

/// Extensions the Python extractor accepts.
pub const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];

/// Default number of extraction threads (0 = rayon default).
pub const DEFAULT_THREADS: usize = 0;

/// Maximum characters kept in a unit's body text.
pub const DEFAULT_MAX_BODY_CHARS: usize = 4000;

/// Default traversal depth for impact queries.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Characters of changed code kept in an impact report.
pub const DEFAULT_SNIPPET_CHARS: usize = 500;

/// Separator between module path, class and function name.
pub const QUALIFIED_NAME_SEPARATOR: char = '.';

/// Directory names never descended into. Hidden directories (leading `.`)
/// are excluded separately.
pub const EXCLUDED_DIR_NAMES: &[&str] = &[
    "venv",
    ".venv",
    "node_modules",
    "__pycache__",
    "build",
    "dist",
];

/// Project-level config file name, looked up in the analysis root.
pub const PROJECT_CONFIG_FILE: &str = "callscope.toml";

// ---- Risk thresholds (downstream unit count) ----

/// Downstream count at or above which a change is high risk.
pub const RISK_HIGH_THRESHOLD: usize = 5;

/// Downstream count at or above which a change is medium risk.
pub const RISK_MEDIUM_THRESHOLD: usize = 2;

/// Number of most-called units listed by the CLI.
pub const MOST_CALLED_LIMIT: usize = 10;
