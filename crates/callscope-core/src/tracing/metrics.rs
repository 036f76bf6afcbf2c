//! Structured span field names used across callscope subsystems.
//!
//! Keeping them in one place keeps log queries stable.

/// Scanner: number of eligible source files found.
pub const FILES_DISCOVERED: &str = "files_discovered";

/// Builder: files that failed to parse and contributed no units.
pub const FILES_FAILED: &str = "files_failed";

/// Builder: units in the finished registry.
pub const UNITS_REGISTERED: &str = "units_registered";

/// Resolver: resolved call edges.
pub const EDGES_RESOLVED: &str = "edges_resolved";

/// Resolver: fraction of raw call sites that matched at least one unit.
pub const RESOLUTION_RATE: &str = "resolution_rate";

/// Builder: end-to-end build time in milliseconds.
pub const CALL_GRAPH_BUILD_TIME: &str = "call_graph_build_time";

/// Traversal: units returned by a query.
pub const TRAVERSAL_RESULT_COUNT: &str = "traversal_result_count";
