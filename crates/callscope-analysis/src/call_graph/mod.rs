//! Call Graph: qualified-name registry, name-matching edge resolution,
//! bounded downstream/upstream traversal.

pub mod builder;
pub mod export;
pub mod resolution;
pub mod traversal;
pub mod types;

pub use builder::{build_call_graph, qualify, CallGraphBuilder};
pub use resolution::{resolve_edges, CallResolution, NameIndex, Resolution, ResolutionDiagnostics};
pub use traversal::{downstream, traverse, upstream, TraversalDirection};
pub use types::{CallGraph, CallGraphStats, Unit};
