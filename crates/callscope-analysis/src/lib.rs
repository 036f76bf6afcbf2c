//! # callscope-analysis
//!
//! Analysis engine for callscope:
//! - Scanner: deterministic discovery of Python sources under a root
//! - Parsers: tree-sitter based extraction of function-level units
//! - Call Graph: qualified-name registry, name-matching edge resolution,
//!   bounded downstream/upstream traversal
//! - Impact: changed-function detection, per-function and whole-run reports

pub mod call_graph;
pub mod impact;
pub mod parsers;
pub mod scanner;

pub use call_graph::{build_call_graph, CallGraph, CallGraphBuilder, Unit};
pub use impact::{FullImpactReport, ImpactAnalyzer, ImpactReport, RiskLevel};
