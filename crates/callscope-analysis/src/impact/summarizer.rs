//! Pluggable prose analysis of a change.
//!
//! No implementation ships with the crate. Without one, reports carry the
//! structural text from [`structural_analysis`].

use callscope_core::errors::ImpactError;

use crate::call_graph::Unit;

/// Most downstream units handed to a summarizer.
pub const SUMMARY_MAX_DOWNSTREAM: usize = 10;
/// Changed code handed to a summarizer, in chars.
pub const SUMMARY_CODE_CHARS: usize = 3000;
/// Diff context handed to a summarizer, in chars.
pub const SUMMARY_DIFF_CHARS: usize = 2000;

/// Everything a summarizer gets to look at for one changed function.
#[derive(Debug, Clone, Copy)]
pub struct SummaryRequest<'a> {
    pub function_name: &'a str,
    pub changed_code: &'a str,
    /// At most [`SUMMARY_MAX_DOWNSTREAM`] units, in traversal order.
    pub downstream: &'a [&'a Unit],
    pub diff_context: &'a str,
}

/// Produces free-form risk analysis. The risk level is read back out of the
/// returned text by keyword.
pub trait ImpactSummarizer: Send + Sync {
    fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String, ImpactError>;
}

/// Analysis text used when there is no summarizer or nothing downstream.
pub fn structural_analysis(downstream_count: usize) -> String {
    if downstream_count == 0 {
        "No downstream dependents found. This function appears to be a leaf node or entry point."
            .to_string()
    } else {
        format!(
            "Found {downstream_count} downstream dependencies. \
             Configure a summarizer for semantic analysis."
        )
    }
}
