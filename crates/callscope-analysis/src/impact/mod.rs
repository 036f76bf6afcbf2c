//! Impact: changed-function detection, registry matching, risk scoring and
//! report rendering.

pub mod analyzer;
pub mod git_diff;
pub mod render;
pub mod summarizer;
pub mod types;

pub use analyzer::{match_unit, ImpactAnalyzer, FILE_ANALYSIS_RANGE};
pub use git_diff::{changed_source_files, diff_text};
pub use summarizer::{
    structural_analysis, ImpactSummarizer, SummaryRequest, SUMMARY_CODE_CHARS, SUMMARY_DIFF_CHARS,
    SUMMARY_MAX_DOWNSTREAM,
};
pub use types::{summary_text, AffectedUnit, FullImpactReport, ImpactReport, RiskLevel};
