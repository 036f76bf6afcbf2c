//! Impact report types.

use std::fmt;

use serde::{Deserialize, Serialize};

use callscope_core::constants::{RISK_HIGH_THRESHOLD, RISK_MEDIUM_THRESHOLD};

use crate::call_graph::Unit;

/// How risky a change looks given what depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    None,
    Unknown,
}

impl RiskLevel {
    /// Structural rule used when no summarizer text is available.
    pub fn from_downstream_count(count: usize) -> Self {
        match count {
            n if n >= RISK_HIGH_THRESHOLD => Self::High,
            n if n >= RISK_MEDIUM_THRESHOLD => Self::Medium,
            0 => Self::None,
            _ => Self::Low,
        }
    }

    /// Read a level out of free-form analysis text by keyword.
    pub fn from_analysis_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("critical") {
            Self::Critical
        } else if lower.contains("high") && lower.contains("risk") {
            Self::High
        } else if lower.contains("medium") {
            Self::Medium
        } else if lower.contains("low") {
            Self::Low
        } else {
            Self::Unknown
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::None => "None",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_high_or_critical(&self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A unit reached by a traversal, reduced to what a report shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedUnit {
    pub qualified_name: String,
    pub name: String,
    pub file_path: String,
    pub line: u32,
}

impl From<&Unit> for AffectedUnit {
    fn from(unit: &Unit) -> Self {
        Self {
            qualified_name: unit.qualified_name.clone(),
            name: unit.name.clone(),
            file_path: unit.file_path.display().to_string(),
            line: unit.start_line,
        }
    }
}

/// Impact of one changed function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub function_name: String,
    /// Registry key the changed function matched, if any.
    pub qualified_name: Option<String>,
    pub file_path: String,
    pub line: u32,
    pub changed_code: String,
    pub downstream_count: usize,
    pub downstream: Vec<AffectedUnit>,
    pub upstream_count: usize,
    pub upstream: Vec<AffectedUnit>,
    pub risk_analysis: String,
    pub risk_level: RiskLevel,
}

/// Impact of a whole commit range or file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullImpactReport {
    pub repo_path: String,
    /// `base..target`, or `file-analysis` for single-file runs.
    pub commit_range: String,
    pub changed_files: Vec<String>,
    pub function_reports: Vec<ImpactReport>,
    pub summary: String,
    /// Distinct downstream units across every function report.
    pub total_downstream_affected: usize,
}

/// Multi-line summary for a finished set of function reports.
pub fn summary_text(reports: &[ImpactReport], total_downstream: usize) -> String {
    if reports.is_empty() {
        return "No functions analyzed.".to_string();
    }

    let high = reports
        .iter()
        .filter(|r| r.risk_level.is_high_or_critical())
        .count();
    let medium = reports
        .iter()
        .filter(|r| r.risk_level == RiskLevel::Medium)
        .count();

    let mut lines = vec![
        format!("Analyzed {} changed function(s).", reports.len()),
        format!("Total downstream functions affected: {total_downstream}"),
    ];
    if high > 0 {
        lines.push(format!("{high} HIGH/CRITICAL risk change(s) detected!"));
    }
    if medium > 0 {
        lines.push(format!("{medium} medium risk change(s)."));
    }
    if high == 0 && medium == 0 {
        lines.push("No significant risks detected.".to_string());
    }
    lines.join("\n")
}
