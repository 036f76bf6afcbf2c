//! Report renderers: JSON, markdown and a console summary.

use std::fmt::Write;

use callscope_core::errors::ImpactError;

use super::types::FullImpactReport;

/// Affected units listed per function before eliding the rest.
const MARKDOWN_AFFECTED_LIMIT: usize = 10;
const BANNER_WIDTH: usize = 60;

pub fn to_json(report: &FullImpactReport) -> Result<String, ImpactError> {
    serde_json::to_string_pretty(report).map_err(|e| ImpactError::Render {
        message: e.to_string(),
    })
}

pub fn to_markdown(report: &FullImpactReport) -> String {
    let mut out = String::new();
    // Writing into a String can't fail.
    let _ = write_markdown(&mut out, report);
    out
}

fn write_markdown(out: &mut String, report: &FullImpactReport) -> std::fmt::Result {
    writeln!(out, "# Semantic Impact Analysis Report\n")?;
    writeln!(out, "**Repository:** `{}`", report.repo_path)?;
    writeln!(out, "**Commit Range:** `{}`", report.commit_range)?;
    writeln!(out, "**Changed Files:** {}", report.changed_files.len())?;
    writeln!(
        out,
        "**Total Downstream Affected:** {}\n",
        report.total_downstream_affected
    )?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "{}\n", report.summary)?;

    if report.function_reports.is_empty() {
        return Ok(());
    }

    writeln!(out, "## Function-by-Function Analysis\n")?;
    for fr in &report.function_reports {
        writeln!(out, "### `{}` ({}:{})\n", fr.function_name, fr.file_path, fr.line)?;
        writeln!(out, "**Risk Score:** {}", fr.risk_level)?;
        writeln!(out, "**Downstream Dependents:** {}", fr.downstream_count)?;
        writeln!(out, "**Upstream Dependencies:** {}\n", fr.upstream_count)?;

        if !fr.downstream.is_empty() {
            writeln!(out, "**Affected Functions:**\n")?;
            for affected in fr.downstream.iter().take(MARKDOWN_AFFECTED_LIMIT) {
                writeln!(
                    out,
                    "- `{}` ({}:{})",
                    affected.qualified_name, affected.file_path, affected.line
                )?;
            }
            let rest = fr.downstream.len().saturating_sub(MARKDOWN_AFFECTED_LIMIT);
            if rest > 0 {
                writeln!(out, "- ... and {rest} more")?;
            }
            writeln!(out)?;
        }

        writeln!(out, "**Analysis:**\n")?;
        writeln!(out, "{}\n", fr.risk_analysis)?;
        writeln!(out, "---\n")?;
    }
    Ok(())
}

pub fn to_console(report: &FullImpactReport) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut lines = vec![
        banner.clone(),
        "SEMANTIC IMPACT ANALYSIS REPORT".to_string(),
        banner.clone(),
        String::new(),
        report.summary.clone(),
    ];
    if !report.function_reports.is_empty() {
        lines.push(String::new());
        for fr in &report.function_reports {
            lines.push(format!(
                "  {} ({}) - {} downstream",
                fr.function_name, fr.risk_level, fr.downstream_count
            ));
        }
    }
    lines.push(banner);
    lines.join("\n")
}
