//! Impact analyzer: changed functions → registry matches → bounded
//! traversals → per-function and whole-run reports.

use std::path::{Path, PathBuf};

use callscope_core::config::CallscopeConfig;
use callscope_core::errors::{PipelineError, ScanError};
use callscope_core::tracing::metrics;
use callscope_core::types::collections::BTreeSet;

use super::git_diff::{changed_source_files, diff_text};
use super::summarizer::{
    structural_analysis, ImpactSummarizer, SummaryRequest, SUMMARY_CODE_CHARS,
    SUMMARY_DIFF_CHARS, SUMMARY_MAX_DOWNSTREAM,
};
use super::types::{summary_text, AffectedUnit, FullImpactReport, ImpactReport, RiskLevel};
use crate::call_graph::{downstream, qualify, upstream, CallGraph, CallGraphBuilder, Unit};
use crate::parsers::python::truncate_chars;
use crate::parsers::{ExtractedUnit, UnitExtractor};
use crate::scanner::module_path;

/// Commit range label for single-file runs.
pub const FILE_ANALYSIS_RANGE: &str = "file-analysis";

/// Owns the registry for one root and assembles impact reports against it.
pub struct ImpactAnalyzer {
    root: PathBuf,
    config: CallscopeConfig,
    builder: CallGraphBuilder,
    graph: Option<CallGraph>,
    summarizer: Option<Box<dyn ImpactSummarizer>>,
}

impl ImpactAnalyzer {
    /// The root is canonicalized when possible so registry paths and git
    /// work-tree paths compare equal.
    pub fn new(root: impl Into<PathBuf>, config: CallscopeConfig) -> Self {
        let root = root.into();
        let root = std::fs::canonicalize(&root).unwrap_or(root);
        Self {
            builder: CallGraphBuilder::new(&config),
            root,
            config,
            graph: None,
            summarizer: None,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Box<dyn ImpactSummarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CallscopeConfig {
        &self.config
    }

    /// Rebuild the registry from the current state of the root.
    pub fn build_graph(&mut self) -> Result<&CallGraph, ScanError> {
        let graph = self.builder.build(&self.root)?;
        Ok(self.graph.insert(graph))
    }

    /// The last built registry, if any.
    pub fn graph(&self) -> Option<&CallGraph> {
        self.graph.as_ref()
    }

    /// Units defined in each file that still exists. Files that can't be
    /// read or parsed are skipped.
    pub fn changed_units(&self, files: &[PathBuf]) -> Vec<(PathBuf, ExtractedUnit)> {
        let extractor = self.builder.extractor();
        let mut out = Vec::new();
        for file in files {
            if !file.is_file() {
                tracing::debug!(file = %file.display(), "changed file no longer exists");
                continue;
            }
            match extractor.extract_file(file) {
                Ok(units) => out.extend(units.into_iter().map(|u| (file.clone(), u))),
                Err(err) => {
                    tracing::warn!(file = %file.display(), %err, "skipping changed file");
                }
            }
        }
        out
    }

    /// Report on every function changed between `base` and `target`. The
    /// registry is rebuilt first.
    pub fn analyze_commit(
        &mut self,
        base: &str,
        target: &str,
        max_depth: u32,
    ) -> Result<FullImpactReport, PipelineError> {
        let extensions = self.config.scan.effective_extensions();
        let files = changed_source_files(&self.root, base, target, &extensions)?;
        let commit_range = format!("{base}..{target}");

        if files.is_empty() {
            tracing::info!(%commit_range, "no source files changed");
            return Ok(FullImpactReport {
                repo_path: self.root.display().to_string(),
                commit_range,
                changed_files: Vec::new(),
                function_reports: Vec::new(),
                summary: "No Python files changed.".to_string(),
                total_downstream_affected: 0,
            });
        }

        self.build_graph()?;
        let diff_context = match self.summarizer {
            Some(_) => diff_text(&self.root, base, target)?,
            None => String::new(),
        };
        Ok(self.analyze_files(&files, commit_range, &diff_context, max_depth)?)
    }

    /// Report on every function defined in `file`. Builds the registry on
    /// first use.
    pub fn analyze_file(
        &mut self,
        file: &Path,
        max_depth: u32,
    ) -> Result<FullImpactReport, PipelineError> {
        let file = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.root.join(file)
        };
        let file = std::fs::canonicalize(&file).unwrap_or(file);
        Ok(self.analyze_files(&[file], FILE_ANALYSIS_RANGE.to_string(), "", max_depth)?)
    }

    /// Report on the functions defined in `files` against the current
    /// registry, building it if there is none yet.
    pub fn analyze_files(
        &mut self,
        files: &[PathBuf],
        commit_range: String,
        diff_context: &str,
        max_depth: u32,
    ) -> Result<FullImpactReport, ScanError> {
        let graph = match self.graph.take() {
            Some(graph) => graph,
            None => self.builder.build(&self.root)?,
        };
        let report = self.assemble(&graph, files, commit_range, diff_context, max_depth);
        self.graph = Some(graph);
        Ok(report)
    }

    fn assemble(
        &self,
        graph: &CallGraph,
        files: &[PathBuf],
        commit_range: String,
        diff_context: &str,
        max_depth: u32,
    ) -> FullImpactReport {
        let changed = self.changed_units(files);
        let context = ReportContext {
            graph,
            root: &self.root,
            summarizer: self.summarizer.as_deref(),
            diff_context: truncate_chars(diff_context, SUMMARY_DIFF_CHARS),
            snippet_chars: self.config.impact.effective_snippet_chars(),
            max_depth,
        };

        let mut reports = Vec::with_capacity(changed.len());
        let mut affected: BTreeSet<String> = BTreeSet::new();
        for (file, unit) in &changed {
            let report = context.report(unit, file);
            affected.extend(report.downstream.iter().map(|a| a.qualified_name.clone()));
            reports.push(report);
        }

        tracing::info!(
            %commit_range,
            functions = reports.len(),
            { metrics::TRAVERSAL_RESULT_COUNT } = affected.len(),
            "impact analysis complete"
        );

        FullImpactReport {
            repo_path: self.root.display().to_string(),
            commit_range,
            changed_files: files.iter().map(|f| f.display().to_string()).collect(),
            summary: summary_text(&reports, affected.len()),
            total_downstream_affected: affected.len(),
            function_reports: reports,
        }
    }
}

/// Registry unit for a changed function: `module[.Class].name`, then
/// `module.name`, then the bare name, then the first unit with the same
/// name defined in the same file.
pub fn match_unit<'g>(
    graph: &'g CallGraph,
    root: &Path,
    unit: &ExtractedUnit,
    file: &Path,
) -> Option<&'g Unit> {
    let module = file.strip_prefix(root).ok().map(module_path);
    let mut candidates = Vec::with_capacity(3);
    if let Some(module) = &module {
        if unit.class_scope.is_some() {
            candidates.push(qualify(module, unit.class_scope.as_deref(), &unit.name));
        }
        candidates.push(qualify(module, None, &unit.name));
    }
    candidates.push(unit.name.clone());

    candidates
        .iter()
        .find_map(|qn| graph.get(qn))
        .or_else(|| {
            graph
                .units_in_file(file)
                .into_iter()
                .find(|u| u.name == unit.name)
        })
}

struct ReportContext<'a> {
    graph: &'a CallGraph,
    root: &'a Path,
    summarizer: Option<&'a dyn ImpactSummarizer>,
    diff_context: &'a str,
    snippet_chars: usize,
    max_depth: u32,
}

impl ReportContext<'_> {
    fn report(&self, unit: &ExtractedUnit, file: &Path) -> ImpactReport {
        let matched = match_unit(self.graph, self.root, unit, file);
        let (down, up) = match matched {
            Some(m) => (
                downstream(self.graph, [m.qualified_name.as_str()], self.max_depth),
                upstream(self.graph, &m.qualified_name, self.max_depth),
            ),
            None => {
                tracing::debug!(name = %unit.name, file = %file.display(), "no registry match");
                (Vec::new(), Vec::new())
            }
        };

        let (risk_analysis, risk_level) = self.analysis(unit, &down);

        ImpactReport {
            function_name: unit.name.clone(),
            qualified_name: matched.map(|m| m.qualified_name.clone()),
            file_path: file.display().to_string(),
            line: unit.start_line,
            changed_code: snippet(&unit.body_text, self.snippet_chars),
            downstream_count: down.len(),
            downstream: down.iter().copied().map(AffectedUnit::from).collect(),
            upstream_count: up.len(),
            upstream: up.iter().copied().map(AffectedUnit::from).collect(),
            risk_analysis,
            risk_level,
        }
    }

    fn analysis(&self, unit: &ExtractedUnit, down: &[&Unit]) -> (String, RiskLevel) {
        let by_count = RiskLevel::from_downstream_count(down.len());
        let Some(summarizer) = self.summarizer.filter(|_| !down.is_empty()) else {
            return (structural_analysis(down.len()), by_count);
        };

        let request = SummaryRequest {
            function_name: &unit.name,
            changed_code: truncate_chars(&unit.body_text, SUMMARY_CODE_CHARS),
            downstream: &down[..down.len().min(SUMMARY_MAX_DOWNSTREAM)],
            diff_context: self.diff_context,
        };
        match summarizer.summarize(&request) {
            Ok(text) => {
                let level = RiskLevel::from_analysis_text(&text);
                (text, level)
            }
            Err(err) => {
                tracing::warn!(name = %unit.name, %err, "summarizer failed");
                (format!("Error during summarization: {err}"), by_count)
            }
        }
    }
}

fn snippet(body: &str, max_chars: usize) -> String {
    let cut = truncate_chars(body, max_chars);
    if cut.len() < body.len() {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}
