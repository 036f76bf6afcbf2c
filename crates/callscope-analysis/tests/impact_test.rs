//! Impact analysis: registry matching, risk scoring, summaries, renderers,
//! and commit-range diffs against real git repositories.

use std::path::Path;

use git2::{IndexAddOption, Repository, Signature};
use tempfile::TempDir;

use callscope_analysis::impact::{
    changed_source_files, match_unit, render, structural_analysis, AffectedUnit,
    FullImpactReport, ImpactAnalyzer, ImpactReport, ImpactSummarizer, RiskLevel, SummaryRequest,
    FILE_ANALYSIS_RANGE, SUMMARY_CODE_CHARS,
};
use callscope_analysis::parsers::{PythonExtractor, UnitExtractor};
use callscope_core::config::CallscopeConfig;
use callscope_core::errors::{ImpactError, PipelineError};

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

const A_PY: &str = r#"from b import helper

def main():
    helper()
    Worker().run()
"#;

const B_PY: &str = r#"def helper():
    return util()

def util():
    return 1

class Worker:
    def run(self):
        helper()
"#;

fn two_module_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.py", A_PY);
    write(dir.path(), "b.py", B_PY);
    dir
}

fn analyzer(root: &Path) -> ImpactAnalyzer {
    ImpactAnalyzer::new(root, CallscopeConfig::default())
}

fn report<'r>(full: &'r FullImpactReport, name: &str) -> &'r ImpactReport {
    full.function_reports
        .iter()
        .find(|r| r.function_name == name)
        .unwrap_or_else(|| panic!("no report for {name}"))
}

fn qualified(units: &[AffectedUnit]) -> Vec<&str> {
    units.iter().map(|u| u.qualified_name.as_str()).collect()
}

fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().unwrap();
    index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::now("Test", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

/// Two commits: the initial tree, then a change to `b.py` only.
fn git_repo_with_change() -> (TempDir, Repository) {
    let dir = two_module_repo();
    write(dir.path(), "README.md", "# demo\n");
    let repo = Repository::init(dir.path()).unwrap();
    commit_all(&repo, "initial");
    write(dir.path(), "b.py", &B_PY.replace("return 1", "return 2"));
    commit_all(&repo, "change util");
    (dir, repo)
}

struct FixedSummarizer(&'static str);

impl ImpactSummarizer for FixedSummarizer {
    fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String, ImpactError> {
        assert!(!request.downstream.is_empty());
        Ok(format!("{}: {}", request.function_name, self.0))
    }
}

struct FailingSummarizer;

impl ImpactSummarizer for FailingSummarizer {
    fn summarize(&self, _request: &SummaryRequest<'_>) -> Result<String, ImpactError> {
        Err(ImpactError::Summarizer {
            message: "backend unavailable".to_string(),
        })
    }
}

struct CodeLengthSummarizer;

impl ImpactSummarizer for CodeLengthSummarizer {
    fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String, ImpactError> {
        Ok(format!("{} chars of code", request.changed_code.chars().count()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MATCHING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_match_unit_prefers_class_qualified_name() {
    let dir = two_module_repo();
    let mut analyzer = analyzer(dir.path());
    let root = analyzer.root().to_path_buf();
    let graph = analyzer.build_graph().unwrap();

    let file = root.join("b.py");
    let units = PythonExtractor::default().extract_file(&file).unwrap();
    let matched: Vec<Option<&str>> = units
        .iter()
        .map(|u| match_unit(graph, &root, u, &file).map(|m| m.qualified_name.as_str()))
        .collect();
    assert_eq!(
        matched,
        vec![Some("b.helper"), Some("b.util"), Some("b.Worker.run")]
    );
}

#[test]
fn test_match_unit_outside_root_falls_back_to_name() {
    let dir = two_module_repo();
    let mut analyzer = analyzer(dir.path());
    let graph = analyzer.build_graph().unwrap();

    let other = TempDir::new().unwrap();
    write(other.path(), "c.py", "def util():\n    pass\n\ndef fresh():\n    pass\n");
    let file = other.path().join("c.py");
    let units = PythonExtractor::default().extract_file(&file).unwrap();

    // Not under the root: no module prefix, and the bare name isn't a key.
    assert!(match_unit(graph, dir.path(), &units[0], &file).is_none());
    assert!(match_unit(graph, dir.path(), &units[1], &file).is_none());
}

#[test]
fn test_match_unit_falls_back_to_same_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "c.py", "class Job:\n    def run(self):\n        pass\n");
    write(dir.path(), "d.py", "class Task:\n    def run(self):\n        pass\n");
    let mut analyzer = analyzer(dir.path());
    let root = analyzer.root().to_path_buf();
    let graph = analyzer.build_graph().unwrap();

    // `run` moved out of its class after the build: neither `c.run` nor
    // `run` is registered, so the unit defined in c.py is taken.
    let file = root.join("c.py");
    write(&root, "c.py", "def run():\n    pass\n");
    let units = PythonExtractor::default().extract_file(&file).unwrap();

    let matched = match_unit(graph, &root, &units[0], &file).map(|m| m.qualified_name.as_str());
    assert_eq!(matched, Some("c.Job.run"));
    assert_eq!(graph.units_in_file(&root.join("d.py")).len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// FILE ANALYSIS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_analyze_file_reports_every_function() {
    let dir = two_module_repo();
    let full = analyzer(dir.path()).analyze_file(Path::new("b.py"), 3).unwrap();

    assert_eq!(full.commit_range, FILE_ANALYSIS_RANGE);
    assert_eq!(full.changed_files.len(), 1);
    let names: Vec<&str> = full
        .function_reports
        .iter()
        .map(|r| r.function_name.as_str())
        .collect();
    assert_eq!(names, vec!["helper", "util", "run"]);

    let helper = report(&full, "helper");
    assert_eq!(helper.qualified_name.as_deref(), Some("b.helper"));
    assert_eq!(helper.line, 1);
    assert_eq!(qualified(&helper.downstream), vec!["a.main", "b.Worker.run"]);
    assert_eq!(helper.downstream_count, 2);
    assert_eq!(qualified(&helper.upstream), vec!["b.util"]);
    assert_eq!(helper.risk_level, RiskLevel::Medium);
    assert_eq!(helper.risk_analysis, structural_analysis(2));

    let util = report(&full, "util");
    assert_eq!(
        qualified(&util.downstream),
        vec!["b.helper", "a.main", "b.Worker.run"]
    );
    assert_eq!(util.risk_level, RiskLevel::Medium);

    let run = report(&full, "run");
    assert_eq!(qualified(&run.downstream), vec!["a.main"]);
    assert_eq!(run.risk_level, RiskLevel::Low);

    assert_eq!(full.total_downstream_affected, 3);
    assert!(full.summary.contains("Analyzed 3 changed function(s)."));
    assert!(full.summary.contains("Total downstream functions affected: 3"));
    assert!(full.summary.contains("2 medium risk change(s)."));
    assert!(!full.summary.contains("No significant risks detected."));
}

#[test]
fn test_depth_limits_downstream() {
    let dir = two_module_repo();
    let full = analyzer(dir.path()).analyze_file(Path::new("b.py"), 1).unwrap();
    assert_eq!(qualified(&report(&full, "util").downstream), vec!["b.helper"]);
    assert_eq!(report(&full, "util").risk_level, RiskLevel::Low);
}

#[test]
fn test_entry_point_has_no_risk() {
    let dir = two_module_repo();
    let full = analyzer(dir.path()).analyze_file(Path::new("a.py"), 3).unwrap();
    let main = report(&full, "main");
    assert_eq!(main.downstream_count, 0);
    assert_eq!(main.upstream_count, 3);
    assert_eq!(main.risk_level, RiskLevel::None);
    assert!(main.risk_analysis.starts_with("No downstream dependents found."));
    assert!(full.summary.contains("No significant risks detected."));
}

#[test]
fn test_changed_code_snippet_is_cut() {
    let dir = TempDir::new().unwrap();
    let body = format!("def big():\n    return '{}'\n", "x".repeat(800));
    write(dir.path(), "m.py", &body);

    let full = analyzer(dir.path()).analyze_file(Path::new("m.py"), 3).unwrap();
    let code = &report(&full, "big").changed_code;
    assert!(code.ends_with("..."));
    assert_eq!(code.chars().count(), 500 + 3);
}

#[test]
fn test_missing_file_yields_no_reports() {
    let dir = two_module_repo();
    let full = analyzer(dir.path()).analyze_file(Path::new("gone.py"), 3).unwrap();
    assert!(full.function_reports.is_empty());
    assert_eq!(full.summary, "No functions analyzed.");
}

#[test]
fn test_unmatched_function_reports_zero_counts() {
    let dir = two_module_repo();
    let mut analyzer = analyzer(dir.path());
    analyzer.build_graph().unwrap();

    // Added after the registry was built.
    write(dir.path(), "c.py", "def brand_new():\n    helper()\n");
    let full = analyzer.analyze_file(Path::new("c.py"), 3).unwrap();
    let fresh = report(&full, "brand_new");
    assert_eq!(fresh.qualified_name, None);
    assert_eq!(fresh.downstream_count, 0);
    assert_eq!(fresh.upstream_count, 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// SUMMARIZER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_summarizer_text_sets_level() {
    let dir = two_module_repo();
    let full = analyzer(dir.path())
        .with_summarizer(Box::new(FixedSummarizer("HIGH RISK for callers")))
        .analyze_file(Path::new("b.py"), 3)
        .unwrap();

    let helper = report(&full, "helper");
    assert_eq!(helper.risk_analysis, "helper: HIGH RISK for callers");
    assert_eq!(helper.risk_level, RiskLevel::High);
    assert!(full.summary.contains("3 HIGH/CRITICAL risk change(s) detected!"));
}

#[test]
fn test_summarizer_skipped_without_downstream() {
    let dir = two_module_repo();
    let full = analyzer(dir.path())
        .with_summarizer(Box::new(FixedSummarizer("critical")))
        .analyze_file(Path::new("a.py"), 3)
        .unwrap();
    let main = report(&full, "main");
    assert_eq!(main.risk_level, RiskLevel::None);
    assert_eq!(main.risk_analysis, structural_analysis(0));
}

#[test]
fn test_summarizer_failure_is_folded_into_text() {
    let dir = two_module_repo();
    let full = analyzer(dir.path())
        .with_summarizer(Box::new(FailingSummarizer))
        .analyze_file(Path::new("b.py"), 3)
        .unwrap();
    let helper = report(&full, "helper");
    assert!(helper.risk_analysis.starts_with("Error during summarization"));
    assert!(helper.risk_analysis.contains("backend unavailable"));
    assert_eq!(helper.risk_level, RiskLevel::Medium);
}

#[test]
fn test_summarizer_sees_capped_changed_code() {
    let dir = TempDir::new().unwrap();
    let source = format!(
        "def big():\n    return '{}'\n\ndef caller():\n    big()\n",
        "x".repeat(3500)
    );
    write(dir.path(), "m.py", &source);

    let full = analyzer(dir.path())
        .with_summarizer(Box::new(CodeLengthSummarizer))
        .analyze_file(Path::new("m.py"), 3)
        .unwrap();
    assert_eq!(
        report(&full, "big").risk_analysis,
        format!("{SUMMARY_CODE_CHARS} chars of code")
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// GIT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_changed_source_files_filters_by_extension() {
    let (dir, _repo) = git_repo_with_change();
    write(dir.path(), "README.md", "# changed\n");

    let files = changed_source_files(dir.path(), "HEAD~1", "HEAD", &["py".to_string()]).unwrap();
    let names: Vec<&str> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(names, vec!["b.py"]);
}

#[test]
fn test_analyze_commit() {
    let (dir, _repo) = git_repo_with_change();
    let full = analyzer(dir.path()).analyze_commit("HEAD~1", "HEAD", 3).unwrap();

    assert_eq!(full.commit_range, "HEAD~1..HEAD");
    assert_eq!(full.changed_files.len(), 1);
    assert!(full.changed_files[0].ends_with("b.py"));
    assert_eq!(full.function_reports.len(), 3);
    assert_eq!(
        qualified(&report(&full, "util").downstream),
        vec!["b.helper", "a.main", "b.Worker.run"]
    );
}

#[test]
fn test_analyze_commit_without_source_changes() {
    let (dir, _repo) = git_repo_with_change();
    let full = analyzer(dir.path()).analyze_commit("HEAD", "HEAD", 3).unwrap();
    assert!(full.changed_files.is_empty());
    assert!(full.function_reports.is_empty());
    assert_eq!(full.summary, "No Python files changed.");
    assert_eq!(full.total_downstream_affected, 0);
}

#[test]
fn test_bad_revision_is_git_error() {
    let (dir, _repo) = git_repo_with_change();
    let err = analyzer(dir.path())
        .analyze_commit("no-such-rev", "HEAD", 3)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Impact(ImpactError::Git { .. })));
}

#[test]
fn test_not_a_repository_is_git_error() {
    let dir = two_module_repo();
    let err = changed_source_files(dir.path(), "HEAD~1", "HEAD", &["py".to_string()]).unwrap_err();
    assert!(matches!(err, ImpactError::Git { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// RENDERING
// ═══════════════════════════════════════════════════════════════════════════

fn affected(i: usize) -> AffectedUnit {
    AffectedUnit {
        qualified_name: format!("m.f{i:02}"),
        name: format!("f{i:02}"),
        file_path: "m.py".to_string(),
        line: i as u32 + 1,
    }
}

fn synthetic_report() -> FullImpactReport {
    let downstream: Vec<AffectedUnit> = (0..12).map(affected).collect();
    FullImpactReport {
        repo_path: "/repo".to_string(),
        commit_range: "HEAD~1..HEAD".to_string(),
        changed_files: vec!["/repo/m.py".to_string()],
        function_reports: vec![ImpactReport {
            function_name: "target".to_string(),
            qualified_name: Some("m.target".to_string()),
            file_path: "/repo/m.py".to_string(),
            line: 40,
            changed_code: "def target():\n    pass".to_string(),
            downstream_count: downstream.len(),
            downstream,
            upstream_count: 0,
            upstream: Vec::new(),
            risk_analysis: structural_analysis(12),
            risk_level: RiskLevel::High,
        }],
        summary: "Analyzed 1 changed function(s).".to_string(),
        total_downstream_affected: 12,
    }
}

#[test]
fn test_markdown_report() {
    let md = render::to_markdown(&synthetic_report());
    assert!(md.starts_with("# Semantic Impact Analysis Report"));
    assert!(md.contains("**Commit Range:** `HEAD~1..HEAD`"));
    assert!(md.contains("## Summary"));
    assert!(md.contains("### `target` (/repo/m.py:40)"));
    assert!(md.contains("**Risk Score:** High"));
    assert!(md.contains("- `m.f09` (m.py:10)"));
    assert!(!md.contains("m.f10"));
    assert!(md.contains("- ... and 2 more"));
    assert!(md.contains("Found 12 downstream dependencies."));
}

#[test]
fn test_json_report() {
    let json = render::to_json(&synthetic_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["commit_range"], "HEAD~1..HEAD");
    assert_eq!(value["total_downstream_affected"], 12);
    assert_eq!(value["function_reports"][0]["risk_level"], "High");
    assert_eq!(value["function_reports"][0]["downstream"][0]["qualified_name"], "m.f00");
}

#[test]
fn test_console_report() {
    let text = render::to_console(&synthetic_report());
    assert!(text.contains("SEMANTIC IMPACT ANALYSIS REPORT"));
    assert!(text.contains(&"=".repeat(60)));
    assert!(text.contains("target (High) - 12 downstream"));
}
