//! Call graph construction: discover → extract (parallel) → merge → resolve.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use callscope_core::config::CallscopeConfig;
use callscope_core::constants::QUALIFIED_NAME_SEPARATOR;
use callscope_core::errors::{ParseError, ScanError};
use callscope_core::tracing::metrics;

use super::resolution::resolve_edges;
use super::types::{CallGraph, Unit};
use crate::parsers::{ExtractedUnit, PythonExtractor, UnitExtractor};
use crate::scanner::{discover_source_files, SourceFile};

/// Builds a fresh `CallGraph` for a root directory.
#[derive(Debug, Clone)]
pub struct CallGraphBuilder {
    extensions: Vec<String>,
    threads: usize,
    extractor: PythonExtractor,
}

impl Default for CallGraphBuilder {
    fn default() -> Self {
        Self::new(&CallscopeConfig::default())
    }
}

impl CallGraphBuilder {
    pub fn new(config: &CallscopeConfig) -> Self {
        Self {
            extensions: config.scan.effective_extensions(),
            threads: config.scan.effective_threads(),
            extractor: PythonExtractor::new(config.graph.effective_max_body_chars()),
        }
    }

    pub fn extractor(&self) -> &PythonExtractor {
        &self.extractor
    }

    /// Build the registry for `root`.
    ///
    /// Only enumeration failures are errors. Files that can't be read or
    /// parsed contribute no units and are counted in the stats.
    pub fn build(&self, root: &Path) -> Result<CallGraph, ScanError> {
        let start = Instant::now();
        let files = discover_source_files(root, &self.extensions)?;
        tracing::info!(
            root = %root.display(),
            { metrics::FILES_DISCOVERED } = files.len(),
            "building call graph"
        );

        let extracted = self.extract_all(&files);

        let mut graph = CallGraph::default();
        let mut files_failed = 0;
        let mut overwritten = 0;
        for (file, result) in files.iter().zip(extracted) {
            let units = match result {
                Ok(units) => units,
                Err(err) => {
                    files_failed += 1;
                    tracing::debug!(file = %file.path.display(), %err, "skipping unparsable file");
                    continue;
                }
            };
            for extracted in units {
                let unit = into_unit(file, extracted);
                if let Some(previous) = graph.insert(unit) {
                    overwritten += 1;
                    tracing::debug!(
                        qualified_name = %previous.qualified_name,
                        "definition replaced by a later one"
                    );
                }
            }
        }

        let diagnostics = resolve_edges(&mut graph);

        graph.stats.files_scanned = files.len();
        graph.stats.files_failed = files_failed;
        graph.stats.overwritten = overwritten;
        graph.stats.total_units = graph.len();
        graph.stats.total_edges = graph.edge_count();
        graph.stats.cycles_detected = graph.cycles().len();
        graph.stats.diagnostics = diagnostics;
        graph.stats.build_duration = start.elapsed();

        tracing::info!(
            { metrics::UNITS_REGISTERED } = graph.stats.total_units,
            { metrics::EDGES_RESOLVED } = graph.stats.total_edges,
            { metrics::FILES_FAILED } = files_failed,
            { metrics::RESOLUTION_RATE } = graph.stats.diagnostics.resolution_rate(),
            { metrics::CALL_GRAPH_BUILD_TIME } = graph.stats.build_duration.as_millis() as u64,
            "call graph built"
        );

        Ok(graph)
    }

    /// Extract every file in parallel; results come back in `files` order.
    fn extract_all(&self, files: &[SourceFile]) -> Vec<Result<Vec<ExtractedUnit>, ParseError>> {
        let run = || {
            files
                .par_iter()
                .map(|file| self.extractor.extract_file(&file.path))
                .collect()
        };

        if self.threads == 0 {
            return run();
        }
        match rayon::ThreadPoolBuilder::new().num_threads(self.threads).build() {
            Ok(pool) => pool.install(run),
            Err(err) => {
                tracing::warn!(%err, threads = self.threads, "falling back to the global thread pool");
                run()
            }
        }
    }
}

/// Build with default configuration.
pub fn build_call_graph(root: &Path) -> Result<CallGraph, ScanError> {
    CallGraphBuilder::default().build(root)
}

/// `module[.class].name`
pub fn qualify(module_path: &str, class: Option<&str>, name: &str) -> String {
    let mut qualified = String::with_capacity(module_path.len() + name.len() + 16);
    qualified.push_str(module_path);
    for part in class.into_iter().chain(std::iter::once(name)) {
        if !qualified.is_empty() {
            qualified.push(QUALIFIED_NAME_SEPARATOR);
        }
        qualified.push_str(part);
    }
    qualified
}

fn into_unit(file: &SourceFile, extracted: ExtractedUnit) -> Unit {
    Unit {
        qualified_name: qualify(
            &file.module_path,
            extracted.class_scope.as_deref(),
            &extracted.name,
        ),
        name: extracted.name,
        file_path: file.path.clone(),
        start_line: extracted.start_line,
        end_line: extracted.end_line,
        parameters: extracted.parameters,
        body_text: extracted.body_text,
        is_async: extracted.is_async,
        calls: extracted.calls,
        called_by: Default::default(),
    }
}
