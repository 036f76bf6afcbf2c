//! Call graph types: units, the registry, build stats.

use std::path::{Path, PathBuf};
use std::time::Duration;

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};

use callscope_core::types::collections::{BTreeMap, BTreeSet, FxHashMap, SmallVec4};

use super::resolution::{resolve_edges, ResolutionDiagnostics};

/// A function or method definition tracked as one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub qualified_name: String,
    pub file_path: PathBuf,
    pub start_line: u32,
    pub end_line: u32,
    pub parameters: SmallVec4<String>,
    pub body_text: String,
    pub is_async: bool,
    /// Raw call text observed in the body. Not edges until resolved.
    pub calls: BTreeSet<String>,
    /// Qualified names of units resolved to call this one.
    pub called_by: BTreeSet<String>,
}

impl Unit {
    /// A bare unit with no body, calls or callers. Mostly for building
    /// graphs by hand.
    pub fn new(
        qualified_name: impl Into<String>,
        name: impl Into<String>,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            file_path: file_path.into(),
            start_line: 1,
            end_line: 1,
            parameters: SmallVec4::new(),
            body_text: String::new(),
            is_async: false,
            calls: BTreeSet::new(),
            called_by: BTreeSet::new(),
        }
    }

    pub fn with_calls<I, S>(mut self, calls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calls.extend(calls.into_iter().map(Into::into));
        self
    }

    pub fn with_lines(mut self, start_line: u32, end_line: u32) -> Self {
        self.start_line = start_line;
        self.end_line = end_line;
        self
    }
}

/// The registry for one build: `qualified_name -> Unit`, plus the resolved
/// forward adjacency. `callees[u]` contains `v` exactly when
/// `v.called_by` contains `u`.
///
/// Read-only once built. A rebuild produces a new `CallGraph`.
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    pub(crate) units: BTreeMap<String, Unit>,
    pub(crate) callees: BTreeMap<String, BTreeSet<String>>,
    pub(crate) stats: CallGraphStats,
}

impl CallGraph {
    /// Registry from hand-made units, resolved. Later units with the same
    /// qualified name replace earlier ones.
    pub fn from_units<I>(units: I) -> Self
    where
        I: IntoIterator<Item = Unit>,
    {
        let mut graph = Self::default();
        for unit in units {
            graph.insert(unit);
        }
        let diagnostics = resolve_edges(&mut graph);
        graph.stats.total_units = graph.units.len();
        graph.stats.total_edges = graph.edge_count();
        graph.stats.diagnostics = diagnostics;
        graph
    }

    /// Insert or overwrite by qualified name. Returns the replaced unit.
    pub(crate) fn insert(&mut self, unit: Unit) -> Option<Unit> {
        self.units.insert(unit.qualified_name.clone(), unit)
    }

    pub fn get(&self, qualified_name: &str) -> Option<&Unit> {
        self.units.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.units.contains_key(qualified_name)
    }

    /// Number of units in the registry.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units in qualified-name order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.units.values()
    }

    pub fn qualified_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.units.keys().map(String::as_str)
    }

    /// Resolved callees of `qualified_name`, in qualified-name order.
    pub fn callees(&self, qualified_name: &str) -> impl Iterator<Item = &str> + '_ {
        self.callees
            .get(qualified_name)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Number of resolved `caller -> callee` edges.
    pub fn edge_count(&self) -> usize {
        self.callees.values().map(BTreeSet::len).sum()
    }

    /// Units defined in `file`, in qualified-name order.
    pub fn units_in_file(&self, file: &Path) -> Vec<&Unit> {
        self.units.values().filter(|u| u.file_path == file).collect()
    }

    /// The `limit` units with the most callers. Ties break by qualified name.
    pub fn most_called(&self, limit: usize) -> Vec<&Unit> {
        let mut units: Vec<&Unit> = self.units.values().collect();
        units.sort_by(|a, b| {
            b.called_by
                .len()
                .cmp(&a.called_by.len())
                .then_with(|| a.qualified_name.cmp(&b.qualified_name))
        });
        units.truncate(limit);
        units
    }

    /// Strongly connected components with more than one unit (mutual
    /// recursion groups). Each group is sorted; groups are sorted by their
    /// first member.
    pub fn cycles(&self) -> Vec<Vec<&str>> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut index = FxHashMap::default();
        for name in self.units.keys() {
            index.insert(name.as_str(), graph.add_node(name.as_str()));
        }
        for (caller, targets) in &self.callees {
            let Some(&from) = index.get(caller.as_str()) else {
                continue;
            };
            for target in targets {
                if let Some(&to) = index.get(target.as_str()) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let mut groups: Vec<Vec<&str>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .map(|scc| {
                let mut names: Vec<&str> = scc.into_iter().map(|idx| graph[idx]).collect();
                names.sort_unstable();
                names
            })
            .collect();
        groups.sort();
        groups
    }

    pub fn stats(&self) -> &CallGraphStats {
        &self.stats
    }
}

/// Statistics from a call graph build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallGraphStats {
    pub files_scanned: usize,
    /// Files that failed to read or parse and contributed no units.
    pub files_failed: usize,
    pub total_units: usize,
    pub total_edges: usize,
    /// Definitions replaced by a later one with the same qualified name.
    pub overwritten: usize,
    pub cycles_detected: usize,
    pub build_duration: Duration,
    pub diagnostics: ResolutionDiagnostics,
}
