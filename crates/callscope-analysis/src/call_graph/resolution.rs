//! Name-matching call resolution. No type information is used.
//!
//! For a raw call `c` made by unit `u`, the candidates are:
//! 1. the unit whose qualified name is exactly `c`, if any;
//! 2. every unit whose simple name equals the last dotted segment of `c`.
//!
//! A dotted call's trailing segment is the same string as its simple name,
//! so matching on the trailing segment separately adds nothing beyond (2).
//! Every candidate other than `u` itself gets `u` in its `called_by`.
//! Same-named units in unrelated modules all match: callers are
//! over-reported rather than missed.

use rayon::prelude::*;
use serde::Serialize;

use callscope_core::constants::QUALIFIED_NAME_SEPARATOR;
use callscope_core::types::collections::{BTreeMap, BTreeSet, FxHashMap, FxHashSet, SmallVec2};

use super::types::{CallGraph, Unit};

/// How a call matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Resolution {
    /// Raw call text spelled a registered qualified name.
    ExactMatch,
    /// Matched by simple name only.
    NameMatch,
}

impl Resolution {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact_match",
            Self::NameMatch => "name_match",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of resolving one raw call string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResolution {
    /// No registered unit matches. Built-ins and library calls end up here.
    Unresolved,
    /// The call text is a registered qualified name. `name_matches` holds
    /// the other units sharing its simple name.
    ExactMatch {
        target: String,
        name_matches: Vec<String>,
    },
    /// One or more units share the call's simple name. Sorted.
    NameMatches(Vec<String>),
}

impl CallResolution {
    /// All candidate qualified names, deduplicated and sorted.
    pub fn candidates(&self) -> BTreeSet<&str> {
        match self {
            Self::Unresolved => BTreeSet::new(),
            Self::ExactMatch {
                target,
                name_matches,
            } => std::iter::once(target.as_str())
                .chain(name_matches.iter().map(String::as_str))
                .collect(),
            Self::NameMatches(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// True when the call could refer to more than one unit.
    pub fn is_ambiguous(&self) -> bool {
        self.candidates().len() > 1
    }

    pub fn strategy(&self) -> Option<Resolution> {
        match self {
            Self::Unresolved => None,
            Self::ExactMatch { .. } => Some(Resolution::ExactMatch),
            Self::NameMatches(_) => Some(Resolution::NameMatch),
        }
    }
}

/// Lookup tables over a finished registry.
pub struct NameIndex<'g> {
    qualified: FxHashSet<&'g str>,
    by_name: FxHashMap<&'g str, SmallVec2<&'g str>>,
}

impl<'g> NameIndex<'g> {
    pub fn build(units: impl IntoIterator<Item = &'g Unit>) -> Self {
        let mut qualified = FxHashSet::default();
        let mut by_name: FxHashMap<&'g str, SmallVec2<&'g str>> = FxHashMap::default();
        for unit in units {
            qualified.insert(unit.qualified_name.as_str());
            by_name
                .entry(unit.name.as_str())
                .or_default()
                .push(unit.qualified_name.as_str());
        }
        Self { qualified, by_name }
    }

    /// Resolve one raw call string.
    pub fn resolve(&self, raw: &str) -> CallResolution {
        let simple = simple_name(raw);
        let mut by_name: Vec<String> = self
            .by_name
            .get(simple)
            .map(|names| names.iter().map(|n| n.to_string()).collect())
            .unwrap_or_default();
        by_name.sort_unstable();
        by_name.dedup();

        if self.qualified.contains(raw) {
            by_name.retain(|n| n != raw);
            CallResolution::ExactMatch {
                target: raw.to_string(),
                name_matches: by_name,
            }
        } else if by_name.is_empty() {
            CallResolution::Unresolved
        } else {
            CallResolution::NameMatches(by_name)
        }
    }
}

/// Last dotted segment of a call string.
pub fn simple_name(raw: &str) -> &str {
    match raw.rsplit_once(QUALIFIED_NAME_SEPARATOR) {
        Some((_, last)) => last,
        None => raw,
    }
}

/// Diagnostics for resolution tracking.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionDiagnostics {
    pub total_call_sites: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// Resolved calls with more than one candidate.
    pub ambiguous: usize,
    pub by_strategy: BTreeMap<&'static str, usize>,
}

impl ResolutionDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, resolution: &CallResolution) {
        self.total_call_sites += 1;
        match resolution.strategy() {
            Some(strategy) => {
                self.resolved += 1;
                *self.by_strategy.entry(strategy.name()).or_default() += 1;
                if resolution.is_ambiguous() {
                    self.ambiguous += 1;
                }
            }
            None => self.unresolved += 1,
        }
    }

    pub fn merge(&mut self, other: &ResolutionDiagnostics) {
        self.total_call_sites += other.total_call_sites;
        self.resolved += other.resolved;
        self.unresolved += other.unresolved;
        self.ambiguous += other.ambiguous;
        for (strategy, count) in &other.by_strategy {
            *self.by_strategy.entry(*strategy).or_default() += *count;
        }
    }

    pub fn resolution_rate(&self) -> f64 {
        if self.total_call_sites == 0 {
            0.0
        } else {
            self.resolved as f64 / self.total_call_sites as f64
        }
    }
}

/// Resolve every unit's raw calls and rebuild `called_by` and the forward
/// adjacency from scratch.
///
/// Per-caller resolution runs in parallel against an immutable index; edges
/// are then applied in one sequential pass.
pub fn resolve_edges(graph: &mut CallGraph) -> ResolutionDiagnostics {
    let resolved: Vec<(String, BTreeSet<String>, ResolutionDiagnostics)> = {
        let index = NameIndex::build(graph.units.values());
        graph
            .units
            .par_iter()
            .map(|(caller, unit)| {
                let mut diagnostics = ResolutionDiagnostics::new();
                let mut targets = BTreeSet::new();
                for raw in &unit.calls {
                    let resolution = index.resolve(raw);
                    diagnostics.record(&resolution);
                    targets.extend(
                        resolution
                            .candidates()
                            .into_iter()
                            .filter(|candidate| *candidate != caller.as_str())
                            .map(str::to_owned),
                    );
                }
                (caller.clone(), targets, diagnostics)
            })
            .collect()
    };

    for unit in graph.units.values_mut() {
        unit.called_by.clear();
    }
    graph.callees.clear();

    let mut total = ResolutionDiagnostics::new();
    for (caller, targets, diagnostics) in resolved {
        total.merge(&diagnostics);
        for target in &targets {
            if let Some(callee) = graph.units.get_mut(target) {
                callee.called_by.insert(caller.clone());
            }
        }
        if !targets.is_empty() {
            graph.callees.insert(caller, targets);
        }
    }

    tracing::debug!(
        call_sites = total.total_call_sites,
        resolved = total.resolved,
        ambiguous = total.ambiguous,
        "call resolution complete"
    );
    total
}
