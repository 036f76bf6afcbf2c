//! Bounded depth-first reachability over the resolved registry.
//!
//! Depth counts edges; a seed is depth 0. A unit is emitted the first time
//! it is discovered and never again, which also makes cycles terminate.
//! The visited set is shared across seeds, so a unit reachable from two
//! seeds is attributed to the earlier one.

use std::collections::btree_set;

use serde::{Deserialize, Serialize};

use callscope_core::tracing::metrics;
use callscope_core::types::collections::{BTreeSet, FxHashSet};

use super::types::{CallGraph, Unit};

/// Which edges a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraversalDirection {
    /// Follow `called_by`: who is affected if the seed changes.
    Downstream,
    /// Follow resolved calls: what the seed depends on.
    Upstream,
}

static NO_NEIGHBORS: BTreeSet<String> = BTreeSet::new();

/// Units that transitively call any of `seeds`, within `max_depth` edges.
pub fn downstream<I, S>(graph: &CallGraph, seeds: I, max_depth: u32) -> Vec<&Unit>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    traverse(graph, seeds, TraversalDirection::Downstream, max_depth)
}

/// Units that `seed` transitively calls, within `max_depth` edges.
pub fn upstream<'g>(graph: &'g CallGraph, seed: &str, max_depth: u32) -> Vec<&'g Unit> {
    traverse(graph, [seed], TraversalDirection::Upstream, max_depth)
}

/// Shared walk for both directions. Output is discovery pre-order; each
/// unit's neighbors are visited in qualified-name order.
pub fn traverse<I, S>(
    graph: &CallGraph,
    seeds: I,
    direction: TraversalDirection,
    max_depth: u32,
) -> Vec<&Unit>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut found = Vec::new();

    for seed in seeds {
        let Some((key, _)) = graph.units.get_key_value(seed.as_ref()) else {
            continue;
        };
        if !visited.insert(key.as_str()) || max_depth == 0 {
            continue;
        }

        // Each frame: the neighbors still to visit and the depth of the unit
        // they belong to. Frames are only pushed for units below max_depth.
        let mut stack = vec![(neighbors(graph, key, direction), 0u32)];
        while let Some((pending, depth)) = stack.last_mut() {
            let depth = *depth;
            let Some(next) = pending.next() else {
                stack.pop();
                continue;
            };
            let Some(unit) = graph.units.get(next.as_str()) else {
                continue;
            };
            if !visited.insert(unit.qualified_name.as_str()) {
                continue;
            }
            found.push(unit);
            if depth + 1 < max_depth {
                stack.push((neighbors(graph, &unit.qualified_name, direction), depth + 1));
            }
        }
    }

    tracing::trace!(
        ?direction,
        max_depth,
        { metrics::TRAVERSAL_RESULT_COUNT } = found.len(),
        "traversal complete"
    );
    found
}

fn neighbors<'g>(
    graph: &'g CallGraph,
    qualified_name: &str,
    direction: TraversalDirection,
) -> btree_set::Iter<'g, String> {
    let set = match direction {
        TraversalDirection::Downstream => graph.units.get(qualified_name).map(|u| &u.called_by),
        TraversalDirection::Upstream => graph.callees.get(qualified_name),
    };
    set.unwrap_or(&NO_NEIGHBORS).iter()
}
