//! JSON export of the registry.

use serde::Serialize;

use callscope_core::errors::CallGraphError;
use callscope_core::types::collections::{BTreeMap, BTreeSet};

use super::types::CallGraph;

#[derive(Debug, Serialize)]
struct ExportedUnit<'g> {
    file: String,
    lineno: u32,
    end_lineno: u32,
    calls: &'g BTreeSet<String>,
    called_by: &'g BTreeSet<String>,
}

/// `{ qualified_name: { file, lineno, end_lineno, calls, called_by } }`,
/// keys in qualified-name order.
pub fn to_json(graph: &CallGraph) -> Result<String, CallGraphError> {
    let exported: BTreeMap<&str, ExportedUnit<'_>> = graph
        .units()
        .map(|unit| {
            (
                unit.qualified_name.as_str(),
                ExportedUnit {
                    file: unit.file_path.display().to_string(),
                    lineno: unit.start_line,
                    end_lineno: unit.end_line,
                    calls: &unit.calls,
                    called_by: &unit.called_by,
                },
            )
        })
        .collect();

    serde_json::to_string_pretty(&exported).map_err(|e| CallGraphError::Export {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_graph::types::Unit;

    #[test]
    fn export_contains_edges() {
        let graph = CallGraph::from_units([
            Unit::new("a.foo", "foo", "a.py").with_calls(["bar"]),
            Unit::new("b.bar", "bar", "b.py").with_lines(1, 2),
        ]);
        let json = to_json(&graph).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["a.foo"]["calls"], serde_json::json!(["bar"]));
        assert_eq!(value["b.bar"]["called_by"], serde_json::json!(["a.foo"]));
        assert_eq!(value["b.bar"]["end_lineno"], 2);
        assert_eq!(value["b.bar"]["file"], "b.py");
    }
}
