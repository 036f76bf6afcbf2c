//! Criterion benchmarks for callscope-analysis.
//!
//! - Full build over a generated 200-module tree
//! - Edge resolution over 5K synthetic units
//! - Downstream traversal from a heavily called unit

use std::hint::black_box;
use std::path::Path;

use criterion::{criterion_group, criterion_main, Criterion};

use callscope_analysis::call_graph::{build_call_graph, downstream, upstream, CallGraph, Unit};

/// `count` modules, each defining a class and two functions that call into
/// the previous module and a shared helper.
fn write_tree(root: &Path, count: usize) {
    std::fs::write(root.join("shared.py"), "def helper(x):\n    return x\n").unwrap();
    for i in 0..count {
        let prev = i.saturating_sub(1);
        let source = format!(
            "from shared import helper\n\n\
             class Handler{i}:\n    def handle(self, req):\n        return process_{i}(req)\n\n\
             def process_{i}(req):\n    helper(req)\n    return finish_{prev}(req)\n\n\
             def finish_{i}(req):\n    return helper(req).strip()\n"
        );
        std::fs::write(root.join(format!("mod_{i}.py")), source).unwrap();
    }
}

/// `count` units in a layered graph: unit `i` calls `i / 2` and a hub.
fn synthetic_graph(count: usize) -> CallGraph {
    CallGraph::from_units((0..count).map(|i| {
        let mut calls = vec![format!("u{}", i / 2), "hub".to_string()];
        if i % 7 == 0 {
            calls.push("external.call".to_string());
        }
        Unit::new(format!("m{}.u{i}", i % 50), format!("u{i}"), "m.py").with_calls(calls)
    }).chain(std::iter::once(Unit::new("core.hub", "hub", "core.py"))))
}

fn bench_build(c: &mut Criterion) {
    let dir = tempfile::TempDir::new().unwrap();
    write_tree(dir.path(), 200);

    c.bench_function("build_call_graph_200_modules", |b| {
        b.iter(|| black_box(build_call_graph(dir.path()).unwrap()))
    });
}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_5k_units", |b| {
        b.iter(|| black_box(synthetic_graph(5_000)))
    });
}

fn bench_traversal(c: &mut Criterion) {
    let graph = synthetic_graph(5_000);

    c.bench_function("downstream_hub_depth_3", |b| {
        b.iter(|| black_box(downstream(&graph, ["core.hub"], 3).len()))
    });
    c.bench_function("upstream_leaf_depth_10", |b| {
        b.iter(|| black_box(upstream(&graph, "m49.u4999", 10).len()))
    });
}

criterion_group!(benches, bench_build, bench_resolve, bench_traversal);
criterion_main!(benches);
