//! Property-based tests for tally-graph using proptest.
//!
//! Run with: cargo test --features proptest --package tally-graph property_tests

#![cfg(feature = "proptest")]

use crate::{BuildGraph, CodeLevel, DependencyKind, Module, ModuleId};
use proptest::prelude::*;

/// Random graphs: module count, edges by index, concatenation pairs by index.
fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>, Vec<(usize, usize)>)> {
    (2usize..=20).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec((0..n, 0..n), 0..40),
            prop::collection::vec((0..n, 0..n), 0..6),
        )
    })
}

fn build(n: usize, edges: &[(usize, usize)], concat: &[(usize, usize)]) -> BuildGraph {
    let mut graph = BuildGraph::new("/app");
    let mut ids: Vec<ModuleId> = Vec::new();
    for i in 0..n {
        let id = graph.module_graph.next_module_id();
        ids.push(graph.module_graph.add_module(
            Module::builder(id, format!("./m{i}.js"), format!("/app/m{i}.js")).build(),
        ));
    }
    for (root, member) in concat {
        graph
            .module_graph
            .add_concatenation_member(ids[*root], ids[*member]);
    }
    let chunk = graph.chunk_graph.ensure_chunk("0", "main");
    for (i, id) in ids.iter().enumerate() {
        if i % 3 == 0 {
            graph.chunk_graph.add_module_to_chunk(chunk, *id);
            if let Some(m) = graph.module_graph.module_mut(*id) {
                m.add_chunk(chunk);
            }
        }
    }
    for (from, to) in edges {
        graph.module_graph.add_dependency(
            ids[*from],
            ids[*to],
            &format!("./m{to}"),
            DependencyKind::ImportStatement,
        );
    }
    graph
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: every edge is mirrored in the target's `imported` list.
    #[test]
    fn prop_dependency_dependent_symmetry((n, edges, concat) in graph_strategy()) {
        let graph = build(n, &edges, &concat);
        for dep in graph.module_graph.dependencies() {
            let target = graph.module_graph.module(dep.dependency).unwrap();
            prop_assert!(target.imported.contains(&dep.module));
        }
    }

    /// Property: concatenation members point back to their root and are never
    /// concatenations themselves.
    #[test]
    fn prop_concatenation_containment((n, edges, concat) in graph_strategy()) {
        let graph = build(n, &edges, &concat);
        let mg = &graph.module_graph;
        for module in mg.modules().filter(|m| m.is_concatenation()) {
            for member in &module.modules {
                let member = mg.module(*member).unwrap();
                prop_assert_eq!(member.root_module, Some(module.id));
                prop_assert!(!member.is_concatenation());
            }
        }
    }

    /// Property: binary round trip preserves the graph.
    #[test]
    fn prop_bytes_round_trip((n, edges, concat) in graph_strategy()) {
        let graph = build(n, &edges, &concat);
        let bytes = graph.to_bytes(CodeLevel::Full).unwrap();
        let restored = BuildGraph::from_bytes(&bytes).unwrap();
        prop_assert_eq!(restored.statistics(), graph.statistics());
        prop_assert_eq!(restored.to_data(CodeLevel::Full), graph.to_data(CodeLevel::Full));
    }
}
