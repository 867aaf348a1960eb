//! Property-based tests for the transform.
//!
//! Run with: cargo test --features proptest --package tally-transform

#![cfg(feature = "proptest")]

use std::collections::BTreeSet;

use proptest::prelude::*;
use tally_graph::{BuildGraph, CodeLevel};
use tally_transform::{StatsChunk, StatsCompilation, StatsId, StatsModule, TransformOptions, transform};

fn module(index: usize) -> StatsModule {
    StatsModule {
        identifier: Some(format!("/app/src/m{index}.js")),
        id: Some(StatsId::Number(index as u64)),
        name: Some(format!("./src/m{index}.js")),
        size: 10 + index as u64,
        chunks: vec![StatsId::Number(0)],
        ..StatsModule::default()
    }
}

/// Top-level module indexes and chunk-nested module indexes, overlapping.
fn document_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    (
        prop::collection::vec(0usize..12, 0..20),
        prop::collection::vec(0usize..12, 0..20),
    )
}

fn document(top: &[usize], nested: &[usize]) -> StatsCompilation {
    StatsCompilation {
        modules: top.iter().copied().map(module).collect(),
        chunks: vec![StatsChunk {
            id: Some(StatsId::Number(0)),
            names: vec!["main".into()],
            modules: nested.iter().copied().map(module).collect(),
            ..StatsChunk::default()
        }],
        ..StatsCompilation::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: one module per distinct identifier, wherever it was listed.
    #[test]
    fn prop_one_module_per_identifier((top, nested) in document_strategy()) {
        let stats = document(&top, &nested);
        let mut graph = BuildGraph::new("/app");
        transform(&stats, &mut graph, &TransformOptions::default());

        let distinct: BTreeSet<_> = top.iter().chain(&nested).collect();
        prop_assert_eq!(graph.module_graph.module_count(), distinct.len());
    }

    /// Property: a second application leaves the graph unchanged.
    #[test]
    fn prop_transform_idempotent((top, nested) in document_strategy()) {
        let stats = document(&top, &nested);
        let mut graph = BuildGraph::new("/app");
        transform(&stats, &mut graph, &TransformOptions::default());
        let before = graph.to_data(CodeLevel::Full);
        transform(&stats, &mut graph, &TransformOptions::default());
        prop_assert_eq!(graph.to_data(CodeLevel::Full), before);
    }
}
