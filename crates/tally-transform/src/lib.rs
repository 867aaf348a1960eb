//! # tally-transform
//!
//! Turns a raw bundler statistics document into a [`BuildGraph`].
//!
//! The document is loosely structured: modules can appear both at the top
//! level and again inside chunks, concatenated modules list their members
//! inline, and any reference may point at something the collector left out.
//! The transform deduplicates by external identifier, drops dangling
//! references and never fails on a single bad item.
//!
//! ```rust
//! use tally_graph::BuildGraph;
//! use tally_transform::{TransformOptions, transform_str};
//!
//! let json = r#"{
//!     "modules": [{"identifier": "/app/a.js", "id": "a", "name": "./a.js", "size": 68}],
//!     "chunks": [{"id": "main", "names": ["main"], "initial": true, "files": ["bundle.js"]}]
//! }"#;
//! let mut graph = BuildGraph::new("/app");
//! let report = transform_str(json, &mut graph, &TransformOptions::default()).unwrap();
//! assert_eq!(report.modules_added, 1);
//! assert!(graph.module_graph.module_by_render_id("a").is_some());
//! ```

pub mod options;
pub mod patch;
pub mod path;
pub mod stats;
mod transformer;

use std::path::PathBuf;

pub use options::{DEFAULT_IGNORED_BAILOUT, TransformOptions};
pub use patch::GraphPatch;
pub use path::module_path;
pub use stats::{
    StatsAsset, StatsChunk, StatsCompilation, StatsEntrypoint, StatsEntrypointAsset, StatsId,
    StatsIssuer, StatsModule, StatsReason, UsedExports,
};
pub use transformer::TransformReport;

use tally_graph::BuildGraph;

/// Failures of the root document. Everything below the root is tolerated.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("statistics document is missing")]
    MissingDocument,

    #[error("statistics document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Parse a statistics document.
pub fn parse_stats(json: &str) -> Result<StatsCompilation> {
    let trimmed = json.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(TransformError::MissingDocument);
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Apply `stats` to `graph`.
///
/// Relative module names resolve against `options.root`, else the document's
/// `context`, else the graph's own root. A graph without a root adopts the
/// resolved one.
pub fn transform(
    stats: &StatsCompilation,
    graph: &mut BuildGraph,
    options: &TransformOptions,
) -> TransformReport {
    let root = resolve_root(stats, graph, options);
    if graph.root.as_os_str().is_empty() {
        graph.root = root.clone();
    }

    let span = tracing::debug_span!("transform", root = %root.display());
    let _guard = span.enter();

    let report = transformer::Transformer::new(graph, options, root).run(stats);
    tracing::debug!(
        added = report.modules_added,
        merged = report.modules_merged,
        skipped = report.modules_skipped,
        dependencies = report.dependencies_added,
        dropped = report.reasons_dropped,
        "statistics applied"
    );
    report
}

/// Parse `json` and apply it to `graph`.
pub fn transform_str(
    json: &str,
    graph: &mut BuildGraph,
    options: &TransformOptions,
) -> Result<TransformReport> {
    let stats = parse_stats(json)?;
    Ok(transform(&stats, graph, options))
}

fn resolve_root(stats: &StatsCompilation, graph: &BuildGraph, options: &TransformOptions) -> PathBuf {
    if let Some(root) = &options.root {
        return root.clone();
    }
    if let Some(context) = stats.context.as_deref().filter(|c| !c.is_empty()) {
        return PathBuf::from(context);
    }
    if !graph.root.as_os_str().is_empty() {
        return graph.root.clone();
    }
    PathBuf::from(".")
}
