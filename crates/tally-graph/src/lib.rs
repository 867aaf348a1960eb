//! # tally-graph
//!
//! Entity store for bundle statistics: modules, dependency edges, chunks,
//! assets, entrypoints, packages and the tree-shaking overlay.
//!
//! ## Overview
//!
//! A [`BuildGraph`] holds three arenas:
//!
//! - [`ModuleGraph`]: modules, dependencies and the export/side-effect/variable overlay
//! - [`ChunkGraph`]: chunks, assets and entrypoints
//! - [`PackageGraph`]: packages derived from module paths
//!
//! ```text
//!  ┌──────────── BuildGraph ─────────────┐
//!  │ ModuleGraph   ChunkGraph  PackageGraph│
//!  │  Module ──────▶ Chunk ◀──── Package   │
//!  │    │ Dependency   │ Asset     │       │
//!  │    ▼              ▼           ▼       │
//!  │  ExportInfo    EntryPoint  PackageDep │
//!  └──────────────────────────────────────┘
//! ```
//!
//! Every entity is addressed by a typed integer id allocated by an
//! [`IdCounter`] owned by its graph. References between entities are ids, never
//! pointers, which is also the shape of the wire format.
//!
//! ## Quick Start
//!
//! ```rust
//! use tally_graph::{DependencyKind, Module, ModuleGraph};
//!
//! let mut graph = ModuleGraph::new();
//! let id = graph.next_module_id();
//! let a = graph.add_module(Module::builder(id, "./a.js", "/app/a.js").entry(true).build());
//! let id = graph.next_module_id();
//! let b = graph.add_module(Module::builder(id, "./b.js", "/app/b.js").build());
//!
//! graph.add_dependency(a, b, "./b", DependencyKind::ImportStatement);
//! assert_eq!(graph.dependents_of(b)[0].identifier, "./a.js");
//! ```
//!
//! ## Single Writer
//!
//! Graphs are mutated through `&mut` by one phase at a time (transform,
//! overlay, package graph, attribution). Nothing here locks.

pub mod build_graph;
pub mod chunk;
pub mod chunk_graph;
pub mod collections;
pub mod dependency;
pub mod gzip;
pub mod ids;
pub mod module;
pub mod module_graph;
pub mod package;
pub mod runtime;
pub mod serialization;
pub mod tree_shaking;

pub use build_graph::{BuildGraph, FORMAT_VERSION, GraphStatistics};
pub use chunk::{Asset, Chunk, EntryPoint, path_extension};
pub use chunk_graph::ChunkGraph;
pub use dependency::{
    Dependency, DependencyKind, Position, SourceRange, Statement, StatementPosition,
};
pub use gzip::gzip_size;
pub use ids::{
    AssetId, ChunkId, DependencyId, EntryPointId, ExportId, IdCounter, ModuleId, PackageDependencyId,
    PackageId, SideEffectId, VariableId,
};
pub use module::{Module, ModuleBuilder, ModuleKind, ModuleMeta, ModuleSize, ModuleSource, PackageData};
pub use module_graph::ModuleGraph;
pub use package::{
    DuplicateModule, DuplicatePackages, Manifest, Package, PackageDependency, PackageDuplicate,
    PackageGraph, PackageGraphBuilder,
};
pub use serialization::{BuildGraphData, CodeLevel, ModuleData};
pub use tree_shaking::{
    DEFAULT_MAX_REEXPORT_DEPTH, ExportInfo, ModuleGraphModule, SideEffect, Variable,
};

// Re-export runtime types
pub use runtime::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

#[cfg(not(target_family = "wasm"))]
pub use runtime::native::NativeRuntime;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    pub use super::runtime::test_utils::*;
}

use std::path::PathBuf;

/// Errors produced by graph I/O and wire formats.
///
/// Per-item problems during construction never surface here; they are logged
/// and the offending item is skipped.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid package manifest {path}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Incompatible graph format version: expected {expected}, got {found}")]
    IncompatibleFormat { expected: u32, found: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests;
