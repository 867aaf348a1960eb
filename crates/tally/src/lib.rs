//! # tally
//!
//! Bundle statistics analysis: turns a bundler's statistics document into a
//! cross-referenced graph of modules, chunks, assets and packages, attributes
//! emitted bytes back to source modules, and compares builds.
//!
//! ## Phases
//!
//! 1. **Transform** ([`tally_transform`]): statistics to entity graph.
//! 2. **Package graph** ([`tally_graph::PackageGraphBuilder`]): modules to
//!    packages via their manifests.
//! 3. **Attribution** ([`tally_sourcemap`]): per-module parsed size and code
//!    from assets and their source maps.
//! 4. **Diff** ([`tally_diff`]): two finished graphs compared by asset.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tally::{AnalyzerConfig, analyze};
//!
//! # async fn example() -> tally::Result<()> {
//! let stats = std::fs::read_to_string("dist/stats.json").unwrap();
//! let analysis = analyze(&stats, AnalyzerConfig::default()).await?;
//! for duplicate in analysis.duplicate_packages() {
//!     println!("{} in {} versions", duplicate.name, duplicate.versions.len());
//! }
//! # Ok(())
//! # }
//! ```

mod analysis;
mod analyzer;
mod error;

pub use analysis::Analysis;
pub use analyzer::{Analyzer, analyze};
pub use error::{Error, Result};

pub use tally_config::{AnalyzerConfig, ConfigError, LogLevel};
#[cfg(feature = "logging")]
pub use tally_config::{init_logging, init_logging_from_env};
pub use tally_diff::{AssetCategory, AssetStatus, DiffSummary, Direction};
pub use tally_graph::{BuildGraph, BuildGraphData, CodeLevel, Runtime};
pub use tally_sourcemap::{AttributionReport, InMemoryProvider, SourceMapProvider};
pub use tally_transform::{GraphPatch, StatsCompilation, TransformReport};

/// Crate-level access for callers that need more than the pipeline.
pub use tally_config as config;
pub use tally_diff as diff;
pub use tally_graph as graph;
pub use tally_sourcemap as sourcemap;
pub use tally_transform as transform;
