//! # tally-sourcemap
//!
//! Reconstructs how many bytes of each emitted asset belong to which source
//! module, and what that code looks like.
//!
//! Two strategies fill a module's parsed size and code, chosen per asset:
//!
//! - **Source map** ([`attribute_maps`]): the generated text is cut at every
//!   mapping and each slice is credited to the mapping's original source.
//! - **Bundle scan** ([`scan_assets`]): for assets without a usable map, the
//!   bundle is parsed with oxc and module factories are located by render id.
//!
//! [`attribute`] fetches maps through a [`SourceMapProvider`] and runs both.
//!
//! ```rust
//! use tally_graph::{BuildGraph, Module};
//! use tally_sourcemap::{AttributionOptions, MapInput, SourceMapFile, attribute_maps};
//!
//! let mut graph = BuildGraph::new("/app");
//! let id = graph.module_graph.next_module_id();
//! let a = graph.module_graph.add_module(Module::builder(id, "./a.js", "/app/a.js").build());
//! let asset = graph.chunk_graph.ensure_asset("bundle.js", 18);
//! graph.chunk_graph.asset_mut(asset).unwrap().content = Some("export const a=1;\n".into());
//!
//! let map = r#"{"version":3,"sources":["a.js"],"names":[],"mappings":"AAAA"}"#;
//! let inputs = [MapInput {
//!     asset,
//!     map: SourceMapFile { json: map.into(), path: None },
//! }];
//! attribute_maps(&mut graph, &inputs, &AttributionOptions::default());
//!
//! assert_eq!(graph.module_graph.module(a).unwrap().size.parsed_size, 18);
//! ```

pub mod attribution;
pub mod map;
pub mod provider;
pub mod resolve;
pub mod scan;
pub mod statements;

pub use attribution::{
    AttributionOptions, AttributionReport, MapInput, MappedOutcome, ScanOutcome, attribute,
    attribute_maps, scan_assets,
};
pub use map::{AssetSlices, TokenIndex, parse_map, slice_asset};
pub use provider::{InMemoryProvider, OutputDirProvider, SourceMapFile, SourceMapProvider};
pub use resolve::{MapContext, ResolvedPaths, SourcePathResolver};
pub use scan::scan_bundle;
pub use statements::map_statement_positions;

/// Source-map failures. Attribution itself never returns them; an unusable
/// map sends its asset to the bundle scan instead.
#[derive(Debug, thiserror::Error)]
pub enum SourceMapError {
    #[error("invalid source map: {0}")]
    Invalid(String),

    #[error("source map has no mappings")]
    NoMappings,
}

pub type Result<T> = std::result::Result<T, SourceMapError>;
