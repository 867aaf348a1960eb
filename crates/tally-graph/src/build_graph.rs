//! The complete graph of one build and its wire formats.

use std::path::PathBuf;

use crate::chunk_graph::ChunkGraph;
use crate::module_graph::ModuleGraph;
use crate::package::PackageGraph;
use crate::serialization::{BuildGraphData, CodeLevel, module_from_data, module_to_data};
use crate::{Error, Result};

/// Binary format version written by [`BuildGraph::to_bytes`].
///
/// - Version 1: Initial implementation
pub const FORMAT_VERSION: u32 = 1;

/// Module, chunk and package graphs of one build.
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    /// Build context directory.
    pub root: PathBuf,
    pub module_graph: ModuleGraph,
    pub chunk_graph: ChunkGraph,
    pub package_graph: PackageGraph,
}

/// Entity counts of a [`BuildGraph`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStatistics {
    pub modules: usize,
    pub concatenation_modules: usize,
    pub dependencies: usize,
    pub chunks: usize,
    pub assets: usize,
    pub entrypoints: usize,
    pub packages: usize,
    pub package_dependencies: usize,
    /// Sum of all asset sizes in bytes.
    pub total_asset_size: u64,
}

impl BuildGraph {
    /// An empty graph rooted at `root`, with fresh id counters.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            modules: self.module_graph.module_count(),
            concatenation_modules: self
                .module_graph
                .modules()
                .filter(|m| m.is_concatenation())
                .count(),
            dependencies: self.module_graph.dependency_count(),
            chunks: self.chunk_graph.chunk_count(),
            assets: self.chunk_graph.asset_count(),
            entrypoints: self.chunk_graph.entrypoint_count(),
            packages: self.package_graph.package_count(),
            package_dependencies: self.package_graph.dependency_count(),
            total_asset_size: self.chunk_graph.assets().map(|a| a.size).sum(),
        }
    }

    /// Convert to id-addressed records, eliding code text per `level`.
    pub fn to_data(&self, level: CodeLevel) -> BuildGraphData {
        let mg = &self.module_graph;
        BuildGraphData {
            root: self.root.to_string_lossy().into_owned(),
            modules: mg.modules().map(|m| module_to_data(m, level)).collect(),
            dependencies: mg.dependencies().cloned().collect(),
            module_graph_modules: mg.graph_modules().cloned().collect(),
            exports: mg.exports().cloned().collect(),
            side_effects: mg.side_effects().cloned().collect(),
            variables: mg.variables().cloned().collect(),
            chunks: self.chunk_graph.chunks().cloned().collect(),
            assets: self
                .chunk_graph
                .assets()
                .map(|a| {
                    let mut a = a.clone();
                    if !level.keeps_asset_content() {
                        a.content = None;
                    }
                    a
                })
                .collect(),
            entrypoints: self.chunk_graph.entrypoints().cloned().collect(),
            packages: self.package_graph.packages().cloned().collect(),
            package_dependencies: self.package_graph.package_dependencies().cloned().collect(),
        }
    }

    /// Rebuild from records. Ids are taken verbatim; counters continue after
    /// the largest restored id.
    pub fn from_data(data: BuildGraphData) -> Self {
        let module_graph = ModuleGraph::restore(
            data.modules.into_iter().map(module_from_data).collect(),
            data.dependencies,
            data.module_graph_modules,
            data.exports,
            data.side_effects,
            data.variables,
        );
        let chunk_graph = ChunkGraph::restore(data.chunks, data.assets, data.entrypoints);
        let package_graph = PackageGraph::restore(data.packages, data.package_dependencies);
        Self {
            root: PathBuf::from(data.root),
            module_graph,
            chunk_graph,
            package_graph,
        }
    }

    pub fn to_json(&self, level: CodeLevel) -> Result<String> {
        Ok(serde_json::to_string(&self.to_data(level))?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: BuildGraphData = serde_json::from_str(json)?;
        Ok(Self::from_data(data))
    }

    /// Serialize to the binary format.
    ///
    /// The payload starts with [`FORMAT_VERSION`].
    pub fn to_bytes(&self, level: CodeLevel) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SerializedGraph {
            version: u32,
            data: BuildGraphData,
        }

        let serialized = SerializedGraph {
            version: FORMAT_VERSION,
            data: self.to_data(level),
        };
        bincode::serde::encode_to_vec(&serialized, bincode::config::standard())
            .map_err(|e| Error::Serialization(format!("Failed to serialize graph to bytes: {e}")))
    }

    /// Deserialize from the binary format.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Deserialization fails
    /// - The format version is incompatible with the current implementation
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        #[derive(serde::Deserialize)]
        struct SerializedGraph {
            version: u32,
            data: BuildGraphData,
        }

        let (serialized, _): (SerializedGraph, _) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard()).map_err(
                |e| Error::Serialization(format!("Failed to deserialize graph from bytes: {e}")),
            )?;
        if serialized.version != FORMAT_VERSION {
            return Err(Error::IncompatibleFormat {
                expected: FORMAT_VERSION,
                found: serialized.version,
            });
        }
        Ok(Self::from_data(serialized.data))
    }
}
