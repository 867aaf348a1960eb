//! Wire records.
//!
//! Live entities are converted into these id-addressed records by
//! [`BuildGraph::to_data`](crate::BuildGraph::to_data). The same records feed
//! both JSON and the binary format, so no field may be skipped conditionally.

use serde::{Deserialize, Serialize};

use crate::chunk::{Asset, Chunk, EntryPoint};
use crate::dependency::Dependency;
use crate::ids::{ChunkId, DependencyId, ModuleId};
use crate::module::{ModuleKind, ModuleMeta, ModuleSize, ModuleSource, PackageData};
use crate::package::{Package, PackageDependency};
use crate::tree_shaking::{ExportInfo, ModuleGraphModule, SideEffect, Variable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleData {
    pub id: ModuleId,
    pub render_id: Option<String>,
    pub identifier: String,
    pub path: String,
    pub is_prefer_source: bool,
    pub has_source_map: bool,
    pub is_entry: bool,
    pub kind: ModuleKind,
    pub layer: Option<String>,
    pub size: ModuleSize,
    pub source: ModuleSource,
    pub bailout_reasons: Vec<String>,
    pub issuer_identifiers: Vec<String>,
    pub issuer_path: Vec<ModuleId>,
    pub dependencies: Vec<DependencyId>,
    pub imported: Vec<ModuleId>,
    pub chunks: Vec<ChunkId>,
    pub modules: Vec<ModuleId>,
    pub root_module: Option<ModuleId>,
    pub concatenation_modules: Vec<ModuleId>,
    pub meta: ModuleMeta,
    pub package_data: Option<PackageData>,
}

/// Serialized form of a whole [`BuildGraph`](crate::BuildGraph).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildGraphData {
    pub root: String,
    pub modules: Vec<ModuleData>,
    pub dependencies: Vec<Dependency>,
    pub module_graph_modules: Vec<ModuleGraphModule>,
    pub exports: Vec<ExportInfo>,
    pub side_effects: Vec<SideEffect>,
    pub variables: Vec<Variable>,
    pub chunks: Vec<Chunk>,
    pub assets: Vec<Asset>,
    pub entrypoints: Vec<EntryPoint>,
    pub packages: Vec<Package>,
    pub package_dependencies: Vec<PackageDependency>,
}
