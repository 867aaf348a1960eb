//! Resolves modules to packages and derives the package graph.

use rustc_hash::FxHashMap;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use super::graph::PackageGraph;
use super::manifest::Manifest;
use super::types::{DuplicateModule, PackageDuplicate};
use crate::chunk_graph::ChunkGraph;
use crate::ids::PackageId;
use crate::module::Module;
use crate::module_graph::ModuleGraph;
use crate::runtime::Runtime;

const MANIFEST_NAME: &str = "package.json";
const PACKAGE_BOUNDARY: &str = "node_modules";

/// Builds a [`PackageGraph`] from a module graph.
///
/// Manifest reads go through the injected runtime and are memoized per
/// directory for the lifetime of the builder, misses included.
pub struct PackageGraphBuilder<'a, R: Runtime + ?Sized> {
    runtime: &'a R,
    root: PathBuf,
    manifests: FxHashMap<PathBuf, Option<Manifest>>,
}

impl<'a, R: Runtime + ?Sized> PackageGraphBuilder<'a, R> {
    pub fn new(runtime: &'a R, root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            root: root.into(),
            manifests: FxHashMap::default(),
        }
    }

    /// Resolve every chunked Normal module and build package edges and
    /// duplicate records.
    pub async fn build(&mut self, modules: &ModuleGraph, chunks: &ChunkGraph) -> PackageGraph {
        let mut graph = PackageGraph::new();

        for module in modules.modules() {
            if module.is_concatenation() || module.chunks.is_empty() {
                continue;
            }
            if let Some(package) = self.resolve(&mut graph, module).await {
                graph.add_module(package, module.id);
            }
        }

        self.collect_duplicates(&mut graph, modules, chunks);

        for dep in modules.dependencies() {
            let source = graph.package_id_of_module(dep.module);
            let target = graph.package_id_of_module(dep.original_dependency);
            if let (Some(source), Some(target)) = (source, target) {
                graph.add_dependency(source, target, dep.id);
            }
        }

        tracing::info!(
            packages = graph.package_count(),
            dependencies = graph.dependency_count(),
            "package graph built"
        );
        graph
    }

    async fn resolve(&mut self, graph: &mut PackageGraph, module: &Module) -> Option<PackageId> {
        let path = module.path();
        if let Some(cached) = graph.cached_path(path) {
            return cached;
        }

        let resolved = if let Some(data) = &module.package_data {
            Some(graph.ensure_package(&data.name, &data.version, &data.root))
        } else if let Some(known) = known_root_for(graph, path) {
            Some(known)
        } else {
            self.walk_up(graph, path).await
        };

        graph.cache_path(path, resolved);
        resolved
    }

    async fn walk_up(&mut self, graph: &mut PackageGraph, path: &Path) -> Option<PackageId> {
        let build_root = self.root.clone();
        let mut current = path.parent();
        while let Some(dir) = current {
            if let Some(manifest) = self.manifest_in(dir).await {
                if let Some((name, version)) = manifest.identity() {
                    let root = manifest.package_root(&build_root);
                    return Some(graph.ensure_package(name, version, &root));
                }
            }
            current = dir.parent();
        }
        tracing::debug!(path = %path.display(), "no package manifest found");
        None
    }

    async fn manifest_in(&mut self, dir: &Path) -> Option<&Manifest> {
        if !self.manifests.contains_key(dir) {
            let path = dir.join(MANIFEST_NAME);
            let manifest = if self.runtime.exists(&path) {
                match Manifest::from_path(self.runtime, &path).await {
                    Ok(manifest) => Some(manifest),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "skipping manifest");
                        None
                    }
                }
            } else {
                None
            };
            self.manifests.insert(dir.to_path_buf(), manifest);
        }
        self.manifests.get(dir).and_then(Option::as_ref)
    }

    /// Record packages whose modules together were emitted into more than
    /// one chunk.
    ///
    /// Each such package gets one entry listing every contributing module,
    /// layers of one file included, and the union of their chunk names.
    fn collect_duplicates(
        &self,
        graph: &mut PackageGraph,
        modules: &ModuleGraph,
        chunks: &ChunkGraph,
    ) {
        let mut pending: Vec<(PackageId, PackageDuplicate)> = Vec::new();
        for package in graph.packages() {
            let mut duplicate = PackageDuplicate {
                modules: Vec::new(),
                chunks: Vec::new(),
            };
            for module_id in &package.modules {
                let Some(module) = modules.module(*module_id) else {
                    continue;
                };
                let names = module
                    .chunks
                    .iter()
                    .filter_map(|id| chunks.chunk(*id))
                    .map(|chunk| chunk.display_name())
                    .collect::<Vec<_>>();
                if names.is_empty() {
                    continue;
                }
                duplicate.modules.push(DuplicateModule {
                    module: module.id,
                    path: module.path().to_path_buf(),
                });
                for name in names {
                    if !duplicate.chunks.iter().any(|known| known == name) {
                        duplicate.chunks.push(name.to_string());
                    }
                }
            }
            if duplicate.chunks.len() > 1 {
                pending.push((package.id, duplicate));
            }
        }
        for (package, duplicate) in pending {
            graph.set_duplicate(package, duplicate);
        }
    }
}

/// The nearest known package root containing `path`, unless the remainder
/// crosses into a nested `node_modules`.
fn known_root_for(graph: &PackageGraph, path: &Path) -> Option<PackageId> {
    let mut current = path.parent();
    while let Some(dir) = current {
        if let Some(id) = graph.package_id_by_root(dir) {
            let nested = path.strip_prefix(dir).ok().is_some_and(|rest| {
                rest.components()
                    .any(|c| c == Component::Normal(OsStr::new(PACKAGE_BOUNDARY)))
            });
            return if nested { None } else { Some(id) };
        }
        current = dir.parent();
    }
    None
}
