//! Package-level graph.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use super::types::{DuplicatePackages, Package, PackageDependency, PackageDuplicate};
use crate::collections::{FxIndexMap, FxIndexSet};
use crate::ids::{DependencyId, IdCounter, ModuleId, PackageDependencyId, PackageId};
use crate::module::push_unique;

#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    packages: FxIndexMap<PackageId, Package>,
    dependencies: FxIndexMap<PackageDependencyId, PackageDependency>,
    by_name: FxHashMap<String, Vec<PackageId>>,
    by_root: FxHashMap<PathBuf, PackageId>,
    module_package: FxHashMap<ModuleId, PackageId>,
    /// Resolution results keyed by module file path; `None` = no package.
    path_cache: FxHashMap<PathBuf, Option<PackageId>>,
    package_ids: IdCounter,
    dependency_ids: IdCounter,
}

impl PackageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the package with this identity, creating it when missing.
    pub fn ensure_package(&mut self, name: &str, version: &str, root: &Path) -> PackageId {
        if let Some(id) = self.by_root.get(root) {
            if let Some(pkg) = self.packages.get(id) {
                if pkg.name == name && pkg.version == version {
                    return *id;
                }
            }
        }
        if let Some(ids) = self.by_name.get(name) {
            let found = ids.iter().copied().find(|id| {
                self.packages
                    .get(id)
                    .is_some_and(|p| p.version == version && p.root == root)
            });
            if let Some(id) = found {
                return id;
            }
        }

        let id: PackageId = self.package_ids.next_id();
        tracing::debug!(%name, %version, root = %root.display(), "discovered package");
        self.packages
            .insert(id, Package::new(id, name, version, root));
        self.by_name.entry(name.to_string()).or_default().push(id);
        self.by_root.insert(root.to_path_buf(), id);
        id
    }

    /// Assign a module to a package. A module belongs to exactly one package;
    /// later assignments are ignored.
    pub fn add_module(&mut self, package: PackageId, module: ModuleId) -> bool {
        if self.module_package.contains_key(&module) {
            return false;
        }
        let Some(pkg) = self.packages.get_mut(&package) else {
            return false;
        };
        pkg.modules.push(module);
        self.module_package.insert(module, package);
        true
    }

    /// Add a package edge derived from `ref_dependency`.
    ///
    /// Self edges are skipped; an identical triple returns the existing id.
    pub fn add_dependency(
        &mut self,
        package: PackageId,
        dependency: PackageId,
        ref_dependency: DependencyId,
    ) -> Option<PackageDependencyId> {
        if package == dependency || !self.packages.contains_key(&dependency) {
            return None;
        }
        let existing = self.packages.get(&package)?.dependencies.iter().copied().find(|id| {
            self.dependencies.get(id).is_some_and(|d| {
                d.dependency == dependency && d.ref_dependency == ref_dependency
            })
        });
        if existing.is_some() {
            return existing;
        }

        let id: PackageDependencyId = self.dependency_ids.next_id();
        self.dependencies.insert(
            id,
            PackageDependency {
                id,
                package,
                dependency,
                ref_dependency,
            },
        );
        if let Some(pkg) = self.packages.get_mut(&package) {
            pkg.dependencies.push(id);
        }
        if let Some(pkg) = self.packages.get_mut(&dependency) {
            push_unique(&mut pkg.imported, package);
        }
        Some(id)
    }

    /// Replace the duplicate record of `package`; there is at most one.
    pub fn set_duplicate(&mut self, package: PackageId, duplicate: PackageDuplicate) {
        if let Some(pkg) = self.packages.get_mut(&package) {
            pkg.duplicates = vec![duplicate];
        }
    }

    pub(crate) fn cached_path(&self, path: &Path) -> Option<Option<PackageId>> {
        self.path_cache.get(path).copied()
    }

    pub(crate) fn cache_path(&mut self, path: &Path, package: Option<PackageId>) {
        self.path_cache.insert(path.to_path_buf(), package);
    }

    pub fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(&id)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    pub fn package_dependency(&self, id: PackageDependencyId) -> Option<&PackageDependency> {
        self.dependencies.get(&id)
    }

    pub fn package_dependencies(&self) -> impl Iterator<Item = &PackageDependency> {
        self.dependencies.values()
    }

    pub fn package_by_root(&self, root: &Path) -> Option<&Package> {
        self.by_root.get(root).and_then(|id| self.packages.get(id))
    }

    pub(crate) fn package_id_by_root(&self, root: &Path) -> Option<PackageId> {
        self.by_root.get(root).copied()
    }

    pub fn packages_by_name(&self, name: &str) -> Vec<&Package> {
        self.by_name
            .get(name)
            .map(|ids| ids.iter().filter_map(|id| self.packages.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn package_of_module(&self, module: ModuleId) -> Option<&Package> {
        self.module_package
            .get(&module)
            .and_then(|id| self.packages.get(id))
    }

    pub fn package_id_of_module(&self, module: ModuleId) -> Option<PackageId> {
        self.module_package.get(&module).copied()
    }

    /// Package names installed in more than one version.
    ///
    /// Within each name, packages are deduplicated by version (the first
    /// package seen for a version represents it). Result is sorted by name.
    pub fn duplicate_packages(&self) -> Vec<DuplicatePackages> {
        let mut names: Vec<&String> = self.by_name.keys().collect();
        names.sort();

        let mut result = Vec::new();
        for name in names {
            let mut by_version: FxIndexMap<&str, PackageId> = FxIndexMap::default();
            for id in &self.by_name[name] {
                if let Some(pkg) = self.packages.get(id) {
                    by_version.entry(pkg.version.as_str()).or_insert(*id);
                }
            }
            if by_version.len() < 2 {
                continue;
            }
            by_version.sort_keys();
            result.push(DuplicatePackages {
                name: name.clone(),
                versions: by_version.keys().map(|v| v.to_string()).collect(),
                packages: by_version.values().copied().collect(),
            });
        }
        result
    }

    /// Distinct package names, in discovery order.
    pub fn package_names(&self) -> Vec<&str> {
        let names: FxIndexSet<&str> = self.packages.values().map(|p| p.name.as_str()).collect();
        names.into_iter().collect()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    pub(crate) fn restore(packages: Vec<Package>, dependencies: Vec<PackageDependency>) -> Self {
        let mut graph = Self::new();
        for pkg in packages {
            graph.package_ids.observe(pkg.id.raw());
            graph.by_name.entry(pkg.name.clone()).or_default().push(pkg.id);
            graph.by_root.insert(pkg.root.clone(), pkg.id);
            for module in &pkg.modules {
                graph.module_package.insert(*module, pkg.id);
            }
            graph.packages.insert(pkg.id, pkg);
        }
        for dep in dependencies {
            graph.dependency_ids.observe(dep.id.raw());
            graph.dependencies.insert(dep.id, dep);
        }
        graph
    }
}
