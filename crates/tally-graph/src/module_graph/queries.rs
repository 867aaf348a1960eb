//! Query methods for ModuleGraph.

use std::path::Path;

use super::ModuleGraph;
use crate::dependency::Dependency;
use crate::ids::{ChunkId, DependencyId, ModuleId};
use crate::module::Module;

impl ModuleGraph {
    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn module_by_identifier(&self, identifier: &str) -> Option<&Module> {
        self.by_identifier
            .get(identifier)
            .and_then(|id| self.modules.get(id))
    }

    pub fn module_id_by_identifier(&self, identifier: &str) -> Option<ModuleId> {
        self.by_identifier.get(identifier).copied()
    }

    pub fn module_by_render_id(&self, render_id: &str) -> Option<&Module> {
        self.by_render_id
            .get(render_id)
            .and_then(|id| self.modules.get(id))
    }

    pub fn module_id_by_render_id(&self, render_id: &str) -> Option<ModuleId> {
        self.by_render_id.get(render_id).copied()
    }

    /// Every module built from `path`, one per layer.
    pub fn modules_by_path(&self, path: &Path) -> Vec<&Module> {
        self.by_path
            .get(path)
            .map(|ids| ids.iter().filter_map(|id| self.modules.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn module_ids_by_path(&self, path: &Path) -> &[ModuleId] {
        self.by_path.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn modules_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.values_mut()
    }

    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.keys().copied()
    }

    pub fn entry_modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values().filter(|m| m.is_entry)
    }

    /// Modules belonging to `chunk`.
    pub fn modules_in_chunk(&self, chunk: ChunkId) -> impl Iterator<Item = &Module> {
        self.modules
            .values()
            .filter(move |m| m.chunks.contains(&chunk))
    }

    /// The concatenation root of `id`, or `id` itself.
    pub fn root_of(&self, id: ModuleId) -> ModuleId {
        self.modules
            .get(&id)
            .and_then(|m| m.root_module)
            .unwrap_or(id)
    }

    pub fn dependency(&self, id: DependencyId) -> Option<&Dependency> {
        self.dependencies.get(&id)
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.values()
    }

    /// Outgoing edges of a module.
    pub fn dependencies_of(&self, id: ModuleId) -> Vec<&Dependency> {
        self.modules
            .get(&id)
            .map(|m| {
                m.dependencies
                    .iter()
                    .filter_map(|d| self.dependencies.get(d))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Modules importing `id`.
    pub fn dependents_of(&self, id: ModuleId) -> Vec<&Module> {
        self.modules
            .get(&id)
            .map(|m| {
                m.imported
                    .iter()
                    .filter_map(|i| self.modules.get(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Build layers seen so far, in first-seen order.
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(String::as_str)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
