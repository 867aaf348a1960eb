//! In-memory module graph.
//!
//! Modules, dependency edges and the tree-shaking overlay are stored in
//! insertion-ordered arenas addressed by typed ids. Cross references are ids,
//! so cycles (a module importing its importer) need no shared ownership.
//!
//! The graph is built by a single writer: each phase takes `&mut ModuleGraph`
//! and readers only see it once the phase returns.

mod mutations;
mod queries;
mod tree_shaking;

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::collections::{FxIndexMap, FxIndexSet};
use crate::dependency::Dependency;
use crate::ids::{DependencyId, ExportId, IdCounter, ModuleId, SideEffectId, VariableId};
use crate::module::Module;
use crate::tree_shaking::{
    DEFAULT_MAX_REEXPORT_DEPTH, ExportInfo, ModuleGraphModule, SideEffect, Variable,
};

#[derive(Debug, Clone)]
pub struct ModuleGraph {
    modules: FxIndexMap<ModuleId, Module>,
    dependencies: FxIndexMap<DependencyId, Dependency>,
    graph_modules: FxIndexMap<ModuleId, ModuleGraphModule>,
    exports: FxIndexMap<ExportId, ExportInfo>,
    side_effects: FxIndexMap<SideEffectId, SideEffect>,
    variables: FxIndexMap<VariableId, Variable>,
    by_identifier: FxHashMap<String, ModuleId>,
    by_render_id: FxHashMap<String, ModuleId>,
    by_path: FxHashMap<PathBuf, Vec<ModuleId>>,
    layers: FxIndexSet<String>,
    module_ids: IdCounter,
    dependency_ids: IdCounter,
    export_ids: IdCounter,
    side_effect_ids: IdCounter,
    variable_ids: IdCounter,
    max_reexport_depth: usize,
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self {
            modules: FxIndexMap::default(),
            dependencies: FxIndexMap::default(),
            graph_modules: FxIndexMap::default(),
            exports: FxIndexMap::default(),
            side_effects: FxIndexMap::default(),
            variables: FxIndexMap::default(),
            by_identifier: FxHashMap::default(),
            by_render_id: FxHashMap::default(),
            by_path: FxHashMap::default(),
            layers: FxIndexSet::default(),
            module_ids: IdCounter::new(),
            dependency_ids: IdCounter::new(),
            export_ids: IdCounter::new(),
            side_effect_ids: IdCounter::new(),
            variable_ids: IdCounter::new(),
            max_reexport_depth: DEFAULT_MAX_REEXPORT_DEPTH,
        }
    }
}

impl ModuleGraph {
    /// Create an empty graph with fresh id counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap used when following re-export chains. Zero is treated as one.
    pub fn set_max_reexport_depth(&mut self, depth: usize) {
        self.max_reexport_depth = depth.max(1);
    }

    pub fn max_reexport_depth(&self) -> usize {
        self.max_reexport_depth
    }

    /// Rebuild a graph from records carrying their own ids.
    ///
    /// Counters are advanced past every restored id; nothing is renumbered.
    pub(crate) fn restore(
        modules: Vec<Module>,
        dependencies: Vec<Dependency>,
        graph_modules: Vec<ModuleGraphModule>,
        exports: Vec<ExportInfo>,
        side_effects: Vec<SideEffect>,
        variables: Vec<Variable>,
    ) -> Self {
        let mut graph = Self::new();
        for module in modules {
            graph.module_ids.observe(module.id.raw());
            graph.index_module(&module);
            graph.modules.insert(module.id, module);
        }
        for dep in dependencies {
            graph.dependency_ids.observe(dep.id.raw());
            graph.dependencies.insert(dep.id, dep);
        }
        for mgm in graph_modules {
            graph.graph_modules.insert(mgm.module, mgm);
        }
        for export in exports {
            graph.export_ids.observe(export.id.raw());
            graph.exports.insert(export.id, export);
        }
        for side_effect in side_effects {
            graph.side_effect_ids.observe(side_effect.id.raw());
            graph.side_effects.insert(side_effect.id, side_effect);
        }
        for variable in variables {
            graph.variable_ids.observe(variable.id.raw());
            graph.variables.insert(variable.id, variable);
        }
        graph
    }

    fn index_module(&mut self, module: &Module) {
        self.by_identifier
            .insert(module.identifier.clone(), module.id);
        if let Some(render_id) = &module.render_id {
            self.by_render_id.insert(render_id.clone(), module.id);
        }
        let ids = self.by_path.entry(module.path.clone()).or_default();
        if !ids.contains(&module.id) {
            ids.push(module.id);
        }
        if let Some(layer) = &module.layer {
            self.layers.insert(layer.clone());
        }
    }
}
