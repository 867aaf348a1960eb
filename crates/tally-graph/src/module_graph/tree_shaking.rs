//! Tree-shaking overlay operations.

use rustc_hash::FxHashSet;

use super::ModuleGraph;
use crate::ids::{ExportId, ModuleId, SideEffectId, VariableId};
use crate::module::push_unique;
use crate::tree_shaking::{ExportInfo, ModuleGraphModule, SideEffect, Variable};

impl ModuleGraph {
    pub fn graph_module(&self, module: ModuleId) -> Option<&ModuleGraphModule> {
        self.graph_modules.get(&module)
    }

    pub fn graph_modules(&self) -> impl Iterator<Item = &ModuleGraphModule> {
        self.graph_modules.values()
    }

    fn ensure_graph_module(&mut self, module: ModuleId) -> Option<&mut ModuleGraphModule> {
        if !self.modules.contains_key(&module) {
            return None;
        }
        Some(
            self.graph_modules
                .entry(module)
                .or_insert_with(|| ModuleGraphModule::new(module)),
        )
    }

    pub fn export(&self, id: ExportId) -> Option<&ExportInfo> {
        self.exports.get(&id)
    }

    pub fn exports(&self) -> impl Iterator<Item = &ExportInfo> {
        self.exports.values()
    }

    pub fn side_effect(&self, id: SideEffectId) -> Option<&SideEffect> {
        self.side_effects.get(&id)
    }

    pub fn side_effects(&self) -> impl Iterator<Item = &SideEffect> {
        self.side_effects.values()
    }

    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(&id)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Exports declared by `module`.
    pub fn exports_of(&self, module: ModuleId) -> Vec<&ExportInfo> {
        self.graph_modules
            .get(&module)
            .map(|mgm| {
                mgm.exports
                    .iter()
                    .filter_map(|e| self.exports.get(e))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn export_by_name(&self, module: ModuleId, name: &str) -> Option<&ExportInfo> {
        self.exports_of(module).into_iter().find(|e| e.name == name)
    }

    /// Declare export `name` on `module`. Declaring it again returns the same id.
    pub fn add_export(&mut self, module: ModuleId, name: &str) -> Option<ExportId> {
        if let Some(existing) = self.export_by_name(module, name) {
            return Some(existing.id);
        }
        self.ensure_graph_module(module)?;
        let id: ExportId = self.export_ids.next_id();
        self.exports.insert(id, ExportInfo::new(id, module, name));
        if let Some(mgm) = self.graph_modules.get_mut(&module) {
            mgm.exports.push(id);
        }
        Some(id)
    }

    /// Mark `export` as a re-export of `from`.
    pub fn set_export_from(&mut self, export: ExportId, from: ExportId) -> bool {
        if export == from || !self.exports.contains_key(&from) {
            return false;
        }
        match self.exports.get_mut(&export) {
            Some(info) => {
                info.from = Some(from);
                true
            }
            None => false,
        }
    }

    /// Record a use of `name` on `module`. Recording it again returns the same id.
    pub fn add_side_effect(&mut self, module: ModuleId, name: &str) -> Option<SideEffectId> {
        let existing = self.graph_modules.get(&module).and_then(|mgm| {
            mgm.side_effects.iter().copied().find(|id| {
                self.side_effects
                    .get(id)
                    .is_some_and(|se| se.name == name)
            })
        });
        if existing.is_some() {
            return existing;
        }
        self.ensure_graph_module(module)?;
        let id: SideEffectId = self.side_effect_ids.next_id();
        self.side_effects
            .insert(id, SideEffect::new(id, module, name));
        if let Some(mgm) = self.graph_modules.get_mut(&module) {
            mgm.side_effects.push(id);
        }
        Some(id)
    }

    /// Link a use to the export it references.
    ///
    /// The use is propagated up the re-export chain, so every export between
    /// `export` and its origin is marked used. Traversal stops at the depth
    /// cap or when an export repeats.
    pub fn link_side_effect(&mut self, side_effect: SideEffectId, export: ExportId) -> bool {
        if !self.side_effects.contains_key(&side_effect) {
            return false;
        }
        let chain = self.reexport_chain(export);
        if chain.is_empty() {
            return false;
        }
        for export_id in &chain {
            if let Some(info) = self.exports.get_mut(export_id) {
                push_unique(&mut info.side_effects, side_effect);
            }
        }
        if let Some(se) = self.side_effects.get_mut(&side_effect) {
            for export_id in chain {
                push_unique(&mut se.exports, export_id);
            }
        }
        true
    }

    /// Declare a local binding, optionally exposed through `export`.
    pub fn add_variable(
        &mut self,
        module: ModuleId,
        name: &str,
        export: Option<ExportId>,
    ) -> Option<VariableId> {
        let existing = self.graph_modules.get(&module).and_then(|mgm| {
            mgm.variables
                .iter()
                .copied()
                .find(|id| self.variables.get(id).is_some_and(|v| v.name == name))
        });
        let id = match existing {
            Some(id) => id,
            None => {
                self.ensure_graph_module(module)?;
                let id: VariableId = self.variable_ids.next_id();
                self.variables.insert(id, Variable::new(id, module, name));
                if let Some(mgm) = self.graph_modules.get_mut(&module) {
                    mgm.variables.push(id);
                }
                id
            }
        };
        if let Some(export) = export.filter(|e| self.exports.contains_key(e)) {
            if let Some(variable) = self.variables.get_mut(&id) {
                variable.export = Some(export);
            }
            if let Some(info) = self.exports.get_mut(&export) {
                info.variable = Some(id);
            }
        }
        Some(id)
    }

    /// Follow `from` links to the originating export.
    ///
    /// Returns the last export reached. A cyclic or over-long chain is cut at
    /// the depth cap and logged; the export reached at that point is returned.
    pub fn recursive_export(&self, export: ExportId) -> Option<ExportId> {
        self.reexport_chain(export).last().copied()
    }

    /// `export` followed by each export it re-exports, bounded.
    pub fn reexport_chain(&self, export: ExportId) -> Vec<ExportId> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = self.exports.get(&export);
        while let Some(info) = current {
            if !seen.insert(info.id) {
                tracing::warn!(export = %info.name, "cyclic re-export chain");
                break;
            }
            chain.push(info.id);
            if chain.len() > self.max_reexport_depth {
                tracing::warn!(
                    export = %info.name,
                    depth = self.max_reexport_depth,
                    "re-export chain exceeds depth cap"
                );
                break;
            }
            current = info.from.and_then(|from| self.exports.get(&from));
        }
        chain
    }

    pub fn export_is_used(&self, export: ExportId) -> bool {
        self.exports.get(&export).is_some_and(ExportInfo::is_used)
    }

    /// A variable is used iff the export exposing it has a recorded use.
    pub fn variable_is_used(&self, variable: VariableId) -> bool {
        self.variables
            .get(&variable)
            .and_then(|v| v.export)
            .is_some_and(|e| self.export_is_used(e))
    }

    /// Exports of `module` with no recorded use.
    pub fn unused_exports(&self, module: ModuleId) -> Vec<&ExportInfo> {
        self.exports_of(module)
            .into_iter()
            .filter(|e| !e.is_used())
            .collect()
    }
}
