use serde::{Deserialize, Serialize};

use crate::ids::{ExportId, ModuleId, SideEffectId, VariableId};

/// A declared export of a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
    pub id: ExportId,
    pub module: ModuleId,
    pub name: String,
    /// Originating export in another module, for re-exports.
    pub from: Option<ExportId>,
    /// Uses recorded against this export, including uses of re-exports of it.
    pub side_effects: Vec<SideEffectId>,
    /// Local binding exposed by this export.
    pub variable: Option<VariableId>,
}

impl ExportInfo {
    pub fn new(id: ExportId, module: ModuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            module,
            name: name.into(),
            from: None,
            side_effects: Vec::new(),
            variable: None,
        }
    }

    pub fn is_reexport(&self) -> bool {
        self.from.is_some()
    }

    pub fn is_used(&self) -> bool {
        !self.side_effects.is_empty()
    }
}
