use serde::{Deserialize, Serialize};

use crate::ids::{ExportId, ModuleId, SideEffectId};

/// One concrete use of a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideEffect {
    pub id: SideEffectId,
    /// Module the use was recorded on.
    pub module: ModuleId,
    pub name: String,
    /// Exports this use reaches, nearest first.
    pub exports: Vec<ExportId>,
}

impl SideEffect {
    pub fn new(id: SideEffectId, module: ModuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            module,
            name: name.into(),
            exports: Vec::new(),
        }
    }
}
