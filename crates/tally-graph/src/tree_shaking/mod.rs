//! Tree-shaking overlay.
//!
//! A secondary graph attached to modules that records which exports exist,
//! where re-exports originate and which exports are consumed. The arenas live
//! on [`ModuleGraph`](crate::ModuleGraph); the types here are the records.

mod export_info;
mod side_effect;
mod variable;

pub use export_info::ExportInfo;
pub use side_effect::SideEffect;
pub use variable::Variable;

use serde::{Deserialize, Serialize};

use crate::ids::{ExportId, ModuleId, SideEffectId, VariableId};

/// Default cap on re-export chain traversal.
pub const DEFAULT_MAX_REEXPORT_DEPTH: usize = 16;

/// Per-module overlay node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleGraphModule {
    pub module: ModuleId,
    pub exports: Vec<ExportId>,
    pub side_effects: Vec<SideEffectId>,
    pub variables: Vec<VariableId>,
}

impl ModuleGraphModule {
    pub fn new(module: ModuleId) -> Self {
        Self {
            module,
            exports: Vec::new(),
            side_effects: Vec::new(),
            variables: Vec::new(),
        }
    }
}
