use serde::{Deserialize, Serialize};

use crate::ids::{ExportId, ModuleId, VariableId};

/// A local binding, optionally exposed through an export.
///
/// Whether it is used is answered by
/// [`ModuleGraph::variable_is_used`](crate::ModuleGraph::variable_is_used).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub module: ModuleId,
    pub name: String,
    pub export: Option<ExportId>,
}

impl Variable {
    pub fn new(id: VariableId, module: ModuleId, name: impl Into<String>) -> Self {
        Self {
            id,
            module,
            name: name.into(),
            export: None,
        }
    }
}
