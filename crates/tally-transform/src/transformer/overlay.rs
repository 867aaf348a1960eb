//! Tree-shaking overlay from `providedExports` and `usedExports`.

use tally_graph::ModuleId;

use super::{ModuleEntry, Transformer};
use crate::stats::UsedExports;

impl Transformer<'_> {
    /// Declare provided exports and record a use for each used one.
    ///
    /// A use reported by the bundler has no importing site, so the side
    /// effect is owned by the exporting module.
    pub(super) fn apply_export_usage(&mut self, entries: &[ModuleEntry<'_>], ids: &[Option<ModuleId>]) {
        let mg = &mut self.graph.module_graph;
        for (entry, id) in entries.iter().zip(ids) {
            let Some(module) = *id else {
                continue;
            };
            let provided = entry.stats.provided_exports.as_deref().unwrap_or_default();
            for name in provided {
                mg.add_export(module, name);
            }
            let used: Vec<&str> = match &entry.stats.used_exports {
                Some(UsedExports::All(true)) => provided.iter().map(String::as_str).collect(),
                Some(UsedExports::Names(names)) => names.iter().map(String::as_str).collect(),
                Some(UsedExports::All(false)) | None => Vec::new(),
            };
            for name in used {
                let Some(export) = mg.add_export(module, name) else {
                    continue;
                };
                if let Some(side_effect) = mg.add_side_effect(module, name) {
                    mg.link_side_effect(side_effect, export);
                }
            }
        }
    }
}
