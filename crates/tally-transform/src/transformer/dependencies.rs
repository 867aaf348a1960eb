//! Dependency edges from module `reasons`.

use tally_graph::{DependencyKind, ModuleId, SourceRange, Statement};

use super::{ModuleEntry, Transformer};
use crate::stats::StatsReason;

impl Transformer<'_> {
    pub(super) fn add_dependencies(&mut self, entries: &[ModuleEntry<'_>], ids: &[Option<ModuleId>]) {
        for (entry, target) in entries.iter().zip(ids) {
            let Some(target) = *target else {
                continue;
            };
            for reason in &entry.stats.reasons {
                if reason.kind.as_deref() == Some("entry") {
                    continue;
                }
                let Some(owner) = self.reason_owner(reason) else {
                    tracing::trace!(?reason.module_identifier, "reason references unknown module");
                    self.report.reasons_dropped += 1;
                    continue;
                };
                self.add_reason_edge(owner, target, reason);
            }
        }
    }

    fn reason_owner(&self, reason: &StatsReason) -> Option<ModuleId> {
        let mg = &self.graph.module_graph;
        reason
            .module_identifier
            .as_deref()
            .and_then(|identifier| mg.module_id_by_identifier(identifier))
            .or_else(|| {
                reason
                    .module_id
                    .as_ref()
                    .and_then(|id| mg.module_id_by_render_id(&id.to_string()))
            })
    }

    fn add_reason_edge(&mut self, owner: ModuleId, target: ModuleId, reason: &StatsReason) {
        let mg = &mut self.graph.module_graph;
        let kind = reason
            .kind
            .as_deref()
            .map(DependencyKind::from_reason_type)
            .unwrap_or_default();
        let request = match &reason.user_request {
            Some(request) => request.clone(),
            None => match mg.module(target) {
                Some(module) => module.identifier.clone(),
                None => return,
            },
        };

        let before = mg.dependency_count();
        let Some(dependency) = mg.add_dependency(owner, target, &request, kind) else {
            return;
        };
        if mg.dependency_count() > before {
            self.report.dependencies_added += 1;
        }
        if let Some(range) = reason.loc.as_deref().and_then(SourceRange::parse_loc) {
            mg.add_statement(dependency, Statement::new(owner, range));
        }
    }
}
