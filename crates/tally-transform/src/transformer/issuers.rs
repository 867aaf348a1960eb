//! Issuer path resolution.

use rustc_hash::FxHashMap;
use tally_graph::ModuleId;

use super::Transformer;

impl Transformer<'_> {
    /// Resolve every module's issuer identifiers to graph ids.
    ///
    /// Issuer chains repeat across whole directory subtrees, so lookups go
    /// through a cache. Unknown issuers are dropped.
    pub(super) fn resolve_issuers(&mut self) {
        let mut cache: FxHashMap<String, Option<ModuleId>> = FxHashMap::default();
        let mut resolved = Vec::new();
        let mg = &self.graph.module_graph;
        for module in mg.modules() {
            if module.issuer_identifiers.is_empty() {
                continue;
            }
            let path: Vec<ModuleId> = module
                .issuer_identifiers
                .iter()
                .filter_map(|identifier| {
                    *cache
                        .entry(identifier.clone())
                        .or_insert_with(|| mg.module_id_by_identifier(identifier))
                })
                .collect();
            if path != module.issuer_path {
                resolved.push((module.id, path));
            }
        }
        tracing::debug!(modules = resolved.len(), cached = cache.len(), "issuer paths resolved");
        for (id, path) in resolved {
            if let Some(module) = self.graph.module_graph.module_mut(id) {
                module.issuer_path = path;
            }
        }
    }
}
