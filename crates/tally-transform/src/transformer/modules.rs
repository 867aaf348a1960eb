//! Module creation and merging.

use tally_graph::{ChunkId, Module, ModuleId, ModuleKind, ModuleMeta};

use super::{ModuleEntry, Transformer};
use crate::path::module_path;
use crate::stats::StatsModule;

impl Transformer<'_> {
    /// Create or merge one module per distinct identifier.
    ///
    /// Returns the graph id for every entry, `None` for skipped ones.
    pub(super) fn add_modules(&mut self, entries: &[ModuleEntry<'_>]) -> Vec<Option<ModuleId>> {
        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(identifier) = self.identifier_of(entry.stats) else {
                self.report.modules_skipped += 1;
                ids.push(None);
                continue;
            };
            let id = match self.graph.module_graph.module_id_by_identifier(&identifier) {
                Some(existing) => {
                    self.merge_module(existing, entry.stats);
                    self.report.modules_merged += 1;
                    existing
                }
                None => {
                    let module = self.build_module(identifier, entry.stats);
                    self.report.modules_added += 1;
                    self.graph.module_graph.add_module(module)
                }
            };
            if let Some(render_id) = &entry.stats.id {
                let has_render_id = self
                    .graph
                    .module_graph
                    .module(id)
                    .is_some_and(|m| m.render_id.is_some());
                if !has_render_id {
                    self.graph.module_graph.set_render_id(id, render_id.to_string());
                }
            }
            self.attach_chunks(id, entry);
            ids.push(Some(id));
        }

        for (index, entry) in entries.iter().enumerate() {
            let (Some(container), Some(member)) = (entry.container, ids[index]) else {
                continue;
            };
            let Some(root) = ids[container] else {
                continue;
            };
            if self.graph.module_graph.add_concatenation_member(root, member) {
                let chunks = self
                    .graph
                    .module_graph
                    .module(root)
                    .map(|m| m.chunks.clone())
                    .unwrap_or_default();
                for chunk in chunks {
                    self.add_to_chunk(member, chunk);
                }
            }
        }
        ids
    }

    fn build_module(&mut self, identifier: String, stats: &StatsModule) -> Module {
        let name = stats
            .name_for_condition
            .as_deref()
            .or(stats.name.as_deref())
            .unwrap_or(&identifier);
        let path = module_path(name, &self.root);
        let kind = if stats.modules.is_empty() {
            ModuleKind::Normal
        } else {
            ModuleKind::Concatenation
        };
        let id = self.graph.module_graph.next_module_id();
        let mut module = Module::builder(id, identifier, path)
            .kind(kind)
            .entry(is_entry(stats))
            .layer(stats.layer.clone())
            .source_size(stats.size)
            .transformed_size(stats.size)
            .bailout_reasons(self.filter_bailouts(&stats.optimization_bailout))
            .issuer_identifiers(issuer_identifiers(stats))
            .meta(ModuleMeta {
                is_orphan: stats.orphan,
                depth: stats.depth,
            })
            .build();
        if let Some(source) = &stats.source {
            module.set_transformed_source(source.clone());
        }
        module
    }

    /// Fill fields of an existing module that are still empty.
    fn merge_module(&mut self, id: ModuleId, stats: &StatsModule) {
        let bailouts = self.filter_bailouts(&stats.optimization_bailout);
        let Some(module) = self.graph.module_graph.module_mut(id) else {
            return;
        };
        module.fill_source_size(stats.size);
        module.fill_transformed_size(stats.size);
        if module.layer.is_none() {
            module.layer = stats.layer.clone();
        }
        if module.issuer_identifiers.is_empty() {
            module.issuer_identifiers = issuer_identifiers(stats);
        }
        if module.source().transformed.is_empty() {
            if let Some(source) = &stats.source {
                module.set_transformed_source(source.clone());
            }
        }
        for reason in bailouts {
            module.add_bailout_reason(reason);
        }
        module.is_entry |= is_entry(stats);
        module.meta.is_orphan |= stats.orphan;
        if module.meta.depth.is_none() {
            module.meta.depth = stats.depth;
        }
        if !stats.modules.is_empty() && module.root_module.is_none() {
            module.kind = ModuleKind::Concatenation;
        }
    }

    fn attach_chunks(&mut self, id: ModuleId, entry: &ModuleEntry<'_>) {
        let mut chunks: Vec<_> = entry
            .stats
            .chunks
            .iter()
            .filter_map(|chunk| self.chunk_id(chunk))
            .collect();
        chunks.extend(entry.chunk);
        for chunk in chunks {
            self.add_to_chunk(id, chunk);
        }
    }

    fn add_to_chunk(&mut self, module: ModuleId, chunk: ChunkId) {
        if let Some(m) = self.graph.module_graph.module_mut(module) {
            m.add_chunk(chunk);
        }
        self.graph.chunk_graph.add_module_to_chunk(chunk, module);
    }

    fn filter_bailouts(&mut self, reasons: &[String]) -> Vec<String> {
        let mut kept = Vec::with_capacity(reasons.len());
        for reason in reasons {
            if self.options.is_ignored_bailout(reason) {
                self.report.bailouts_filtered += 1;
            } else if !kept.contains(reason) {
                kept.push(reason.clone());
            }
        }
        kept
    }
}

fn is_entry(stats: &StatsModule) -> bool {
    stats.depth == Some(0)
        || stats
            .reasons
            .iter()
            .any(|reason| reason.kind.as_deref() == Some("entry"))
}

fn issuer_identifiers(stats: &StatsModule) -> Vec<String> {
    stats
        .issuer_path
        .iter()
        .filter_map(|issuer| issuer.identifier.clone())
        .collect()
}
