//! Chunks, assets and entrypoints.

use tally_graph::ChunkId;

use super::Transformer;
use crate::stats::{StatsCompilation, StatsId};

impl Transformer<'_> {
    pub(super) fn add_chunks(&mut self, stats: &StatsCompilation) {
        for chunk in &stats.chunks {
            let Some(render_id) = &chunk.id else {
                tracing::debug!("chunk without id skipped");
                continue;
            };
            let name = chunk.names.first().map(String::as_str).unwrap_or_default();
            let chunk_graph = &mut self.graph.chunk_graph;
            let id = chunk_graph.ensure_chunk(&render_id.to_string(), name);
            if let Some(c) = chunk_graph.chunk_mut(id) {
                if chunk.size > 0 {
                    c.size = chunk.size;
                }
                c.initial |= chunk.initial;
                c.entry |= chunk.entry;
            }
            for file in chunk.files.iter().chain(&chunk.auxiliary_files) {
                let asset = chunk_graph.ensure_asset(file, 0);
                chunk_graph.link_asset(id, asset);
            }
        }
        self.report.chunks = self.graph.chunk_graph.chunk_count();

        for chunk in &stats.chunks {
            let Some(id) = chunk.id.as_ref().and_then(|id| self.chunk_id(id)) else {
                continue;
            };
            let parents: Vec<_> = chunk.parents.iter().filter_map(|p| self.chunk_id(p)).collect();
            for parent in parents {
                self.graph.chunk_graph.link_chunks(parent, id);
            }
            let children: Vec<_> = chunk.children.iter().filter_map(|c| self.chunk_id(c)).collect();
            for child in children {
                self.graph.chunk_graph.link_chunks(id, child);
            }
        }
    }

    pub(super) fn add_assets(&mut self, stats: &StatsCompilation) {
        for asset in &stats.assets {
            if asset.is_placeholder() || asset.name.is_empty() {
                self.report.assets_skipped += 1;
                continue;
            }
            let chunk_graph = &mut self.graph.chunk_graph;
            let id = chunk_graph.ensure_asset(&asset.name, asset.size);
            if let (Some(content), Some(a)) = (&asset.content, chunk_graph.asset_mut(id)) {
                if a.content.as_deref() != Some(content.as_str()) {
                    a.content = Some(content.clone());
                    a.gzip_size = None;
                }
            }
            for chunk in &asset.chunks {
                match self.chunk_id(chunk) {
                    Some(chunk) => self.graph.chunk_graph.link_asset(chunk, id),
                    None => tracing::debug!(asset = %asset.name, chunk = %chunk, "asset chunk not found"),
                }
            }
        }
        self.report.assets = self.graph.chunk_graph.asset_count();
    }

    pub(super) fn add_entrypoints(&mut self, stats: &StatsCompilation) {
        for (key, entry) in &stats.entrypoints {
            let name = entry.name.as_deref().unwrap_or(key);
            let id = self.graph.chunk_graph.ensure_entrypoint(name);
            let chunks: Vec<_> = entry.chunks.iter().filter_map(|c| self.chunk_id(c)).collect();
            for chunk in chunks {
                self.graph.chunk_graph.link_entrypoint_chunk(id, chunk);
            }
            for asset in &entry.assets {
                if let Some(asset) = self.graph.chunk_graph.asset_id_by_path(asset.name()) {
                    self.graph.chunk_graph.link_entrypoint_asset(id, asset);
                }
            }
        }
    }

    pub(super) fn chunk_id(&self, render_id: &StatsId) -> Option<ChunkId> {
        self.graph
            .chunk_graph
            .chunk_by_render_id(&render_id.to_string())
            .map(|c| c.id)
    }
}
