//! Chunks, assets and entrypoints of one build.

use rustc_hash::FxHashMap;

use crate::chunk::{Asset, Chunk, EntryPoint};
use crate::collections::FxIndexMap;
use crate::ids::{AssetId, ChunkId, EntryPointId, IdCounter, ModuleId};
use crate::module::push_unique;

/// Arena of chunks, assets and entrypoints with lookup indexes.
#[derive(Debug, Clone, Default)]
pub struct ChunkGraph {
    chunks: FxIndexMap<ChunkId, Chunk>,
    assets: FxIndexMap<AssetId, Asset>,
    entrypoints: FxIndexMap<EntryPointId, EntryPoint>,
    chunk_by_render_id: FxHashMap<String, ChunkId>,
    asset_by_path: FxHashMap<String, AssetId>,
    entrypoint_by_name: FxHashMap<String, EntryPointId>,
    chunk_ids: IdCounter,
    asset_ids: IdCounter,
    entrypoint_ids: IdCounter,
}

impl ChunkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the chunk with `render_id`, creating it when missing.
    pub fn ensure_chunk(&mut self, render_id: &str, name: &str) -> ChunkId {
        if let Some(id) = self.chunk_by_render_id.get(render_id) {
            let id = *id;
            if let Some(chunk) = self.chunks.get_mut(&id) {
                if chunk.name.is_empty() && !name.is_empty() {
                    chunk.name = name.to_string();
                }
            }
            return id;
        }
        let id: ChunkId = self.chunk_ids.next_id();
        self.chunks.insert(id, Chunk::new(id, render_id, name));
        self.chunk_by_render_id.insert(render_id.to_string(), id);
        id
    }

    /// Return the asset at `path`, creating it when missing. The size is
    /// refreshed when a non-zero figure is supplied.
    pub fn ensure_asset(&mut self, path: &str, size: u64) -> AssetId {
        if let Some(id) = self.asset_by_path.get(path) {
            let id = *id;
            if let Some(asset) = self.assets.get_mut(&id) {
                if size > 0 {
                    asset.size = size;
                }
            }
            return id;
        }
        let id: AssetId = self.asset_ids.next_id();
        self.assets.insert(id, Asset::new(id, path, size));
        self.asset_by_path.insert(path.to_string(), id);
        id
    }

    pub fn ensure_entrypoint(&mut self, name: &str) -> EntryPointId {
        if let Some(id) = self.entrypoint_by_name.get(name) {
            return *id;
        }
        let id: EntryPointId = self.entrypoint_ids.next_id();
        self.entrypoints.insert(id, EntryPoint::new(id, name));
        self.entrypoint_by_name.insert(name.to_string(), id);
        id
    }

    /// Link an asset to a chunk in both directions.
    pub fn link_asset(&mut self, chunk: ChunkId, asset: AssetId) {
        if !self.assets.contains_key(&asset) {
            return;
        }
        let Some(c) = self.chunks.get_mut(&chunk) else {
            return;
        };
        c.add_asset(asset);
        if let Some(a) = self.assets.get_mut(&asset) {
            a.add_chunk(chunk);
        }
    }

    /// Record `parent` loading `child`.
    pub fn link_chunks(&mut self, parent: ChunkId, child: ChunkId) {
        if parent == child || !self.chunks.contains_key(&child) {
            return;
        }
        if let Some(p) = self.chunks.get_mut(&parent) {
            push_unique(&mut p.dependencies, child);
        } else {
            return;
        }
        if let Some(c) = self.chunks.get_mut(&child) {
            push_unique(&mut c.imported, parent);
        }
    }

    pub fn add_module_to_chunk(&mut self, chunk: ChunkId, module: ModuleId) -> bool {
        self.chunks
            .get_mut(&chunk)
            .is_some_and(|c| c.add_module(module))
    }

    /// Attach a chunk to an entrypoint, pulling in the chunk's assets.
    pub fn link_entrypoint_chunk(&mut self, entry: EntryPointId, chunk: ChunkId) {
        let assets = match self.chunks.get(&chunk) {
            Some(c) => c.assets.clone(),
            None => return,
        };
        let Some(ep) = self.entrypoints.get_mut(&entry) else {
            return;
        };
        push_unique(&mut ep.chunks, chunk);
        for asset in assets {
            push_unique(&mut ep.assets, asset);
        }
        self.refresh_entrypoint_size(entry);
    }

    pub fn link_entrypoint_asset(&mut self, entry: EntryPointId, asset: AssetId) {
        if !self.assets.contains_key(&asset) {
            return;
        }
        if let Some(ep) = self.entrypoints.get_mut(&entry) {
            push_unique(&mut ep.assets, asset);
        }
        self.refresh_entrypoint_size(entry);
    }

    fn refresh_entrypoint_size(&mut self, entry: EntryPointId) {
        let Some(ep) = self.entrypoints.get(&entry) else {
            return;
        };
        let size = ep
            .assets
            .iter()
            .filter_map(|id| self.assets.get(id))
            .map(|a| a.size)
            .sum();
        if let Some(ep) = self.entrypoints.get_mut(&entry) {
            ep.size = size;
        }
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(&id)
    }

    pub fn chunk_mut(&mut self, id: ChunkId) -> Option<&mut Chunk> {
        self.chunks.get_mut(&id)
    }

    pub fn chunk_by_render_id(&self, render_id: &str) -> Option<&Chunk> {
        self.chunk_by_render_id
            .get(render_id)
            .and_then(|id| self.chunks.get(id))
    }

    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn asset_mut(&mut self, id: AssetId) -> Option<&mut Asset> {
        self.assets.get_mut(&id)
    }

    pub fn asset_by_path(&self, path: &str) -> Option<&Asset> {
        self.asset_by_path
            .get(path)
            .and_then(|id| self.assets.get(id))
    }

    pub fn asset_id_by_path(&self, path: &str) -> Option<AssetId> {
        self.asset_by_path.get(path).copied()
    }

    pub fn entrypoint(&self, id: EntryPointId) -> Option<&EntryPoint> {
        self.entrypoints.get(&id)
    }

    pub fn entrypoint_by_name(&self, name: &str) -> Option<&EntryPoint> {
        self.entrypoint_by_name
            .get(name)
            .and_then(|id| self.entrypoints.get(id))
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn assets_mut(&mut self) -> impl Iterator<Item = &mut Asset> {
        self.assets.values_mut()
    }

    pub fn entrypoints(&self) -> impl Iterator<Item = &EntryPoint> {
        self.entrypoints.values()
    }

    /// Chunks an asset belongs to.
    pub fn chunks_of_asset(&self, asset: AssetId) -> Vec<&Chunk> {
        self.assets
            .get(&asset)
            .map(|a| a.chunks.iter().filter_map(|c| self.chunks.get(c)).collect())
            .unwrap_or_default()
    }

    /// Whether an asset is loaded eagerly, i.e. belongs to an initial chunk.
    pub fn is_initial_asset(&self, asset: &Asset) -> bool {
        asset
            .chunks
            .iter()
            .filter_map(|c| self.chunks.get(c))
            .any(|c| c.initial)
    }

    pub fn initial_assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values().filter(|a| self.is_initial_asset(a))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn entrypoint_count(&self) -> usize {
        self.entrypoints.len()
    }

    /// Insert records verbatim, keeping their ids.
    pub(crate) fn restore(
        chunks: Vec<Chunk>,
        assets: Vec<Asset>,
        entrypoints: Vec<EntryPoint>,
    ) -> Self {
        let mut graph = Self::new();
        for chunk in chunks {
            graph.chunk_ids.observe(chunk.id.raw());
            graph
                .chunk_by_render_id
                .insert(chunk.render_id.clone(), chunk.id);
            graph.chunks.insert(chunk.id, chunk);
        }
        for asset in assets {
            graph.asset_ids.observe(asset.id.raw());
            graph.asset_by_path.insert(asset.path.clone(), asset.id);
            graph.assets.insert(asset.id, asset);
        }
        for ep in entrypoints {
            graph.entrypoint_ids.observe(ep.id.raw());
            graph.entrypoint_by_name.insert(ep.name.clone(), ep.id);
            graph.entrypoints.insert(ep.id, ep);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_chunk_is_idempotent() {
        let mut graph = ChunkGraph::new();
        let a = graph.ensure_chunk("0", "");
        let b = graph.ensure_chunk("0", "main");
        assert_eq!(a, b);
        assert_eq!(graph.chunk_count(), 1);
        assert_eq!(graph.chunk(a).unwrap().name, "main");
    }

    #[test]
    fn test_link_asset_both_directions() {
        let mut graph = ChunkGraph::new();
        let chunk = graph.ensure_chunk("0", "main");
        let asset = graph.ensure_asset("main.js", 120);
        graph.link_asset(chunk, asset);
        graph.link_asset(chunk, asset);

        assert_eq!(graph.chunk(chunk).unwrap().assets, vec![asset]);
        assert_eq!(graph.asset(asset).unwrap().chunks, vec![chunk]);
    }

    #[test]
    fn test_initial_assets() {
        let mut graph = ChunkGraph::new();
        let main = graph.ensure_chunk("0", "main");
        let lazy = graph.ensure_chunk("1", "lazy");
        graph.chunk_mut(main).unwrap().initial = true;
        let a = graph.ensure_asset("main.js", 10);
        let b = graph.ensure_asset("lazy.js", 10);
        graph.link_asset(main, a);
        graph.link_asset(lazy, b);
        graph.link_chunks(main, lazy);

        let initial: Vec<_> = graph.initial_assets().map(|a| a.path.as_str()).collect();
        assert_eq!(initial, vec!["main.js"]);
        assert_eq!(graph.chunk(lazy).unwrap().imported, vec![main]);
    }

    #[test]
    fn test_entrypoint_size_sums_assets() {
        let mut graph = ChunkGraph::new();
        let chunk = graph.ensure_chunk("0", "main");
        let a = graph.ensure_asset("main.js", 100);
        let b = graph.ensure_asset("main.css", 20);
        graph.link_asset(chunk, a);
        graph.link_asset(chunk, b);
        let ep = graph.ensure_entrypoint("main");
        graph.link_entrypoint_chunk(ep, chunk);
        assert_eq!(graph.entrypoint(ep).unwrap().size, 120);
    }
}
