use serde::{Deserialize, Serialize};

use crate::gzip::gzip_size;
use crate::ids::{AssetId, ChunkId, EntryPointId, ModuleId};
use crate::module::push_unique;

/// A bundler output unit holding modules and producing assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    /// Id as printed by the bundler.
    pub render_id: String,
    pub name: String,
    pub size: u64,
    /// Loaded eagerly with the page.
    pub initial: bool,
    pub entry: bool,
    pub modules: Vec<ModuleId>,
    pub assets: Vec<AssetId>,
    /// Child chunks loaded by this one.
    pub dependencies: Vec<ChunkId>,
    /// Parent chunks that load this one.
    pub imported: Vec<ChunkId>,
}

impl Chunk {
    pub fn new(id: ChunkId, render_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            render_id: render_id.into(),
            name: name.into(),
            size: 0,
            initial: false,
            entry: false,
            modules: Vec::new(),
            assets: Vec::new(),
            dependencies: Vec::new(),
            imported: Vec::new(),
        }
    }

    /// Name to show for the chunk: its name, else its render id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.render_id
        } else {
            &self.name
        }
    }

    pub fn add_module(&mut self, module: ModuleId) -> bool {
        push_unique(&mut self.modules, module)
    }

    pub fn add_asset(&mut self, asset: AssetId) -> bool {
        push_unique(&mut self.assets, asset)
    }
}

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    /// Output path relative to the output directory.
    pub path: String,
    pub size: u64,
    pub gzip_size: Option<u64>,
    /// Full text; `None` when elided or not captured.
    pub content: Option<String>,
    pub chunks: Vec<ChunkId>,
}

impl Asset {
    pub fn new(id: AssetId, path: impl Into<String>, size: u64) -> Self {
        Self {
            id,
            path: path.into(),
            size,
            gzip_size: None,
            content: None,
            chunks: Vec::new(),
        }
    }

    /// File extension without the dot, lowercased.
    pub fn extension(&self) -> Option<String> {
        path_extension(&self.path)
    }

    /// Gzip size of the content, computed on first request.
    pub fn ensure_gzip_size(&mut self) -> Option<u64> {
        if self.gzip_size.is_none() {
            self.gzip_size = self
                .content
                .as_deref()
                .and_then(|content| gzip_size(content.as_bytes()));
        }
        self.gzip_size
    }

    pub fn add_chunk(&mut self, chunk: ChunkId) -> bool {
        push_unique(&mut self.chunks, chunk)
    }
}

/// A named build entry aggregating its chunks and assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub id: EntryPointId,
    pub name: String,
    pub chunks: Vec<ChunkId>,
    pub assets: Vec<AssetId>,
    /// Sum of the entry's asset sizes.
    pub size: u64,
}

impl EntryPoint {
    pub fn new(id: EntryPointId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            chunks: Vec::new(),
            assets: Vec::new(),
            size: 0,
        }
    }
}

/// Extension of an emitted file path, ignoring any query or fragment.
pub fn path_extension(path: &str) -> Option<String> {
    let name = path.split(['?', '#']).next().unwrap_or(path);
    let file = name.rsplit('/').next().unwrap_or(name);
    file.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        let asset = Asset::new(AssetId::new(1), "static/js/app.3f2a9c1b.JS", 10);
        assert_eq!(asset.extension().as_deref(), Some("js"));

        let asset = Asset::new(AssetId::new(2), "font.woff2?v=3", 10);
        assert_eq!(asset.extension().as_deref(), Some("woff2"));

        let asset = Asset::new(AssetId::new(3), "LICENSE", 10);
        assert_eq!(asset.extension(), None);
    }

    #[test]
    fn test_gzip_size_computed_once() {
        let mut asset = Asset::new(AssetId::new(1), "a.js", 100);
        assert_eq!(asset.ensure_gzip_size(), None);

        asset.content = Some("console.log('hello');".repeat(20));
        let size = asset.ensure_gzip_size().unwrap();
        assert!(size > 0);
        assert!(size < 420);
        assert_eq!(asset.gzip_size, Some(size));
    }

    #[test]
    fn test_chunk_display_name_falls_back_to_render_id() {
        let chunk = Chunk::new(ChunkId::new(1), "179", "");
        assert_eq!(chunk.display_name(), "179");
        let chunk = Chunk::new(ChunkId::new(2), "0", "main");
        assert_eq!(chunk.display_name(), "main");
    }
}

