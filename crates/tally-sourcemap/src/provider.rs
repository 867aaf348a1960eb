//! Where source maps come from.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tally_graph::{Runtime, RuntimeError, RuntimeResult};

/// A fetched map and the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMapFile {
    pub json: String,
    /// Location of the map; relative sources resolve against its directory.
    pub path: Option<PathBuf>,
}

/// Source-map fetch capability.
///
/// Implementations may be slow or fail; a failure only disables map driven
/// attribution for that asset.
#[cfg_attr(target_family = "wasm", async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait)]
pub trait SourceMapProvider: Send + Sync {
    /// The map for `asset`, whose emitted text is `content`. `Ok(None)` when
    /// the asset has no map.
    async fn source_map(&self, asset: &str, content: &str) -> RuntimeResult<Option<SourceMapFile>>;
}

/// Reads maps next to emitted assets in an output directory.
///
/// The `sourceMappingURL` comment is honoured when it names a file; otherwise
/// `<asset>.map` is tried. Inline `data:` maps are not decoded.
#[derive(Debug)]
pub struct OutputDirProvider<R: Runtime> {
    runtime: R,
    output_dir: PathBuf,
}

impl<R: Runtime> OutputDirProvider<R> {
    pub fn new(runtime: R, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn candidates(&self, asset: &str, content: &str) -> Vec<PathBuf> {
        let asset_path = self.output_dir.join(asset);
        let mut candidates = Vec::with_capacity(2);
        if let Some(url) = mapping_url(content) {
            let dir = asset_path.parent().unwrap_or(&self.output_dir);
            candidates.push(path_clean::clean(dir.join(url)));
        }
        let mut default = asset_path.into_os_string();
        default.push(".map");
        let default = PathBuf::from(default);
        if !candidates.contains(&default) {
            candidates.push(default);
        }
        candidates
    }
}

#[cfg_attr(target_family = "wasm", async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait)]
impl<R: Runtime> SourceMapProvider for OutputDirProvider<R> {
    async fn source_map(&self, asset: &str, content: &str) -> RuntimeResult<Option<SourceMapFile>> {
        for candidate in self.candidates(asset, content) {
            if !self.runtime.exists(&candidate) {
                continue;
            }
            let bytes = self.runtime.read_file(&candidate).await?;
            let json = String::from_utf8(bytes)
                .map_err(|e| RuntimeError::Io(format!("{}: {e}", candidate.display())))?;
            return Ok(Some(SourceMapFile {
                json,
                path: Some(candidate),
            }));
        }
        Ok(None)
    }
}

/// Maps already held in memory, keyed by asset path.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    maps: FxHashMap<String, SourceMapFile>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, asset: impl Into<String>, json: impl Into<String>) -> Self {
        self.insert(asset, json, None);
        self
    }

    pub fn insert(&mut self, asset: impl Into<String>, json: impl Into<String>, path: Option<PathBuf>) {
        self.maps.insert(
            asset.into(),
            SourceMapFile {
                json: json.into(),
                path,
            },
        );
    }
}

#[cfg_attr(target_family = "wasm", async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait)]
impl SourceMapProvider for InMemoryProvider {
    async fn source_map(&self, asset: &str, _content: &str) -> RuntimeResult<Option<SourceMapFile>> {
        Ok(self.maps.get(asset).cloned())
    }
}

/// File named by the last `sourceMappingURL` comment, if it is not inline.
fn mapping_url(content: &str) -> Option<&str> {
    const MARKER: &str = "sourceMappingURL=";
    let start = content.rfind(MARKER)? + MARKER.len();
    let url = content[start..]
        .split(|c: char| c.is_whitespace() || c == '*')
        .next()?
        .trim();
    if url.is_empty() || url.starts_with("data:") || url.contains("://") {
        return None;
    }
    Some(url.split_once('?').map_or(url, |(path, _)| path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_graph::test_utils::MemoryRuntime;

    #[test]
    fn test_mapping_url() {
        assert_eq!(mapping_url("x\n//# sourceMappingURL=main.js.map\n"), Some("main.js.map"));
        assert_eq!(mapping_url("x\n/*# sourceMappingURL=maps/a.map */"), Some("maps/a.map"));
        assert_eq!(
            mapping_url("//# sourceMappingURL=data:application/json;base64,e30="),
            None
        );
        assert_eq!(mapping_url("no map here"), None);
    }

    #[tokio::test]
    async fn test_output_dir_prefers_mapping_url() {
        let runtime = MemoryRuntime::new()
            .with_file("/out/maps/main.map", r#"{"version":3}"#)
            .with_file("/out/main.js.map", r#"{"version":3,"file":"x"}"#);
        let provider = OutputDirProvider::new(runtime, "/out");

        let file = provider
            .source_map("main.js", "//# sourceMappingURL=maps/main.map")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.path.as_deref(), Some(Path::new("/out/maps/main.map")));

        let file = provider.source_map("main.js", "").await.unwrap().unwrap();
        assert_eq!(file.path.as_deref(), Some(Path::new("/out/main.js.map")));

        assert!(provider.source_map("other.js", "").await.unwrap().is_none());
    }
}
