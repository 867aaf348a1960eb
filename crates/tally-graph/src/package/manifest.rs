//! Package manifest (`package.json`) reading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;
use crate::{Error, Result};

/// Maximum allowed size for package.json files (10MB)
const MAX_MANIFEST_SIZE: u64 = 10 * 1024 * 1024;

/// The fields of `package.json` the package graph needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Explicit package root; relative values are resolved against the build root.
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    /// File path this was loaded from
    #[serde(skip)]
    pub path: PathBuf,
}

impl Manifest {
    /// Load a manifest using the provided runtime.
    ///
    /// Files over 10MB, invalid UTF-8 and malformed JSON are rejected with
    /// [`Error::InvalidManifest`].
    pub async fn from_path<R: Runtime + ?Sized>(runtime: &R, path: &Path) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidManifest {
            path: path.to_path_buf(),
            reason,
        };

        let metadata = runtime.metadata(path).await?;
        if metadata.size > MAX_MANIFEST_SIZE {
            return Err(invalid(format!(
                "exceeds maximum size of {}MB",
                MAX_MANIFEST_SIZE / 1024 / 1024
            )));
        }

        let bytes = runtime.read_file(path).await?;
        let content =
            String::from_utf8(bytes).map_err(|e| invalid(format!("invalid UTF-8: {e}")))?;
        let mut manifest: Manifest =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        manifest.path = path.to_path_buf();
        Ok(manifest)
    }

    /// Name and version, when both are present and non-empty.
    pub fn identity(&self) -> Option<(&str, &str)> {
        let name = self.name.as_deref().filter(|n| !n.is_empty())?;
        let version = self.version.as_deref().filter(|v| !v.is_empty())?;
        Some((name, version))
    }

    /// Directory the package lives in.
    ///
    /// An explicit `root` wins; a relative one is joined to `build_root`.
    /// Otherwise the directory containing the manifest.
    pub fn package_root(&self, build_root: &Path) -> PathBuf {
        match self.root.as_deref().filter(|r| !r.is_empty()) {
            Some(root) => {
                let root = Path::new(root);
                if root.is_absolute() {
                    root.to_path_buf()
                } else {
                    path_clean::clean(build_root.join(root))
                }
            }
            None => self
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}
