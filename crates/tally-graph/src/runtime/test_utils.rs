//! In-memory runtime for tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// A fixed set of files held in memory.
///
/// Counts reads so tests can assert that callers memoize.
#[derive(Debug, Default)]
pub struct MemoryRuntime {
    files: RwLock<FxHashMap<PathBuf, Vec<u8>>>,
    reads: AtomicUsize,
}

impl MemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.write().insert(path.into(), content.into());
    }

    /// Number of `read_file` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.read().get(path).cloned()
    }
}

#[async_trait]
impl Runtime for MemoryRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.get(path)
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        self.get(path)
            .map(|bytes| FileMetadata {
                size: bytes.len() as u64,
                is_file: true,
            })
            .ok_or_else(|| RuntimeError::FileNotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[tokio::test]
    async fn test_files_stay_usable_after_a_panicking_writer() {
        let runtime = MemoryRuntime::new().with_file("/app/package.json", "{}");

        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = runtime.files.write();
            panic!("writer failed");
        }));
        assert!(result.is_err());

        runtime.insert("/app/index.js", "export {}");
        assert!(runtime.exists(Path::new("/app/package.json")));
        assert_eq!(
            runtime.read_file(Path::new("/app/index.js")).await.unwrap(),
            b"export {}"
        );
        assert_eq!(runtime.reads(), 1);
    }
}
