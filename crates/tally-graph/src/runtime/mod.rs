//! File access capability used by the package graph builder.
//!
//! The graph never touches the filesystem directly. Callers inject a
//! [`Runtime`]; [`NativeRuntime`](native::NativeRuntime) wraps `std::fs` and the
//! in-memory [`MemoryRuntime`](test_utils::MemoryRuntime) backs tests.

#[cfg(not(target_family = "wasm"))]
pub mod native;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors that can occur during runtime operations
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Other runtime error
    #[error("Runtime error: {0}")]
    Other(String),
}

/// File metadata
#[derive(Debug, Clone, Copy)]
pub struct FileMetadata {
    /// File size in bytes
    pub size: u64,
    pub is_file: bool,
}

/// Platform file access.
///
/// Implementations may be slow or fallible; callers memoize what they read.
#[cfg_attr(target_family = "wasm", async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait)]
pub trait Runtime: Send + Sync + std::fmt::Debug {
    /// Read a file
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>>;

    /// Get file metadata
    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;
}

#[cfg_attr(target_family = "wasm", async_trait(?Send))]
#[cfg_attr(not(target_family = "wasm"), async_trait)]
impl<T: Runtime + ?Sized> Runtime for Arc<T> {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        (**self).read_file(path).await
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        (**self).metadata(path).await
    }

    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }
}
