//! Native filesystem runtime.

use async_trait::async_trait;
use std::path::Path;
use tokio::task;

use super::{FileMetadata, Runtime, RuntimeError, RuntimeResult};

/// `std::fs` behind `spawn_blocking`, so reads never stall the executor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRuntime;

impl NativeRuntime {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path, err: std::io::Error) -> RuntimeError {
    if err.kind() == std::io::ErrorKind::NotFound {
        RuntimeError::FileNotFound(path.to_path_buf())
    } else {
        RuntimeError::Io(format!("Failed to read {}: {}", path.display(), err))
    }
}

#[async_trait]
impl Runtime for NativeRuntime {
    async fn read_file(&self, path: &Path) -> RuntimeResult<Vec<u8>> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || std::fs::read(&path).map_err(|e| io_error(&path, e)))
            .await
            .map_err(|e| RuntimeError::Other(format!("Task join error: {}", e)))?
    }

    async fn metadata(&self, path: &Path) -> RuntimeResult<FileMetadata> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || {
            let metadata = std::fs::metadata(&path).map_err(|e| io_error(&path, e))?;
            Ok(FileMetadata {
                size: metadata.len(),
                is_file: metadata.is_file(),
            })
        })
        .await
        .map_err(|e| RuntimeError::Other(format!("Task join error: {}", e)))?
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
