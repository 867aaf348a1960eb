//! Gzip sizing for parsed module code and assets.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Compressed length of `bytes` at the default level.
///
/// Empty input and encoder failures yield `None`; callers leave the size unset
/// rather than failing the surrounding pass.
pub fn gzip_size(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    let result = encoder.write_all(bytes).and_then(|_| encoder.finish());
    match result {
        Ok(compressed) => Some(compressed.len() as u64),
        Err(err) => {
            tracing::debug!(error = %err, len = bytes.len(), "gzip sizing failed");
            None
        }
    }
}
