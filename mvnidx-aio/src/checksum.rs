// mvnidx-aio/src/checksum.rs
use std::path::Path;
use std::sync::Arc;

use mvnidx_common::error::{IdxError, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// SHA256 of a file as lowercase hex, together with the number of bytes
/// hashed.
pub fn sha256_file(path: &Path) -> Result<(String, u64)> {
    debug!("Calculating SHA256 for: {}", path.display());
    let std_file = std::fs::File::open(path).map_err(|e| IdxError::Io(Arc::new(e)))?;
    let mut std_reader = std::io::BufReader::new(std_file);
    let mut hasher = Sha256::new();
    let bytes_copied = std::io::copy(&mut std_reader, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());

    debug!("Calculated SHA256: {} ({} bytes read)", actual, bytes_copied);
    Ok((actual, bytes_copied))
}
