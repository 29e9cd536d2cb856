// mvnidx-aio/src/json_io.rs
use std::path::Path;
use std::sync::Arc;

use mvnidx_common::error::{IdxError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Serializes data as pretty-printed JSON and writes it atomically.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    debug!("Writing JSON to: {}", path.display());
    let json_bytes = serde_json::to_vec_pretty(data).map_err(|e| IdxError::Json(Arc::new(e)))?;
    crate::fs::atomic_write_file(path, &json_bytes)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Reading JSON from: {}", path.display());
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| IdxError::Json(Arc::new(e)))
}
