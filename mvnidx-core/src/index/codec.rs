// mvnidx-core/src/index/codec.rs
use std::path::Path;

use mvnidx_aio as aio;
use mvnidx_common::error::Result;
use mvnidx_common::model::ResourceDescriptor;
use serde::{Deserialize, Serialize};

/// Reads and writes the persisted index.
pub trait IndexCodec: Send + Sync {
    fn save(&self, path: &Path, name: &str, resources: &[ResourceDescriptor]) -> Result<()>;
    fn load(&self, path: &Path) -> Result<Vec<ResourceDescriptor>>;
}

/// On-disk layout of the JSON index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexFile {
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceDescriptor>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonIndexCodec;

impl IndexCodec for JsonIndexCodec {
    fn save(&self, path: &Path, name: &str, resources: &[ResourceDescriptor]) -> Result<()> {
        let file = IndexFile {
            name: name.to_string(),
            resources: resources.to_vec(),
        };
        aio::write_json(path, &file)
    }

    fn load(&self, path: &Path) -> Result<Vec<ResourceDescriptor>> {
        let file: IndexFile = aio::read_json(path)?;
        Ok(file.resources)
    }
}
