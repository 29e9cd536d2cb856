// mvnidx-core/src/resource.rs
// Default resource builder: describes an archive by its content.

use std::path::Path;

use mvnidx_aio as aio;
use mvnidx_common::error::{IdxError, Result};
use mvnidx_common::model::resource::{
    AttributeValue, Capability, CONTENT_NAMESPACE, IDENTITY_NAMESPACE, INFORMATION_NAMESPACE,
    INFO_FROM, INFO_NAME,
};
use mvnidx_common::model::archive::DEFAULT_EXTENSION;
use mvnidx_common::model::{Archive, ResourceDescriptor};
use tracing::debug;
use url::Url;

use crate::repository::ResourceBuilder;

const JAR_MIME: &str = "application/vnd.osgi.bundle";
const DEFAULT_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, Default)]
pub struct FileResourceBuilder;

impl FileResourceBuilder {
    pub fn new() -> Self {
        Self
    }
}

fn mime_type(archive: &Archive) -> &'static str {
    if archive.extension == DEFAULT_EXTENSION {
        JAR_MIME
    } else {
        DEFAULT_MIME
    }
}

impl ResourceBuilder for FileResourceBuilder {
    fn build(&self, file: &Path, archive: &Archive) -> Result<ResourceDescriptor> {
        if !aio::is_regular_file(file) {
            return Err(IdxError::Resource(
                archive.to_string(),
                format!("{} is not a regular file", file.display()),
            ));
        }
        let absolute = std::fs::canonicalize(file)?;
        let url = Url::from_file_path(&absolute).map_err(|()| {
            IdxError::Resource(
                archive.to_string(),
                format!("cannot express {} as URL", absolute.display()),
            )
        })?;
        let (digest, size) = aio::sha256_file(&absolute)?;
        debug!("[{}] sha256 {} ({} bytes)", archive, digest, size);

        let revision = &archive.revision;
        let identity = Capability::new(IDENTITY_NAMESPACE)
            .attribute(IDENTITY_NAMESPACE, revision.program.to_string())
            .attribute(
                "version",
                AttributeValue::Version(revision.version.to_string()),
            )
            .attribute("type", "maven.artifact");
        let content = Capability::new(CONTENT_NAMESPACE)
            .attribute(CONTENT_NAMESPACE, digest)
            .attribute("url", url.to_string())
            .attribute("size", i64::try_from(size).unwrap_or(i64::MAX))
            .attribute("mime", mime_type(archive));
        let info = Capability::new(INFORMATION_NAMESPACE)
            .attribute(INFO_NAME, archive.to_string())
            .attribute(INFO_FROM, revision.to_string());

        Ok(ResourceDescriptor::new(
            vec![identity, content, info],
            Vec::new(),
        ))
    }
}
