// mvnidx-core/src/repository.rs
// Collaborators the resolver consumes. Transport, POM and metadata parsing
// live behind these traits.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mvnidx_common::error::Result;
use mvnidx_common::model::{Archive, BuildDescriptor, Program, ResourceDescriptor, Revision};

/// Access to a Maven repository (local cache plus remote backing sources).
pub trait ArtifactRepository: Send + Sync {
    /// The binary archive of a revision, `None` if the repository does not
    /// know it.
    fn resolve_archive(&self, revision: &Revision) -> Result<Option<Archive>>;

    /// Identifiers of the remote sources that may hold snapshot revisions.
    fn snapshot_sources(&self) -> Vec<String>;

    /// Last-updated timestamp of a revision's metadata at one source, `None`
    /// if the source does not have the revision.
    fn metadata_timestamp(&self, source: &str, revision: &Revision) -> Result<Option<DateTime<Utc>>>;

    /// Where the archive is (or would be) cached locally.
    fn local_file(&self, archive: &Archive) -> PathBuf;

    /// Makes the archive available locally, fetching it if necessary.
    fn fetch(&self, archive: &Archive) -> Result<PathBuf>;

    /// The revision's build descriptor, `None` if it has none.
    fn build_descriptor(&self, revision: &Revision) -> Result<Option<BuildDescriptor>>;

    /// Every revision of the program the repository knows about.
    fn available_revisions(&self, program: &Program) -> Result<Vec<Revision>>;
}

/// Turns a fetched archive file into a resource descriptor.
pub trait ResourceBuilder: Send + Sync {
    fn build(&self, file: &Path, archive: &Archive) -> Result<ResourceDescriptor>;
}
