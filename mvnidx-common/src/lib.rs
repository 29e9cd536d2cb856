// mvnidx-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod version;

// Re-export key types
pub use config::Config;
pub use error::{IdxError, Result};
pub use model::{Archive, BuildDescriptor, Dependency, Program, ResourceDescriptor, Revision, Scope};
pub use version::{MavenVersion, VersionRange, VersionSpec};
