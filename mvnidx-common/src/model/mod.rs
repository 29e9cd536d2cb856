// mvnidx-common/src/model/mod.rs
// Declares the modules within the model directory.
pub mod archive;
pub mod dependency;
pub mod resource;
pub mod revision;

// Re-export
pub use archive::Archive;
pub use dependency::{BuildDescriptor, Dependency, Scope};
pub use resource::{AttributeValue, Capability, Requirement, ResourceDescriptor};
pub use revision::{Program, Revision};
