// mvnidx-core/src/lib.rs
// Dependency closure resolution and the persisted resource index built
// from it.

pub mod index;
pub mod repository;
pub mod resolve;
pub mod resource;

pub use index::{CoordinatesRepository, IndexCodec, IndexStore, IndexedRepository, JsonIndexCodec};
pub use repository::{ArtifactRepository, ResourceBuilder};
pub use resolve::{ClosureResolver, ResolveStats, ResolvedClosure};
pub use resource::FileResourceBuilder;
