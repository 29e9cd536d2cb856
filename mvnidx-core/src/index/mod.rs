// mvnidx-core/src/index/mod.rs
pub mod codec;
pub mod coordinates;
pub mod store;

use mvnidx_common::error::Result;

pub use codec::{IndexCodec, IndexFile, JsonIndexCodec};
pub use coordinates::CoordinatesRepository;
pub use store::IndexStore;

/// A repository whose content is the dependency closure of some seeds.
pub trait IndexedRepository {
    /// Recomputes the closure and persists it. Returns `false` if there was
    /// nothing to refresh from.
    fn refresh(&mut self) -> Result<bool>;
}
