// mvnidx-core/src/resolve/mod.rs
pub mod binder;
pub mod coordinator;
pub mod sets;
pub mod worker;

pub use binder::{bind_to_version, select_highest, BindOutcome};
pub use coordinator::{ClosureResolver, ResolveStats, ResolvedClosure, DEFAULT_MAX_PARALLEL};
pub use sets::{RevisionSets, RevisionState};
