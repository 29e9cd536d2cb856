// mvnidx-common/src/pipeline.rs
// Messages exchanged between resolution workers and the coordinator.

use crate::model::{ResourceDescriptor, Revision};

/// How a worker's run for one revision ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionOutcome {
    /// A resource descriptor was built.
    Indexed,
    /// The artifact could not be retrieved.
    Missing,
    /// The artifact was retrieved but no descriptor could be built.
    Failed,
    /// The worker panicked; nothing is known about the revision.
    Aborted,
}

#[derive(Debug, Clone)]
pub enum ResolveEvent {
    /// A dependency of `from` bound to `revision`.
    Discovered { from: Revision, revision: Revision },
    /// A dependency of `from` could not be bound to any known version.
    Unbound { from: Revision, dependency: String },
    /// Sent last for every dispatched revision, on every path.
    Finished {
        revision: Revision,
        outcome: RevisionOutcome,
        resource: Option<ResourceDescriptor>,
    },
}

impl ResolveEvent {
    pub fn finished(revision: Revision, resource: Option<ResourceDescriptor>, outcome: RevisionOutcome) -> Self {
        ResolveEvent::Finished {
            revision,
            outcome,
            resource,
        }
    }
}
