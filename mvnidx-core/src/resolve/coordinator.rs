// mvnidx-core/src/resolve/coordinator.rs
// Computes the dependency closure of a set of seed revisions with a bounded
// number of concurrent workers.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use mvnidx_common::error::{IdxError, Result};
use mvnidx_common::model::{ResourceDescriptor, Revision};
use mvnidx_common::pipeline::{ResolveEvent, RevisionOutcome};
use threadpool::ThreadPool;
use tracing::{debug, info, instrument, warn};

use super::sets::RevisionSets;
use super::worker;
use crate::repository::{ArtifactRepository, ResourceBuilder};

pub const DEFAULT_MAX_PARALLEL: usize = mvnidx_common::config::DEFAULT_MAX_PARALLEL;

/// Counters of one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub seeded: usize,
    pub dispatched: usize,
    pub indexed: usize,
    pub missing: usize,
    pub failed: usize,
    pub aborted: usize,
    pub unbound: usize,
    /// Most revisions in flight at the same time.
    pub peak_in_flight: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedClosure {
    pub resources: HashSet<ResourceDescriptor>,
    pub stats: ResolveStats,
}

/// Owns the revision sets of a run. Workers only talk back through the
/// event channel, so all bookkeeping happens on the calling thread.
pub struct ClosureResolver {
    repository: Arc<dyn ArtifactRepository>,
    builder: Arc<dyn ResourceBuilder>,
    max_parallel: usize,
    sets: RevisionSets,
}

impl ClosureResolver {
    pub fn new(
        repository: Arc<dyn ArtifactRepository>,
        builder: Arc<dyn ResourceBuilder>,
        max_parallel: usize,
    ) -> Self {
        Self {
            repository,
            builder,
            max_parallel: max_parallel.max(1),
            sets: RevisionSets::new(),
        }
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    pub fn repository(&self) -> &Arc<dyn ArtifactRepository> {
        &self.repository
    }

    /// Processes every seed and, transitively, every revision their
    /// compile and runtime dependencies bind to. Each revision is processed
    /// once. Returns after nothing is pending or in flight.
    #[instrument(skip_all, name = "closure_resolver", fields(max_parallel = self.max_parallel))]
    pub fn resolve<I>(&mut self, seeds: I) -> Result<ResolvedClosure>
    where
        I: IntoIterator<Item = Revision>,
    {
        let start_time = Instant::now();
        self.sets.clear();
        let mut closure = ResolvedClosure::default();
        closure.stats.seeded = self.sets.seed(seeds);
        debug!("Resolving closure of {} seed revision(s)", closure.stats.seeded);

        let pool = ThreadPool::with_name("mvnidx-resolver".to_string(), self.max_parallel);
        let (event_tx, event_rx) = crossbeam_channel::unbounded::<ResolveEvent>();

        let result = self.run(&pool, &event_tx, &event_rx, &mut closure);
        drop(event_tx);
        pool.join();
        self.sets.clear_done();
        result?;

        let elapsed = Duration::from_millis(start_time.elapsed().as_millis() as u64);
        info!(
            "Resolved {} revision(s) into {} resource(s) in {} ({} missing, {} failed, {} unbound)",
            closure.stats.dispatched,
            closure.resources.len(),
            humantime::format_duration(elapsed),
            closure.stats.missing,
            closure.stats.failed + closure.stats.aborted,
            closure.stats.unbound
        );
        Ok(closure)
    }

    fn run(
        &mut self,
        pool: &ThreadPool,
        event_tx: &Sender<ResolveEvent>,
        event_rx: &Receiver<ResolveEvent>,
        closure: &mut ResolvedClosure,
    ) -> Result<()> {
        while !self.sets.is_settled() {
            while let Some(revision) = self.sets.start_next(self.max_parallel) {
                self.dispatch(pool, event_tx, revision);
                closure.stats.dispatched += 1;
            }
            closure.stats.peak_in_flight = closure
                .stats
                .peak_in_flight
                .max(self.sets.in_flight_len());

            // Something is in flight here, otherwise the loop above would
            // have dispatched or the sets would be settled.
            let event = event_rx.recv().map_err(|_| {
                IdxError::Generic("Resolution workers disconnected unexpectedly".to_string())
            })?;
            self.apply(event, closure);
            while let Ok(event) = event_rx.try_recv() {
                self.apply(event, closure);
            }
        }
        Ok(())
    }

    fn dispatch(&self, pool: &ThreadPool, event_tx: &Sender<ResolveEvent>, revision: Revision) {
        debug!("[{}] Submitting revision to worker pool", revision);
        let repository = Arc::clone(&self.repository);
        let builder = Arc::clone(&self.builder);
        let event_tx = event_tx.clone();
        pool.execute(move || {
            worker::process_revision(revision, repository.as_ref(), builder.as_ref(), &event_tx);
        });
    }

    /// Events of one worker arrive in send order, so the dependencies of a
    /// revision are pending before it leaves the in-flight set.
    fn apply(&mut self, event: ResolveEvent, closure: &mut ResolvedClosure) {
        match event {
            ResolveEvent::Discovered { from, revision } => {
                if self.sets.is_known(&revision) {
                    return;
                }
                debug!("Added as dependency {} (from {})", revision, from);
                self.sets.offer(revision);
            }
            ResolveEvent::Unbound { from, dependency } => {
                debug!("Skipping unbound dependency {} of {}", dependency, from);
                closure.stats.unbound += 1;
            }
            ResolveEvent::Finished {
                revision,
                outcome,
                resource,
            } => {
                if !self.sets.finish(&revision) {
                    warn!("[{}] Completion reported for a revision not in flight", revision);
                }
                match outcome {
                    RevisionOutcome::Indexed => closure.stats.indexed += 1,
                    RevisionOutcome::Missing => closure.stats.missing += 1,
                    RevisionOutcome::Failed => closure.stats.failed += 1,
                    RevisionOutcome::Aborted => {
                        warn!("[{}] Worker aborted", revision);
                        closure.stats.aborted += 1;
                    }
                }
                if let Some(resource) = resource {
                    closure.resources.insert(resource);
                }
            }
        }
    }
}

impl std::fmt::Debug for ClosureResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureResolver")
            .field("max_parallel", &self.max_parallel)
            .field("sets", &self.sets)
            .finish_non_exhaustive()
    }
}
