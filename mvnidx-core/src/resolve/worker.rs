// mvnidx-core/src/resolve/worker.rs
// Processing of a single revision: invalidate stale snapshots, report the
// dependencies it declares, build its resource descriptor.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use mvnidx_aio as aio;
use mvnidx_common::error::Result;
use mvnidx_common::model::{Archive, ResourceDescriptor, Revision, Scope};
use mvnidx_common::pipeline::{ResolveEvent, RevisionOutcome};
use tracing::{debug, error, instrument, warn};

use super::binder::{bind_to_version, BindOutcome};
use crate::repository::{ArtifactRepository, ResourceBuilder};

/// Reports completion when dropped, so the coordinator hears about the
/// revision on every exit path, unwinding included.
struct CompletionGuard<'a> {
    revision: Option<Revision>,
    events: &'a Sender<ResolveEvent>,
    outcome: RevisionOutcome,
    resource: Option<ResourceDescriptor>,
}

impl<'a> CompletionGuard<'a> {
    fn new(revision: Revision, events: &'a Sender<ResolveEvent>) -> Self {
        Self {
            revision: Some(revision),
            events,
            outcome: RevisionOutcome::Aborted,
            resource: None,
        }
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if let Some(revision) = self.revision.take() {
            debug!("[{}] Finished with outcome {:?}", revision, self.outcome);
            let _ = self.events.send(ResolveEvent::finished(
                revision,
                self.resource.take(),
                self.outcome,
            ));
        }
    }
}

/// Processes one revision. Never fails: problems are logged and end up in
/// the outcome of the `Finished` event, which is always the last event this
/// sends.
#[instrument(skip_all, fields(revision = %revision))]
pub fn process_revision(
    revision: Revision,
    repository: &dyn ArtifactRepository,
    builder: &dyn ResourceBuilder,
    events: &Sender<ResolveEvent>,
) {
    let mut guard = CompletionGuard::new(revision.clone(), events);
    let (outcome, resource) = index_revision(&revision, repository, builder, events);
    guard.outcome = outcome;
    guard.resource = resource;
}

fn index_revision(
    revision: &Revision,
    repository: &dyn ArtifactRepository,
    builder: &dyn ResourceBuilder,
    events: &Sender<ResolveEvent>,
) -> (RevisionOutcome, Option<ResourceDescriptor>) {
    let archive = match repository.resolve_archive(revision) {
        Ok(Some(archive)) => archive,
        Ok(None) => {
            debug!("[{}] Repository has no archive", revision);
            return (RevisionOutcome::Missing, None);
        }
        Err(e) => {
            warn!("[{}] Failed to resolve archive: {}", revision, e);
            return (RevisionOutcome::Missing, None);
        }
    };

    if archive.is_snapshot() {
        invalidate_stale_snapshot(&archive, repository);
    }

    // Dependencies first: a broken binary must not hide the rest of the graph.
    discover_dependencies(&archive.revision, repository, events);

    match build_resource(&archive, repository, builder) {
        Ok(resource) => (RevisionOutcome::Indexed, Some(resource)),
        Err(e) => {
            debug!("[{}] No resource built: {}", revision, e);
            (RevisionOutcome::Failed, None)
        }
    }
}

/// Deletes the cached archive and build descriptor if the first snapshot
/// source that knows the revision has newer metadata, so the next fetch
/// gets fresh files.
fn invalidate_stale_snapshot(archive: &Archive, repository: &dyn ArtifactRepository) {
    for source in repository.snapshot_sources() {
        let updated = match repository.metadata_timestamp(&source, &archive.revision) {
            Ok(Some(updated)) => updated,
            Ok(None) => continue,
            Err(e) => {
                warn!(
                    "[{}] Cannot read snapshot metadata from {}: {}",
                    archive.revision, source, e
                );
                continue;
            }
        };
        debug!(
            "[{}] Snapshot metadata at {} last updated {}",
            archive.revision, source, updated
        );
        for cached in [archive.clone(), archive.pom_archive()] {
            let path = repository.local_file(&cached);
            if let Err(e) = remove_if_older(&path, updated) {
                warn!(
                    "[{}] Failed to invalidate {}: {}",
                    archive.revision,
                    path.display(),
                    e
                );
            }
        }
        break;
    }
}

fn remove_if_older(path: &Path, updated: DateTime<Utc>) -> Result<()> {
    if let Some(modified) = aio::modified_time(path)? {
        if modified < updated {
            debug!("Removing outdated snapshot file {}", path.display());
            aio::remove_file_if_exists(path)?;
        }
    }
    Ok(())
}

/// Binds the compile and runtime dependencies and reports each as
/// discovered. Runtime declarations replace compile declarations of the
/// same program.
fn discover_dependencies(
    revision: &Revision,
    repository: &dyn ArtifactRepository,
    events: &Sender<ResolveEvent>,
) {
    let descriptor = match repository.build_descriptor(revision) {
        Ok(Some(descriptor)) => descriptor,
        Ok(None) => {
            debug!("[{}] No build descriptor", revision);
            return;
        }
        Err(e) => {
            error!("[{}] Failed to get build descriptor: {}", revision, e);
            return;
        }
    };

    let mut dependencies = BTreeMap::new();
    for scope in Scope::FOLLOWED {
        dependencies.extend(descriptor.dependencies(scope));
    }

    for mut dependency in dependencies.into_values() {
        let bound = match bind_to_version(&mut dependency, repository) {
            Ok(BindOutcome::Unbound) => Err("no matching version".to_string()),
            Ok(_) => dependency.revision().map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match bound {
            Ok(dependency_revision) => {
                let _ = events.send(ResolveEvent::Discovered {
                    from: revision.clone(),
                    revision: dependency_revision,
                });
            }
            Err(reason) => {
                warn!("[{}] Unbindable dependency {}: {}", revision, dependency, reason);
                let _ = events.send(ResolveEvent::Unbound {
                    from: revision.clone(),
                    dependency: dependency.to_string(),
                });
            }
        }
    }
}

fn build_resource(
    archive: &Archive,
    repository: &dyn ArtifactRepository,
    builder: &dyn ResourceBuilder,
) -> Result<ResourceDescriptor> {
    let file = repository.fetch(archive)?;
    builder.build(&file, archive)
}
