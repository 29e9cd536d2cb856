// mvnidx-core/src/resolve/binder.rs
// Binds version ranges in dependency declarations to concrete versions.

use mvnidx_common::error::Result;
use mvnidx_common::model::{Dependency, Revision};
use mvnidx_common::version::{MavenVersion, VersionRange, VersionSpec};
use tracing::debug;

use crate::repository::ArtifactRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// The declaration already named a concrete version.
    Exact,
    /// The range was replaced by the highest matching version.
    Bound(MavenVersion),
    /// No known version matches the range; the dependency is unchanged.
    Unbound,
}

/// Highest candidate inside the range, ordered by program and then Maven
/// version order.
pub fn select_highest(range: &VersionRange, candidates: Vec<Revision>) -> Option<Revision> {
    let mut matching: Vec<Revision> = candidates
        .into_iter()
        .filter(|rev| range.includes(&rev.version))
        .collect();
    matching.sort();
    matching.pop()
}

/// Rewrites a range-valued dependency version to the highest available
/// version the range includes. Concrete versions are left alone.
pub fn bind_to_version(
    dependency: &mut Dependency,
    repository: &dyn ArtifactRepository,
) -> Result<BindOutcome> {
    let range = match VersionSpec::parse(&dependency.version)? {
        VersionSpec::Exact(_) => return Ok(BindOutcome::Exact),
        VersionSpec::Range(range) => range,
    };
    let candidates = repository.available_revisions(&dependency.program)?;
    debug!(
        "Binding {} {} against {} known revision(s)",
        dependency.program,
        range,
        candidates.len()
    );
    match select_highest(&range, candidates) {
        Some(highest) => {
            dependency.version = highest.version.to_string();
            Ok(BindOutcome::Bound(highest.version))
        }
        None => Ok(BindOutcome::Unbound),
    }
}
