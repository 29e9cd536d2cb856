// mvnidx-common/src/version/spec.rs
use std::fmt;

use super::maven::MavenVersion;
use super::range::VersionRange;
use crate::error::Result;

/// What a dependency declaration may carry in its version field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    Exact(MavenVersion),
    Range(VersionRange),
}

impl VersionSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        if VersionRange::is_range(spec) {
            VersionRange::parse(spec).map(VersionSpec::Range)
        } else {
            MavenVersion::parse(spec).map(VersionSpec::Exact)
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, VersionSpec::Range(_))
    }

    /// An exact spec matches versions equal in Maven order, so `1.0`
    /// matches `1`.
    pub fn includes(&self, version: &MavenVersion) -> bool {
        match self {
            VersionSpec::Exact(exact) => exact.maven_cmp(version).is_eq(),
            VersionSpec::Range(range) => range.includes(version),
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Exact(version) => write!(f, "{version}"),
            VersionSpec::Range(range) => write!(f, "{range}"),
        }
    }
}
