// mvnidx-common/src/model/revision.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IdxError, Result};
use crate::version::MavenVersion;

/// A package independent of its version: `group:artifact`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Program {
    pub group: String,
    pub artifact: String,
}

impl Program {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
        }
    }

    /// Directory of this program below a Maven repository root.
    pub fn path(&self) -> String {
        format!("{}/{}", self.group.replace('.', "/"), self.artifact)
    }

    pub fn revision(&self, version: MavenVersion) -> Revision {
        Revision::new(self.clone(), version)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// One version of a program: `group:artifact:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Revision {
    pub program: Program,
    pub version: MavenVersion,
}

impl Revision {
    pub fn new(program: Program, version: MavenVersion) -> Self {
        Self { program, version }
    }

    pub fn is_snapshot(&self) -> bool {
        self.version.is_snapshot()
    }

    /// Directory of this revision below a Maven repository root.
    pub fn path(&self) -> String {
        format!("{}/{}", self.program.path(), self.version)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.program, self.version)
    }
}

impl FromStr for Revision {
    type Err = IdxError;

    /// Accepts `group:artifact:version`. The extension/classifier forms are
    /// handled by [`crate::model::Archive`].
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() =>
            {
                let version = MavenVersion::parse(version)
                    .map_err(|e| IdxError::InvalidCoordinates(s.to_string(), e.to_string()))?;
                Ok(Revision::new(Program::new(*group, *artifact), version))
            }
            _ => Err(IdxError::InvalidCoordinates(
                s.to_string(),
                "expected group:artifact:version".to_string(),
            )),
        }
    }
}

impl PartialOrd for Revision {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Program first, then Maven version order.
impl Ord for Revision {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.program
            .cmp(&other.program)
            .then_with(|| self.version.cmp(&other.version))
    }
}
