// mvnidx-common/src/model/archive.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::revision::{Program, Revision};
use crate::error::{IdxError, Result};
use crate::version::MavenVersion;

pub const DEFAULT_EXTENSION: &str = "jar";
pub const POM_EXTENSION: &str = "pom";

/// A single file of a revision, identified by extension and classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Archive {
    pub revision: Revision,
    pub extension: String,
    #[serde(default)]
    pub classifier: String,
}

impl Archive {
    pub fn new(revision: Revision, extension: impl Into<String>, classifier: impl Into<String>) -> Self {
        Self {
            revision,
            extension: extension.into(),
            classifier: classifier.into(),
        }
    }

    /// The default binary of a revision.
    pub fn jar(revision: Revision) -> Self {
        Self::new(revision, DEFAULT_EXTENSION, "")
    }

    /// The archive holding this revision's build descriptor.
    pub fn pom_archive(&self) -> Archive {
        Archive::new(self.revision.clone(), POM_EXTENSION, "")
    }

    pub fn is_snapshot(&self) -> bool {
        self.revision.is_snapshot()
    }

    pub fn file_name(&self) -> String {
        let mut name = format!("{}-{}", self.revision.program.artifact, self.revision.version);
        if !self.classifier.is_empty() {
            name.push('-');
            name.push_str(&self.classifier);
        }
        name.push('.');
        name.push_str(&self.extension);
        name
    }

    /// Path of the file relative to a Maven repository root.
    pub fn path(&self) -> String {
        format!("{}/{}", self.revision.path(), self.file_name())
    }
}

impl fmt::Display for Archive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = &self.revision.program;
        write!(f, "{}:{}:{}", program.group, program.artifact, self.extension)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.revision.version)
    }
}

impl FromStr for Archive {
    type Err = IdxError;

    /// `group:artifact[:extension[:classifier]]:version`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| IdxError::InvalidCoordinates(s.to_string(), reason);
        let parts: Vec<&str> = s.trim().split(':').collect();
        let (group, artifact, extension, classifier, version) = match parts.as_slice() {
            [g, a, v] => (*g, *a, DEFAULT_EXTENSION, "", *v),
            [g, a, e, v] => (*g, *a, *e, "", *v),
            [g, a, e, c, v] => (*g, *a, *e, *c, *v),
            _ => {
                return Err(invalid(
                    "expected group:artifact[:extension[:classifier]]:version".to_string(),
                ))
            }
        };
        if group.is_empty() || artifact.is_empty() {
            return Err(invalid("group and artifact must not be empty".to_string()));
        }
        let version = MavenVersion::parse(version).map_err(|e| invalid(e.to_string()))?;
        let extension = if extension.is_empty() {
            DEFAULT_EXTENSION
        } else {
            extension
        };
        Ok(Archive::new(
            Revision::new(Program::new(group, artifact), version),
            extension,
            classifier,
        ))
    }
}
