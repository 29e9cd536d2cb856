// mvnidx-common/src/model/dependency.rs
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::revision::{Program, Revision};
use crate::error::{IdxError, Result};
use crate::version::{MavenVersion, VersionRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl Scope {
    /// Scopes whose dependencies are part of the closure, in merge order:
    /// a later scope replaces declarations of the same program.
    pub const FOLLOWED: [Scope; 2] = [Scope::Compile, Scope::Runtime];
}

impl Default for Scope {
    fn default() -> Self {
        Self::Compile
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
        };
        f.write_str(s)
    }
}

impl FromStr for Scope {
    type Err = IdxError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "compile" => Ok(Scope::Compile),
            "provided" => Ok(Scope::Provided),
            "runtime" => Ok(Scope::Runtime),
            "test" => Ok(Scope::Test),
            "system" => Ok(Scope::System),
            "import" => Ok(Scope::Import),
            other => Err(IdxError::Generic(format!("Unknown dependency scope '{other}'"))),
        }
    }
}

/// A declared dependency. `version` holds the declaration as written until
/// it has been bound to a concrete version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub program: Program,
    pub version: String,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub optional: bool,
}

impl Dependency {
    pub fn new(program: Program, version: impl Into<String>, scope: Scope) -> Self {
        Self {
            program,
            version: version.into(),
            scope,
            optional: false,
        }
    }

    pub fn is_range(&self) -> bool {
        VersionRange::is_range(&self.version)
    }

    /// The revision this dependency points at. Fails while the version is
    /// still a range.
    pub fn revision(&self) -> Result<Revision> {
        if self.is_range() {
            return Err(IdxError::Unbound(
                self.program.to_string(),
                format!("version range {} has not been bound", self.version),
            ));
        }
        let version = MavenVersion::parse(&self.version)
            .map_err(|e| IdxError::Unbound(self.program.to_string(), e.to_string()))?;
        Ok(Revision::new(self.program.clone(), version))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.program, self.version, self.scope)
    }
}

/// The dependency section of a revision's build descriptor (its POM).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    pub dependencies: Vec<Dependency>,
}

impl BuildDescriptor {
    pub fn new(dependencies: Vec<Dependency>) -> Self {
        Self { dependencies }
    }

    /// Declared dependencies of one scope, keyed by program. A later
    /// declaration of the same program replaces an earlier one.
    pub fn dependencies(&self, scope: Scope) -> BTreeMap<Program, Dependency> {
        self.dependencies
            .iter()
            .filter(|dep| dep.scope == scope)
            .map(|dep| (dep.program.clone(), dep.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(artifact: &str, version: &str, scope: Scope) -> Dependency {
        Dependency::new(Program::new("g", artifact), version, scope)
    }

    #[test]
    fn revision_requires_bound_version() {
        let mut d = dep("a", "[1.0,2.0)", Scope::Compile);
        assert!(d.is_range());
        assert!(matches!(d.revision(), Err(IdxError::Unbound(..))));
        d.version = "1.5".to_string();
        assert_eq!(d.revision().unwrap().to_string(), "g:a:1.5");
    }

    #[test]
    fn filters_by_scope() {
        let descriptor = BuildDescriptor::new(vec![
            dep("a", "1", Scope::Compile),
            dep("b", "1", Scope::Test),
            dep("d", "2", Scope::Runtime),
            dep("a", "1.1", Scope::Compile),
        ]);
        let compile = descriptor.dependencies(Scope::Compile);
        assert_eq!(compile.len(), 1);
        assert_eq!(compile[&Program::new("g", "a")].version, "1.1");
        let runtime = descriptor.dependencies(Scope::Runtime);
        assert_eq!(runtime.len(), 1);
        assert!(runtime.contains_key(&Program::new("g", "d")));
    }

    #[test]
    fn scope_parsing() {
        assert_eq!("".parse::<Scope>().unwrap(), Scope::Compile);
        assert_eq!("Runtime".parse::<Scope>().unwrap(), Scope::Runtime);
        assert!("weird".parse::<Scope>().is_err());
    }
}
