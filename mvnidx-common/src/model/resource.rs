// mvnidx-common/src/model/resource.rs
// Capability/requirement metadata describing one indexed artifact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::revision::{Program, Revision};

pub const IDENTITY_NAMESPACE: &str = "osgi.identity";
pub const CONTENT_NAMESPACE: &str = "osgi.content";
/// Namespace of the informational capability naming the source revision.
pub const INFORMATION_NAMESPACE: &str = "bnd.info";

pub const INFO_NAME: &str = "name";
pub const INFO_FROM: &str = "from";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    String(String),
    Long(i64),
    Version(String),
    List(Vec<String>),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) | AttributeValue::Version(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Long(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub namespace: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub directives: BTreeMap<String, String>,
}

impl Capability {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            attributes: BTreeMap::new(),
            directives: BTreeMap::new(),
        }
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub namespace: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub directives: BTreeMap<String, String>,
}

/// Parsed metadata of one artifact. Built once per processed revision and
/// not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub capabilities: Vec<Capability>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl ResourceDescriptor {
    pub fn new(capabilities: Vec<Capability>, requirements: Vec<Requirement>) -> Self {
        Self {
            capabilities,
            requirements,
        }
    }

    pub fn capabilities(&self, namespace: &str) -> impl Iterator<Item = &Capability> {
        let namespace = namespace.to_string();
        self.capabilities
            .iter()
            .filter(move |cap| cap.namespace == namespace)
    }

    /// The revision named by the informational capability, if there is one
    /// and it parses.
    pub fn source_revision(&self) -> Option<Revision> {
        self.capabilities(INFORMATION_NAMESPACE)
            .filter_map(|cap| cap.attributes.get(INFO_FROM))
            .filter_map(AttributeValue::as_str)
            .find_map(|from| from.parse().ok())
    }

    pub fn is_from(&self, program: &Program) -> bool {
        self.source_revision()
            .is_some_and(|rev| &rev.program == program)
    }
}
