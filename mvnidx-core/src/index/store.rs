// mvnidx-core/src/index/store.rs
// The persisted set of resource descriptors of one repository.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use mvnidx_aio as aio;
use mvnidx_common::error::Result;
use mvnidx_common::model::{Program, ResourceDescriptor, Revision};
use tracing::{debug, info};

use super::codec::{IndexCodec, JsonIndexCodec};
use crate::resolve::{ClosureResolver, ResolveStats};

pub struct IndexStore {
    name: String,
    location: PathBuf,
    codec: Box<dyn IndexCodec>,
    resources: Vec<ResourceDescriptor>,
}

impl IndexStore {
    /// An empty store; nothing is read until [`IndexStore::load`].
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>, codec: Box<dyn IndexCodec>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            codec,
            resources: Vec::new(),
        }
    }

    pub fn with_json(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self::new(name, location, Box::new(JsonIndexCodec))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn is_persisted(&self) -> bool {
        aio::is_regular_file(&self.location)
    }

    /// Reads the index file if there is one. Returns whether it was read;
    /// a file that exists but cannot be decoded is an error.
    pub fn load(&mut self) -> Result<bool> {
        if !self.is_persisted() {
            debug!("No index at {}", self.location.display());
            return Ok(false);
        }
        let resources = self.codec.load(&self.location)?;
        debug!(
            "Loaded {} resource(s) from {}",
            resources.len(),
            self.location.display()
        );
        self.resources = resources;
        Ok(true)
    }

    /// Replaces the content and writes the index file.
    pub fn replace<I>(&mut self, resources: I) -> Result<()>
    where
        I: IntoIterator<Item = ResourceDescriptor>,
    {
        let mut resources: Vec<ResourceDescriptor> = resources.into_iter().collect();
        // Stable file content across refreshes of the same closure.
        resources.sort_by_cached_key(|r| (r.source_revision(), serde_json::to_string(r).ok()));
        self.resources = resources;
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        self.codec.save(&self.location, &self.name, &self.resources)
    }

    /// Runs the resolver on the seeds and makes the collected resources the
    /// new content.
    pub fn refresh_with<I>(&mut self, resolver: &mut ClosureResolver, seeds: I) -> Result<ResolveStats>
    where
        I: IntoIterator<Item = Revision>,
    {
        let closure = resolver.resolve(seeds)?;
        self.replace(closure.resources)?;
        info!(
            "Index '{}' now holds {} resource(s) ({})",
            self.name,
            self.resources.len(),
            self.location.display()
        );
        Ok(closure.stats)
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources built from some revision of the program.
    pub fn find(&self, program: &Program) -> Vec<&ResourceDescriptor> {
        self.resources.iter().filter(|r| r.is_from(program)).collect()
    }

    /// The revisions the indexed resources were built from, ordered.
    pub fn revisions(&self) -> Vec<Revision> {
        self.resources
            .iter()
            .filter_map(ResourceDescriptor::source_revision)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl std::fmt::Debug for IndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("resources", &self.resources.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use mvnidx_common::model::resource::{Capability, INFORMATION_NAMESPACE, INFO_FROM};
    use tempfile::tempdir;

    use super::*;

    fn resource(from: &str) -> ResourceDescriptor {
        ResourceDescriptor::new(
            vec![Capability::new(INFORMATION_NAMESPACE).attribute(INFO_FROM, from)],
            Vec::new(),
        )
    }

    #[test]
    fn missing_file_loads_nothing() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::with_json("test", dir.path().join("index.json"));
        assert!(!store.load().unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn directory_is_not_an_index() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::with_json("test", dir.path());
        assert!(!store.is_persisted());
        assert!(!store.load().unwrap());
    }

    #[test]
    fn replace_persists_and_reloads() {
        let dir = tempdir().unwrap();
        let location = dir.path().join("index.json");
        let mut store = IndexStore::with_json("test", &location);
        store
            .replace(vec![resource("g:b:1"), resource("g:a:2"), resource("g:a:1")])
            .unwrap();

        let mut reopened = IndexStore::with_json("test", &location);
        assert!(reopened.load().unwrap());
        assert_eq!(reopened.resources(), store.resources());
        let revisions: Vec<String> = reopened.revisions().iter().map(ToString::to_string).collect();
        assert_eq!(revisions, ["g:a:1", "g:a:2", "g:b:1"]);
    }

    #[test]
    fn find_selects_by_program() {
        let dir = tempdir().unwrap();
        let mut store = IndexStore::with_json("test", dir.path().join("index.json"));
        store
            .replace(vec![resource("g:a:1"), resource("g:a:2"), resource("g:b:1")])
            .unwrap();
        assert_eq!(store.find(&Program::new("g", "a")).len(), 2);
        assert_eq!(store.find(&Program::new("g", "b")).len(), 1);
        assert!(store.find(&Program::new("g", "c")).is_empty());
    }
}
