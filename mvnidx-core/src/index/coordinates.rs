// mvnidx-core/src/index/coordinates.rs
// Index flavor seeded from a fixed list of Maven coordinates.

use std::path::Path;
use std::sync::Arc;

use mvnidx_common::config::Config;
use mvnidx_common::error::Result;
use mvnidx_common::model::{Archive, ResourceDescriptor, Revision};
use tracing::{debug, instrument};

use super::store::IndexStore;
use super::IndexedRepository;
use crate::repository::{ArtifactRepository, ResourceBuilder};
use crate::resolve::{ClosureResolver, ResolveStats};

pub struct CoordinatesRepository {
    store: IndexStore,
    resolver: ClosureResolver,
    coordinates: Vec<String>,
    last_stats: Option<ResolveStats>,
}

impl CoordinatesRepository {
    /// Opens the index at the configured location, refreshing right away
    /// when no index file exists yet.
    pub fn open(
        config: &Config,
        repository: Arc<dyn ArtifactRepository>,
        builder: Arc<dyn ResourceBuilder>,
    ) -> Result<Self> {
        let store = IndexStore::with_json(config.name.clone(), config.index_location.clone());
        Self::with_store(store, config, repository, builder)
    }

    pub fn with_store(
        mut store: IndexStore,
        config: &Config,
        repository: Arc<dyn ArtifactRepository>,
        builder: Arc<dyn ResourceBuilder>,
    ) -> Result<Self> {
        let loaded = store.load()?;
        let mut this = Self {
            store,
            resolver: ClosureResolver::new(repository, builder, config.max_parallel),
            coordinates: config.coordinates.clone(),
            last_stats: None,
        };
        if !loaded {
            this.refresh()?;
        }
        Ok(this)
    }

    pub fn name(&self) -> &str {
        self.store.name()
    }

    pub fn location(&self) -> &Path {
        self.store.location()
    }

    pub fn resources(&self) -> &[ResourceDescriptor] {
        self.store.resources()
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    pub fn coordinates(&self) -> &[String] {
        &self.coordinates
    }

    /// Counters of the most recent refresh of this instance.
    pub fn last_stats(&self) -> Option<&ResolveStats> {
        self.last_stats.as_ref()
    }

    /// Accepts `group:artifact:version` and the archive form
    /// `group:artifact:extension[:classifier]:version`.
    fn seeds(&self) -> Result<Vec<Revision>> {
        self.coordinates
            .iter()
            .map(|coordinates| {
                let revision = coordinates.parse::<Archive>()?.revision;
                debug!("Found {}", revision);
                Ok(revision)
            })
            .collect()
    }
}

impl IndexedRepository for CoordinatesRepository {
    #[instrument(skip_all, fields(index = %self.store.name()))]
    fn refresh(&mut self) -> Result<bool> {
        if self.coordinates.is_empty() {
            debug!("No coordinates configured, nothing to refresh");
            return Ok(false);
        }
        let seeds = self.seeds()?;
        let stats = self.store.refresh_with(&mut self.resolver, seeds)?;
        self.last_stats = Some(stats);
        Ok(true)
    }
}

impl std::fmt::Debug for CoordinatesRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatesRepository")
            .field("store", &self.store)
            .field("coordinates", &self.coordinates)
            .finish_non_exhaustive()
    }
}
