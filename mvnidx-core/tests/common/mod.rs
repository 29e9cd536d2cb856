// Shared fixtures for the mvnidx-core integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mvnidx_common::error::{IdxError, Result};
use mvnidx_common::model::{
    Archive, BuildDescriptor, Dependency, Program, ResourceDescriptor, Revision, Scope,
};
use mvnidx_core::{ArtifactRepository, FileResourceBuilder, ResourceBuilder};
use tracing_subscriber::EnvFilter;

pub const SNAPSHOT_SOURCE: &str = "remote";

/// Log output for a test run is controlled by `MVNIDX_LOG`, silent by
/// default.
pub fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::OFF.into())
        .with_env_var("MVNIDX_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

pub fn rev(coordinates: &str) -> Revision {
    coordinates.parse().unwrap()
}

#[derive(Debug, Clone, Default)]
struct FakeArtifact {
    dependencies: Option<Vec<Dependency>>,
    /// `None` makes fetching fail.
    content: Option<Vec<u8>>,
}

/// In-memory repository that materializes archives below `root` when they
/// are fetched.
pub struct FakeRepository {
    root: PathBuf,
    artifacts: HashMap<Revision, FakeArtifact>,
    snapshot_updates: Mutex<HashMap<Revision, DateTime<Utc>>>,
    delay: Duration,
    resolved: Mutex<HashMap<Revision, usize>>,
    downloads: Mutex<HashMap<Revision, usize>>,
    active: AtomicUsize,
    peak_active: AtomicUsize,
}

impl FakeRepository {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            artifacts: HashMap::new(),
            snapshot_updates: Mutex::new(HashMap::new()),
            delay: Duration::ZERO,
            resolved: Mutex::new(HashMap::new()),
            downloads: Mutex::new(HashMap::new()),
            active: AtomicUsize::new(0),
            peak_active: AtomicUsize::new(0),
        }
    }

    /// Adds an artifact with dependencies written as
    /// `group:artifact:version[@scope]`.
    pub fn artifact(mut self, coordinates: &str, dependencies: &[&str]) -> Self {
        let content = format!("content of {coordinates}").into_bytes();
        self.artifacts.insert(
            rev(coordinates),
            FakeArtifact {
                dependencies: Some(dependencies.iter().map(|d| parse_dependency(d)).collect()),
                content: Some(content),
            },
        );
        self
    }

    /// An artifact whose build descriptor is available but whose archive
    /// cannot be fetched.
    pub fn unfetchable(mut self, coordinates: &str, dependencies: &[&str]) -> Self {
        self.artifacts.insert(
            rev(coordinates),
            FakeArtifact {
                dependencies: Some(dependencies.iter().map(|d| parse_dependency(d)).collect()),
                content: None,
            },
        );
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_snapshot_update(&self, coordinates: &str, updated: DateTime<Utc>) {
        self.snapshot_updates
            .lock()
            .unwrap()
            .insert(rev(coordinates), updated);
    }

    pub fn resolved(&self, coordinates: &str) -> usize {
        let resolved = self.resolved.lock().unwrap();
        resolved.get(&rev(coordinates)).copied().unwrap_or(0)
    }

    pub fn total_resolved(&self) -> usize {
        self.resolved.lock().unwrap().values().sum()
    }

    pub fn downloads(&self, coordinates: &str) -> usize {
        let downloads = self.downloads.lock().unwrap();
        downloads.get(&rev(coordinates)).copied().unwrap_or(0)
    }

    pub fn peak_active(&self) -> usize {
        self.peak_active.load(Ordering::SeqCst)
    }
}

fn parse_dependency(spec: &str) -> Dependency {
    let (coordinates, scope) = match spec.split_once('@') {
        Some((coordinates, scope)) => (coordinates, scope.parse::<Scope>().unwrap()),
        None => (spec, Scope::Compile),
    };
    let mut parts = coordinates.splitn(3, ':');
    let group = parts.next().unwrap();
    let artifact = parts.next().unwrap();
    let version = parts.next().unwrap();
    Dependency::new(Program::new(group, artifact), version, scope)
}

impl ArtifactRepository for FakeRepository {
    fn resolve_archive(&self, revision: &Revision) -> Result<Option<Archive>> {
        *self
            .resolved
            .lock()
            .unwrap()
            .entry(revision.clone())
            .or_default() += 1;

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_active.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        self.active.fetch_sub(1, Ordering::SeqCst);

        Ok(self
            .artifacts
            .contains_key(revision)
            .then(|| Archive::jar(revision.clone())))
    }

    fn snapshot_sources(&self) -> Vec<String> {
        vec![SNAPSHOT_SOURCE.to_string()]
    }

    fn metadata_timestamp(&self, source: &str, revision: &Revision) -> Result<Option<DateTime<Utc>>> {
        assert_eq!(source, SNAPSHOT_SOURCE);
        Ok(self.snapshot_updates.lock().unwrap().get(revision).copied())
    }

    fn local_file(&self, archive: &Archive) -> PathBuf {
        self.root.join(archive.path())
    }

    fn fetch(&self, archive: &Archive) -> Result<PathBuf> {
        let path = self.local_file(archive);
        if path.is_file() {
            return Ok(path);
        }
        let content = self
            .artifacts
            .get(&archive.revision)
            .and_then(|a| a.content.clone())
            .ok_or_else(|| IdxError::Repository(format!("cannot download {archive}")))?;
        std::fs::create_dir_all(path.parent().unwrap())?;
        std::fs::write(&path, content)?;
        *self
            .downloads
            .lock()
            .unwrap()
            .entry(archive.revision.clone())
            .or_default() += 1;
        Ok(path)
    }

    fn build_descriptor(&self, revision: &Revision) -> Result<Option<BuildDescriptor>> {
        Ok(self
            .artifacts
            .get(revision)
            .and_then(|a| a.dependencies.clone())
            .map(BuildDescriptor::new))
    }

    fn available_revisions(&self, program: &Program) -> Result<Vec<Revision>> {
        Ok(self
            .artifacts
            .keys()
            .filter(|r| &r.program == program)
            .cloned()
            .collect())
    }
}

/// Delegates to [`FileResourceBuilder`] but panics for one program.
pub struct PanickingBuilder {
    pub program: Program,
}

impl ResourceBuilder for PanickingBuilder {
    fn build(&self, file: &Path, archive: &Archive) -> Result<ResourceDescriptor> {
        if archive.revision.program == self.program {
            panic!("descriptor build exploded for {archive}");
        }
        FileResourceBuilder.build(file, archive)
    }
}

pub fn builder() -> Arc<dyn ResourceBuilder> {
    Arc::new(FileResourceBuilder)
}

pub fn revisions_of(resources: impl IntoIterator<Item = ResourceDescriptor>) -> Vec<String> {
    let mut revisions: Vec<String> = resources
        .into_iter()
        .filter_map(|r| r.source_revision())
        .map(|r| r.to_string())
        .collect();
    revisions.sort();
    revisions
}
