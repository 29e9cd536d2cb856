// mvnidx-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, UserDirs};
use tracing::debug;

use super::error::{IdxError, Result};

const DEFAULT_NAME: &str = "mvnidx";
/// Number of revisions resolved concurrently unless configured otherwise.
pub const DEFAULT_MAX_PARALLEL: usize = 4;

const ENV_NAME: &str = "MVNIDX_NAME";
const ENV_LOCAL_REPO: &str = "MVNIDX_LOCAL_REPO";
const ENV_INDEX: &str = "MVNIDX_INDEX";
const ENV_COORDINATES: &str = "MVNIDX_COORDINATES";
const ENV_MAX_PARALLEL: &str = "MVNIDX_MAX_PARALLEL";

#[derive(Debug, Clone)]
pub struct Config {
    /// Name written into the persisted index.
    pub name: String,
    /// Local Maven repository used as artifact cache.
    pub local_repo: PathBuf,
    /// The persisted index file.
    pub index_location: PathBuf,
    /// Seed coordinates, `group:artifact[:extension[:classifier]]:version`.
    pub coordinates: Vec<String>,
    pub max_parallel: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading mvnidx configuration");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let name = get(ENV_NAME).unwrap_or_else(|| DEFAULT_NAME.to_string());
        let local_repo = get(ENV_LOCAL_REPO)
            .map(PathBuf::from)
            .unwrap_or_else(default_local_repo);
        let index_location = get(ENV_INDEX)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_index_location(&name, &local_repo));
        let coordinates = get(ENV_COORDINATES)
            .map(|s| parse_coordinate_list(&s))
            .unwrap_or_default();
        let max_parallel = match get(ENV_MAX_PARALLEL) {
            Some(raw) => parse_max_parallel(&raw)?,
            None => DEFAULT_MAX_PARALLEL,
        };

        debug!(
            "Effective configuration: name={}, local_repo={}, index={}, {} seed coordinate(s), max_parallel={}",
            name,
            local_repo.display(),
            index_location.display(),
            coordinates.len(),
            max_parallel
        );
        Ok(Self {
            name,
            local_repo,
            index_location,
            coordinates,
            max_parallel,
        })
    }

    pub fn new(name: impl Into<String>, index_location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            local_repo: default_local_repo(),
            index_location: index_location.into(),
            coordinates: Vec::new(),
            max_parallel: DEFAULT_MAX_PARALLEL,
        }
    }

    pub fn with_local_repo(mut self, local_repo: impl Into<PathBuf>) -> Self {
        self.local_repo = local_repo.into();
        self
    }

    pub fn with_coordinates<I, S>(mut self, coordinates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.coordinates = coordinates.into_iter().map(Into::into).collect();
        self
    }

    /// Values below one are raised to one.
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    pub fn index_location(&self) -> &Path {
        &self.index_location
    }

    pub fn local_repo(&self) -> &Path {
        &self.local_repo
    }
}

fn default_local_repo() -> PathBuf {
    UserDirs::new().map_or_else(
        || PathBuf::from(".m2").join("repository"),
        |ud| ud.home_dir().join(".m2").join("repository"),
    )
}

fn default_index_location(name: &str, local_repo: &Path) -> PathBuf {
    let file_name = format!("{name}.json");
    match BaseDirs::new() {
        Some(dirs) => dirs.cache_dir().join("mvnidx").join(file_name),
        None => local_repo.join(".mvnidx").join(file_name),
    }
}

/// Splits on commas and whitespace.
fn parse_coordinate_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_max_parallel(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(IdxError::Config(format!(
            "{ENV_MAX_PARALLEL} must be at least 1"
        ))),
        Ok(n) => Ok(n),
        Err(e) => Err(IdxError::Config(format!(
            "Invalid {ENV_MAX_PARALLEL} '{raw}': {e}"
        ))),
    }
}
