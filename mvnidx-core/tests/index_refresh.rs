mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{builder, init_tracing, revisions_of, FakeRepository};
use mvnidx_common::config::Config;
use mvnidx_common::model::{Archive, Program};
use mvnidx_common::IdxError;
use mvnidx_core::{ArtifactRepository, CoordinatesRepository, IndexStore, IndexedRepository};
use tempfile::{tempdir, TempDir};

fn sample_repository(dir: &TempDir) -> Arc<FakeRepository> {
    Arc::new(
        FakeRepository::new(&dir.path().join("m2"))
            .artifact("org.example:app:1.0", &["org.example:lib:[1,2)", "org.example:util:2.1"])
            .artifact("org.example:lib:1.0", &[])
            .artifact("org.example:lib:1.4", &["org.example:util:2.1"])
            .artifact("org.example:util:2.1", &[]),
    )
}

fn config(dir: &TempDir, coordinates: &[&str]) -> Config {
    Config::new("test", dir.path().join("index").join("test.json"))
        .with_local_repo(dir.path().join("m2"))
        .with_coordinates(coordinates.iter().copied())
}

#[test]
fn opening_without_index_refreshes_and_persists() {
    init_tracing();
    let dir = tempdir().unwrap();
    let repository = sample_repository(&dir);
    let config = config(&dir, &["org.example:app:1.0"]);

    let index = CoordinatesRepository::open(&config, repository.clone(), builder()).unwrap();

    assert!(index.location().is_file());
    assert_eq!(index.name(), "test");
    assert_eq!(
        revisions_of(index.resources().to_vec()),
        ["org.example:app:1.0", "org.example:lib:1.4", "org.example:util:2.1"]
    );
    assert_eq!(index.store().find(&Program::new("org.example", "lib")).len(), 1);
    let stats = index.last_stats().unwrap();
    assert_eq!(stats.indexed, 3);
}

#[test]
fn reopening_loads_the_persisted_index() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = config(&dir, &["org.example:app:1.0"]);
    let first = CoordinatesRepository::open(&config, sample_repository(&dir), builder()).unwrap();

    let repository = sample_repository(&dir);
    let reopened = CoordinatesRepository::open(&config, repository.clone(), builder()).unwrap();

    assert_eq!(repository.total_resolved(), 0);
    assert!(reopened.last_stats().is_none());
    assert_eq!(reopened.resources(), first.resources());
}

#[test]
fn repeated_refreshes_yield_the_same_index() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = config(&dir, &["org.example:app:1.0"]);
    let mut index = CoordinatesRepository::open(&config, sample_repository(&dir), builder()).unwrap();
    let before = index.resources().to_vec();
    let file_before = std::fs::read(index.location()).unwrap();

    assert!(index.refresh().unwrap());
    assert!(index.refresh().unwrap());

    assert_eq!(index.resources(), before.as_slice());
    assert_eq!(std::fs::read(index.location()).unwrap(), file_before);
}

#[test]
fn refresh_without_coordinates_reports_false() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = config(&dir, &[]);

    let mut index = CoordinatesRepository::open(&config, sample_repository(&dir), builder()).unwrap();

    assert!(!index.refresh().unwrap());
    assert!(index.resources().is_empty());
    assert!(!index.location().exists());
}

#[test]
fn accepts_archive_coordinates() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = config(&dir, &["org.example:util:jar:2.1"]);

    let index = CoordinatesRepository::open(&config, sample_repository(&dir), builder()).unwrap();

    assert_eq!(revisions_of(index.resources().to_vec()), ["org.example:util:2.1"]);
}

#[test]
fn invalid_coordinates_fail_to_open() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = config(&dir, &["org.example:app"]);

    let result = CoordinatesRepository::open(&config, sample_repository(&dir), builder());

    assert!(matches!(result, Err(IdxError::InvalidCoordinates(..))));
}

#[test]
fn corrupt_index_fails_to_open() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = config(&dir, &["org.example:app:1.0"]);
    std::fs::create_dir_all(config.index_location.parent().unwrap()).unwrap();
    std::fs::write(&config.index_location, "not an index").unwrap();

    let result = CoordinatesRepository::open(&config, sample_repository(&dir), builder());

    assert!(matches!(result, Err(IdxError::Json(_))));
}

#[test]
fn outdated_snapshots_are_downloaded_again() {
    init_tracing();
    let dir = tempdir().unwrap();
    let repository = Arc::new(
        FakeRepository::new(&dir.path().join("m2")).artifact("org.example:snap:1.0-SNAPSHOT", &[]),
    );
    let config = config(&dir, &["org.example:snap:1.0-SNAPSHOT"]);
    let mut index = CoordinatesRepository::open(&config, repository.clone(), builder()).unwrap();
    assert_eq!(repository.downloads("org.example:snap:1.0-SNAPSHOT"), 1);

    // Remote metadata older than the cached file: keep it.
    repository.set_snapshot_update("org.example:snap:1.0-SNAPSHOT", Utc::now() - Duration::hours(1));
    assert!(index.refresh().unwrap());
    assert_eq!(repository.downloads("org.example:snap:1.0-SNAPSHOT"), 1);

    repository.set_snapshot_update("org.example:snap:1.0-SNAPSHOT", Utc::now() + Duration::hours(1));
    assert!(index.refresh().unwrap());
    assert_eq!(repository.downloads("org.example:snap:1.0-SNAPSHOT"), 2);
    assert_eq!(index.resources().len(), 1);
}

#[test]
fn snapshot_build_descriptor_follows_metadata_age() {
    init_tracing();
    let dir = tempdir().unwrap();
    let coordinates = "org.example:snap:2.0-SNAPSHOT";
    let repository = Arc::new(FakeRepository::new(&dir.path().join("m2")).artifact(coordinates, &[]));
    let config = config(&dir, &[coordinates]);
    let mut index = CoordinatesRepository::open(&config, repository.clone(), builder()).unwrap();

    let pom = repository.local_file(&Archive::jar(common::rev(coordinates)).pom_archive());
    std::fs::create_dir_all(pom.parent().unwrap()).unwrap();
    std::fs::write(&pom, "<project/>").unwrap();

    // Cached descriptor newer than the remote metadata: kept.
    repository.set_snapshot_update(coordinates, Utc::now() - Duration::hours(1));
    assert!(index.refresh().unwrap());
    assert!(pom.is_file());

    // Remote metadata newer than the cached descriptor: removed.
    repository.set_snapshot_update(coordinates, Utc::now() + Duration::hours(1));
    assert!(index.refresh().unwrap());
    assert!(!pom.exists());
    assert_eq!(repository.downloads(coordinates), 2);
}

#[test]
fn store_reads_what_the_flavor_wrote() {
    init_tracing();
    let dir = tempdir().unwrap();
    let config = config(&dir, &["org.example:app:1.0"]);
    let index = CoordinatesRepository::open(&config, sample_repository(&dir), builder()).unwrap();

    let mut store = IndexStore::with_json("test", index.location());
    assert!(store.load().unwrap());

    let revisions: Vec<String> = store.revisions().iter().map(ToString::to_string).collect();
    assert_eq!(
        revisions,
        ["org.example:app:1.0", "org.example:lib:1.4", "org.example:util:2.1"]
    );
}
