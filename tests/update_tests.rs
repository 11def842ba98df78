/// Tests for the cached release check
mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use psm::database::Database;
use psm::update::{
    is_update_available, last_checked, latest_known, UpdateError, Version, LAST_CHECK_KEY,
    LATEST_VERSION_KEY,
};

use common::{checker, spawn_release_server, UNREACHABLE_API};

#[test]
fn test_version_comparison() {
    let installed = Version::parse("3.0.1").unwrap();
    let release = Version::parse("v3.1.0").unwrap();

    assert!(release.is_newer_than(&installed));
    assert!(!installed.is_newer_than(&release));
}

#[tokio::test]
async fn test_refresh_records_latest_release() {
    let api = spawn_release_server("v999.0.0").await;
    let db = Arc::new(Database::in_memory(BTreeMap::new()));

    let latest = checker(&api).refresh(&db).await.unwrap();

    assert_eq!(latest, Some(Version::parse("999.0.0").unwrap()));
    assert_eq!(latest_known(&db), latest);
    assert!(last_checked(&db).is_some());
    assert!(is_update_available(&db));
}

#[tokio::test]
async fn test_refresh_ignores_non_version_tag() {
    let api = spawn_release_server("nightly-build").await;
    let db = Arc::new(Database::in_memory(BTreeMap::new()));
    db.set(LATEST_VERSION_KEY, "1.0.0");

    let latest = checker(&api).refresh(&db).await.unwrap();

    assert_eq!(latest, None);
    assert_eq!(db.get(LATEST_VERSION_KEY).as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn test_refresh_if_due_skips_recent_check() {
    let db = Arc::new(Database::in_memory(BTreeMap::new()));
    db.set(LAST_CHECK_KEY, (Utc::now() - Duration::hours(1)).timestamp().to_string());

    // Would fail if it tried to reach the server.
    let ran = checker(UNREACHABLE_API).refresh_if_due(&db).await.unwrap();
    assert!(!ran);
}

#[tokio::test]
async fn test_refresh_if_due_runs_when_stale() {
    let api = spawn_release_server("0.0.1").await;
    let db = Arc::new(Database::in_memory(BTreeMap::new()));
    db.set(LAST_CHECK_KEY, (Utc::now() - Duration::days(30)).timestamp().to_string());

    let ran = checker(&api).refresh_if_due(&db).await.unwrap();

    assert!(ran);
    assert_eq!(db.get(LATEST_VERSION_KEY).as_deref(), Some("0.0.1"));
    assert!(!is_update_available(&db));
}

#[tokio::test]
async fn test_refresh_reports_network_errors() {
    let db = Arc::new(Database::in_memory(BTreeMap::new()));

    let err = checker(UNREACHABLE_API).refresh(&db).await.unwrap_err();
    assert!(matches!(err, UpdateError::Network(_)));
}

#[tokio::test]
async fn test_refresh_persists_to_data_file() {
    let api = spawn_release_server("v999.0.0").await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    let db = Arc::new(Database::open(&path).unwrap());

    checker(&api).refresh(&db).await.unwrap();

    let reopened = Database::open(&path).unwrap();
    assert_eq!(reopened.get(LATEST_VERSION_KEY).as_deref(), Some("999.0.0"));
}

// Talks to the real GitHub API; run with: cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn test_github_latest_release_integration() {
    let db = Arc::new(Database::in_memory(BTreeMap::new()));
    match checker(psm::update::GITHUB_API_BASE).refresh(&db).await {
        Ok(latest) => println!("Latest release: {:?}", latest),
        Err(e) => println!("Failed to fetch latest release: {}", e),
    }
}
