/// Cached "is there a newer release" check
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::error::UpdateError;
use super::github::GitHubClient;
use super::version::Version;
use crate::config::MAX_UPDATE_INTERVAL_DAYS;
use crate::database::Database;

/// Unix timestamp of the last attempt to reach the release server
pub const LAST_CHECK_KEY: &str = "last_update_check";
/// Newest release version seen by the last successful check
pub const LATEST_VERSION_KEY: &str = "version_update_check";

/// Asks the release server for the newest version at most once per interval
/// and keeps the answer in the database, so page rendering only ever reads
/// stored values.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    client: GitHubClient,
    interval: Duration,
}

impl UpdateChecker {
    /// `interval_days` is clamped to `1..=MAX_UPDATE_INTERVAL_DAYS`.
    pub fn new(client: GitHubClient, interval_days: i64) -> Self {
        Self {
            client,
            interval: Duration::days(interval_days.clamp(1, MAX_UPDATE_INTERVAL_DAYS)),
        }
    }

    pub fn from_env() -> Result<Self, UpdateError> {
        let (owner, name) = crate::config::get_update_repo();
        Ok(Self::new(
            GitHubClient::new(owner, name)?,
            crate::config::get_update_interval_days(),
        ))
    }

    pub fn repository(&self) -> String {
        self.client.repository()
    }

    /// Whether the last check is older than the interval.
    pub fn is_due(&self, db: &Database, now: DateTime<Utc>) -> bool {
        match last_checked(db) {
            Some(last) => now - last > self.interval,
            None => true,
        }
    }

    /// Runs [`refresh`](Self::refresh) if the last check is older than the
    /// interval. Returns whether a check was attempted.
    pub async fn refresh_if_due(&self, db: &Arc<Database>) -> Result<bool, UpdateError> {
        if !self.is_due(db, Utc::now()) {
            tracing::trace!("Update check not due yet");
            return Ok(false);
        }
        self.refresh(db).await?;
        Ok(true)
    }

    /// Query the release server now and store the result.
    ///
    /// The check time is recorded even when the request fails so an
    /// unreachable server is not hammered on every page view.
    pub async fn refresh(&self, db: &Arc<Database>) -> Result<Option<Version>, UpdateError> {
        db.set(LAST_CHECK_KEY, Utc::now().timestamp().to_string());
        tracing::info!(repo = %self.client.repository(), "Checking for updates");

        let result = self.client.latest_release_tag().await;
        let latest = match result {
            Ok(tag) => record_latest(db, &tag),
            Err(e) => {
                tracing::warn!(%e, "Update check failed");
                persist_blocking(db).await?;
                return Err(e);
            }
        };
        persist_blocking(db).await?;

        match &latest {
            Some(v) if v.is_newer_than(&Version::current()) => {
                tracing::info!(current = %Version::current(), latest = %v, "Update available");
            }
            Some(_) => tracing::info!("Already on the latest version"),
            None => {}
        }
        Ok(latest)
    }
}

/// Writes the data file on the blocking pool instead of a runtime worker.
async fn persist_blocking(db: &Arc<Database>) -> Result<(), UpdateError> {
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || db.persist()).await??;
    Ok(())
}

/// Store `tag` as the latest known version if it parses as one.
pub fn record_latest(db: &Database, tag: &str) -> Option<Version> {
    match Version::parse(tag) {
        Ok(version) => {
            db.set(LATEST_VERSION_KEY, version.to_string());
            Some(version)
        }
        Err(e) => {
            tracing::warn!(%e, tag, "Ignoring release with unparseable tag");
            None
        }
    }
}

pub fn last_checked(db: &Database) -> Option<DateTime<Utc>> {
    db.get(LAST_CHECK_KEY)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|ts| *ts > 0)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}

pub fn latest_known(db: &Database) -> Option<Version> {
    db.get(LATEST_VERSION_KEY)
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| Version::parse(&v).ok())
}

/// Compares the stored latest version with the running one. Never touches
/// the network.
pub fn is_update_available(db: &Database) -> bool {
    latest_known(db)
        .map(|latest| latest.is_newer_than(&Version::current()))
        .unwrap_or(false)
}
