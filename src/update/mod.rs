//! Release update notice
//!
//! Pages show an "update available" banner when a newer release of the
//! monitor has been published. Finding out requires a round trip to the
//! GitHub Releases API, so the answer is cached in the database and refreshed
//! at most once per check interval (a week by default). Rendering only reads
//! the cached values through [`is_update_available`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use psm::database::Database;
//! use psm::update::{is_update_available, UpdateChecker};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Arc::new(Database::open("data/config.json")?);
//! let checker = UpdateChecker::from_env()?;
//! checker.refresh_if_due(&db).await?;
//! if is_update_available(&db) {
//!     println!("A new release is out");
//! }
//! # Ok(())
//! # }
//! ```

mod checker;
mod error;
mod github;
mod version;

use std::sync::Arc;
use std::time::Duration;

pub use checker::{
    is_update_available, last_checked, latest_known, record_latest, UpdateChecker,
    LAST_CHECK_KEY, LATEST_VERSION_KEY,
};
pub use error::UpdateError;
pub use github::{GitHubClient, GITHUB_API_BASE};
pub use version::Version;

use crate::config::parse_flag;
use crate::database::Database;

/// How often the background task wakes up to see whether a check is due.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Configuration key that turns the update notice on or off.
pub const SHOW_UPDATE_KEY: &str = "show_update";

/// Keep the cached release version fresh while the server runs. Checks are
/// skipped while the update notice is switched off.
pub fn spawn_background_checks(
    checker: Arc<UpdateChecker>,
    db: Arc<Database>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;

            let enabled = db.get(SHOW_UPDATE_KEY).map(|v| parse_flag(&v)).unwrap_or(false);
            if !enabled {
                tracing::trace!("Update notice disabled; skipping check");
                continue;
            }

            if let Err(e) = checker.refresh_if_due(&db).await {
                tracing::error!(%e, "Background update check failed");
            }
        }
    })
}
