/// Error types for the update check
use thiserror::Error;

/// Errors that can occur while looking for a newer release
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// GitHub API rate limit exceeded
    #[error("GitHub API rate limit exceeded. Resets at {reset_time}")]
    RateLimitExceeded {
        /// Time when the rate limit resets (RFC 3339)
        reset_time: String,
    },

    /// Invalid version format
    #[error("Invalid version format: {0}")]
    InvalidVersion(String),

    /// GitHub API returned an error
    #[error("GitHub API error: {0}")]
    GitHubApiError(String),

    /// Checked versions could not be stored
    #[error("Failed to store update check: {0}")]
    Storage(#[from] crate::database::DatabaseError),

    /// The blocking write of the data file did not finish
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
