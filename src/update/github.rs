/// GitHub Releases API client
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;

use super::error::UpdateError;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// The part of the `releases/latest` response we care about
#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Looks up the newest published release of one repository
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_base: String,
    repo_owner: String,
    repo_name: String,
    client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(repo_owner: String, repo_name: String) -> Result<Self, UpdateError> {
        Self::with_api_base(GITHUB_API_BASE, repo_owner, repo_name)
    }

    /// Client talking to a different API host (GitHub Enterprise, tests).
    pub fn with_api_base(
        api_base: &str,
        repo_owner: String,
        repo_name: String,
    ) -> Result<Self, UpdateError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("psm-update-check/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| UpdateError::Network(e.to_string()))?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            repo_owner,
            repo_name,
            client,
        })
    }

    pub fn repository(&self) -> String {
        format!("{}/{}", self.repo_owner, self.repo_name)
    }

    /// Tag name of the latest non-draft, non-prerelease release.
    pub async fn latest_release_tag(&self) -> Result<String, UpdateError> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, self.repo_owner, self.repo_name
        );
        tracing::debug!(%url, "Fetching latest release");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpdateError::Network(e.to_string()))?;

        self.check_rate_limit(&response)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UpdateError::GitHubApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let release: LatestRelease = response
            .json()
            .await
            .map_err(|e| UpdateError::GitHubApiError(format!("Failed to parse JSON: {}", e)))?;

        tracing::debug!(tag = %release.tag_name, repo = %self.repository(), "Latest release found");
        Ok(release.tag_name)
    }

    /// Check rate limiting headers and return error if exceeded
    fn check_rate_limit(&self, response: &reqwest::Response) -> Result<(), UpdateError> {
        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok());

        if remaining != Some(0) {
            return Ok(());
        }

        let reset_time = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
            .and_then(|timestamp| chrono::DateTime::from_timestamp(timestamp, 0))
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string());

        Err(UpdateError::RateLimitExceeded { reset_time })
    }
}
