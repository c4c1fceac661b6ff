//! Tracklist lookup with rate-limit retries, used by the batch importer.

use crate::client::CatalogClient;
use crate::error::UpstreamError;
use crate::models::ReleaseId;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Lower bound on any rate-limit wait.
    pub min_wait: Duration,
    /// Wait used when the server sends no `Retry-After`.
    pub default_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_wait: Duration::from_secs(5),
            default_wait: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    fn wait_for(&self, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or(self.default_wait).max(self.min_wait)
    }
}

/// Track titles of a release. Only HTTP 429 is retried; every other
/// failure is returned straight away.
pub async fn fetch_tracklist(
    client: &CatalogClient,
    id: ReleaseId,
    policy: &RetryPolicy,
) -> Result<Vec<String>, UpstreamError> {
    let mut attempt = 1;
    loop {
        match client.fetch_release_detail(id).await {
            Ok(detail) => return Ok(detail.track_titles()),
            Err(UpstreamError::RateLimited { retry_after, .. }) if attempt < policy.max_attempts => {
                let wait = policy.wait_for(retry_after);
                tracing::warn!(
                    "Rate limit hit (429) fetching release {}, sleeping {:?} (attempt {}/{})",
                    id,
                    wait,
                    attempt,
                    policy.max_attempts
                );
                tokio::time::sleep(wait).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
