//! Listing page retrieval.

use tracing::{debug, instrument, warn};
use url::Url;

use crate::download::{HttpClient, RetryDecision, RetryPolicy};

/// Fetches profile listing pages with bounded retries.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: HttpClient,
    instance: Url,
    retry: RetryPolicy,
}

impl PageFetcher {
    /// Creates a fetcher for profiles on `instance`.
    #[must_use]
    pub fn new(client: HttpClient, instance: Url, retry: RetryPolicy) -> Self {
        Self {
            client,
            instance,
            retry,
        }
    }

    /// URL of listing page `page` for `username`; page 1 is the bare profile.
    #[must_use]
    pub fn page_url(&self, username: &str, page: u32) -> String {
        let base = self.instance.as_str().trim_end_matches('/');
        if page <= 1 {
            format!("{base}/{username}")
        } else {
            format!("{base}/{username}?page={page}")
        }
    }

    /// Returns the page markup, or `None` once retries are exhausted or the
    /// page is empty.
    ///
    /// Failures never propagate; `None` is the only failure signal.
    #[instrument(skip(self))]
    pub async fn fetch(&self, username: &str, page: u32) -> Option<String> {
        let url = self.page_url(username, page);
        let mut attempt = 1;
        loop {
            match self.client.get_text(&url).await {
                Ok(body) if body.trim().is_empty() => {
                    debug!(url = %url, "listing page is empty");
                    return None;
                }
                Ok(body) => {
                    debug!(url = %url, bytes = body.len(), attempt, "listing page fetched");
                    return Some(body);
                }
                Err(error) => {
                    warn!(url = %url, attempt, error = %error, "listing page fetch failed");
                    match self.retry.should_retry(attempt) {
                        RetryDecision::Retry {
                            delay,
                            attempt: next,
                        } => {
                            tokio::time::sleep(delay).await;
                            attempt = next;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            warn!(url = %url, reason = %reason, "giving up on listing page");
                            return None;
                        }
                    }
                }
            }
        }
    }
}
