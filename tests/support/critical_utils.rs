//! Shared utilities for critical tests (corrupted logs, flaky network).
//!
//! Used by tests under `tests/critical/` to seed broken download logs and to
//! mount endpoints that fail a fixed number of times before recovering.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use nitter_dl::ScraperConfig;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Writes `contents` as the download log of user `jack` under a fresh temp dir.
///
/// Returns the `TempDir` (keep it alive) and the log path.
pub fn seeded_log(contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let user_dir = temp_dir.path().join("jack");
    std::fs::create_dir_all(&user_dir).expect("Failed to create user dir");
    let log_path = user_dir.join("download_log.json");
    std::fs::write(&log_path, contents).expect("Failed to write log file");
    (temp_dir, log_path)
}

/// Crawl settings for user `jack` on `server` with no delays.
pub fn fast_config(server: &MockServer, temp_dir: &TempDir, max_pages: u32) -> ScraperConfig {
    ScraperConfig {
        username: "jack".to_string(),
        instance: server.uri(),
        output_dir: temp_dir.path().to_path_buf(),
        max_pages,
        page_delay: Duration::ZERO,
        download_delay: Duration::ZERO,
        request_timeout: Duration::from_secs(2),
        ..ScraperConfig::default()
    }
}

/// Responds with `failure_status` for the first `failures` calls, then with `success`.
pub struct FlakyResponder {
    calls: Arc<AtomicUsize>,
    failures: usize,
    failure_status: u16,
    success: ResponseTemplate,
}

impl FlakyResponder {
    pub fn new(failures: usize, failure_status: u16, success: ResponseTemplate) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            failures,
            failure_status,
            success,
        }
    }

    /// Shared call counter, readable after the responder is mounted.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Respond for FlakyResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            ResponseTemplate::new(self.failure_status)
        } else {
            self.success.clone()
        }
    }
}

/// Mounts a `GET route` endpoint that fails `failures` times before serving `success`.
pub async fn mount_flaky(
    server: &MockServer,
    route: &str,
    failures: usize,
    success: ResponseTemplate,
) -> Arc<AtomicUsize> {
    let responder = FlakyResponder::new(failures, 503, success);
    let calls = responder.calls();
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(responder)
        .mount(server)
        .await;
    calls
}

/// A small JPEG-typed response.
pub fn jpeg() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "image/jpeg")
        .set_body_bytes(b"\xFF\xD8\xFF\xE0".to_vec())
}

/// Listing markup with one media anchor per href.
pub fn listing(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a class="still-image" href="{href}"></a>"#))
        .collect();
    format!("<html><body>{anchors}</body></html>")
}
