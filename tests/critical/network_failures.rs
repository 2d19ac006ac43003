//! Phase 2 (P0): transient and permanent network failures during a crawl.

use std::sync::atomic::Ordering;
use std::time::Duration;

use nitter_dl::{Crawler, DownloadLog, NoopProgress, StopReason};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::critical_utils::{fast_config, jpeg, listing, mount_flaky};

#[tokio::test]
async fn p0_listing_page_recovers_after_two_failures() {
    let server = MockServer::start().await;
    let page_calls = mount_flaky(
        &server,
        "/jack",
        2,
        ResponseTemplate::new(200).set_body_string(listing(&["/pic/a.jpg"])),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/pic/a.jpg"))
        .respond_with(jpeg())
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let summary = Crawler::new(fast_config(&server, &dir, 1))
        .expect("crawler")
        .run(&NoopProgress)
        .await
        .expect("crawl");

    assert_eq!(page_calls.load(Ordering::SeqCst), 3);
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.downloaded, 1);
}

#[tokio::test]
async fn p0_image_recovers_after_two_failures_without_error_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jack"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&["/pic/b.jpg"])))
        .mount(&server)
        .await;
    let image_calls = mount_flaky(&server, "/pic/b.jpg", 2, jpeg()).await;

    let dir = TempDir::new().expect("temp dir");
    let config = fast_config(&server, &dir, 1);
    let log_path = config.log_path();
    let summary = Crawler::new(config)
        .expect("crawler")
        .run(&NoopProgress)
        .await
        .expect("crawl");

    assert_eq!(image_calls.load(Ordering::SeqCst), 3);
    assert_eq!(summary.downloaded, 1);
    let log = DownloadLog::open(&log_path).expect("log");
    assert!(log.errors().is_empty());
}

#[tokio::test]
async fn p0_listing_timeout_ends_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jack"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing(&["/pic/slow.jpg"]))
                .set_delay(Duration::from_secs(5)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let mut config = fast_config(&server, &dir, 2);
    config.request_timeout = Duration::from_millis(200);
    let summary = Crawler::new(config)
        .expect("crawler")
        .run(&NoopProgress)
        .await
        .expect("crawl");

    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.stop_reason, StopReason::PageUnavailable { page: 1 });
}

#[tokio::test]
async fn p0_unreachable_instance_ends_crawl_cleanly() {
    // Grab a free port and release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let server = MockServer::start().await;
    let dir = TempDir::new().expect("temp dir");
    let mut config = fast_config(&server, &dir, 1);
    config.instance = format!("http://127.0.0.1:{port}");

    let summary = Crawler::new(config)
        .expect("crawler")
        .run(&NoopProgress)
        .await
        .expect("crawl");
    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.stop_reason, StopReason::PageUnavailable { page: 1 });
}
