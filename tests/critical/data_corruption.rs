//! Corrupted download logs must abort the run and stay byte-for-byte intact.

use nitter_dl::{CrawlError, Crawler, DownloadLog, NoopProgress};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::critical_utils::{fast_config, seeded_log};

#[test]
fn p0_truncated_log_is_reported_and_untouched() {
    let original = br#"{"created_at": "2024-01-01T00:00:00Z", "downloaded": {"#;
    let (_dir, log_path) = seeded_log(original);

    let err = DownloadLog::open(&log_path).expect_err("truncated log must not open");
    assert!(err.is_corrupt());
    assert_eq!(std::fs::read(&log_path).expect("read log"), original);
}

#[test]
fn p0_binary_garbage_log_is_reported_and_untouched() {
    let original = b"\x00\x01\x02 not json at all \xFF";
    let (_dir, log_path) = seeded_log(original);

    assert!(DownloadLog::open(&log_path).expect_err("garbage log").is_corrupt());
    assert_eq!(std::fs::read(&log_path).expect("read log"), original);
}

#[test]
fn p0_wrong_value_types_are_corrupt() {
    let original = br#"{
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "downloaded": {},
        "errors": {"https://nitter.net/pic/a.jpg?name=orig": "three"}
    }"#;
    let (_dir, log_path) = seeded_log(original);

    assert!(DownloadLog::open(&log_path).expect_err("bad counter").is_corrupt());
    assert_eq!(std::fs::read(&log_path).expect("read log"), original);
}

#[tokio::test]
async fn p0_crawl_with_corrupt_log_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (dir, log_path) = seeded_log(b"[]");
    let crawler = Crawler::new(fast_config(&server, &dir, 3)).expect("crawler");

    let err = crawler.run(&NoopProgress).await.expect_err("corrupt log");
    assert!(matches!(err, CrawlError::Log(ref e) if e.is_corrupt()));
    assert_eq!(std::fs::read(&log_path).expect("read log"), b"[]");
}
