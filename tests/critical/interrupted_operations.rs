//! Phase 5 (P1): a rerun after an interrupted or partial run picks up where it stopped.

use nitter_dl::{Crawler, DownloadLog, NoopProgress};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::critical_utils::{fast_config, jpeg, listing};

#[tokio::test]
async fn p1_second_run_downloads_only_what_the_first_missed() {
    let dir = TempDir::new().expect("temp dir");

    // First run: one image permanently broken.
    let first = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jack"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing(&["/pic/ok.jpg", "/pic/late.jpg"])),
        )
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/pic/ok.jpg"))
        .respond_with(jpeg())
        .expect(1)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/pic/late.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&first)
        .await;

    let summary = Crawler::new(fast_config(&first, &dir, 1))
        .expect("crawler")
        .run(&NoopProgress)
        .await
        .expect("first run");
    assert_eq!((summary.downloaded, summary.failed), (1, 1));

    // Second run against the same instance URL: only the failed image is requested.
    first.verify().await;
    first.reset().await;
    Mock::given(method("GET"))
        .and(path("/jack"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(listing(&["/pic/ok.jpg", "/pic/late.jpg"])),
        )
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/pic/ok.jpg"))
        .respond_with(jpeg())
        .expect(0)
        .mount(&first)
        .await;
    Mock::given(method("GET"))
        .and(path("/pic/late.jpg"))
        .respond_with(jpeg())
        .expect(1)
        .mount(&first)
        .await;

    let config = fast_config(&first, &dir, 1);
    let log_path = config.log_path();
    let summary = Crawler::new(config)
        .expect("crawler")
        .run(&NoopProgress)
        .await
        .expect("second run");
    assert_eq!((summary.skipped, summary.downloaded), (1, 1));

    let log = DownloadLog::open(&log_path).expect("log");
    let late = format!("{}/pic/late.jpg?name=orig", first.uri());
    assert!(log.has(&late));
    // The earlier failure stays on record.
    assert_eq!(log.failure_count(&late), 1);
}

#[tokio::test]
async fn p1_stray_partial_file_is_overwritten() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jack"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing(&["/pic/part.jpg"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pic/part.jpg"))
        .respond_with(jpeg())
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let user_dir = dir.path().join("jack");
    std::fs::create_dir_all(&user_dir).expect("user dir");
    std::fs::write(user_dir.join("part.jpg"), b"half").expect("stray file");

    Crawler::new(fast_config(&server, &dir, 1))
        .expect("crawler")
        .run(&NoopProgress)
        .await
        .expect("crawl");

    assert_eq!(
        std::fs::read(user_dir.join("part.jpg")).expect("image"),
        b"\xFF\xD8\xFF\xE0"
    );
}
