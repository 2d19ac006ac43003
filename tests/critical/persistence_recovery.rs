//! The download log persists after every mutation and survives reopening.

use nitter_dl::DownloadLog;
use tempfile::TempDir;

#[test]
fn p0_log_state_persists_after_reopen() {
    let temp_dir = TempDir::new().expect("temp dir");
    let log_path = temp_dir.path().join("download_log.json");

    {
        let mut log = DownloadLog::open(&log_path).expect("create log");
        log.record_success("https://nitter.net/pic/a.jpg?name=orig", "a.jpg")
            .expect("record success");
        log.record_failure("https://nitter.net/pic/b.jpg?name=orig")
            .expect("record failure");
        // Dropped without any explicit save.
    }

    let log = DownloadLog::open(&log_path).expect("reopen log");
    assert_eq!(
        log.filename_for("https://nitter.net/pic/a.jpg?name=orig"),
        Some("a.jpg")
    );
    assert_eq!(log.failure_count("https://nitter.net/pic/b.jpg?name=orig"), 1);
}

#[test]
fn p0_failure_counts_accumulate_across_runs() {
    let temp_dir = TempDir::new().expect("temp dir");
    let log_path = temp_dir.path().join("download_log.json");
    let url = "https://nitter.net/pic/flaky.jpg?name=orig";

    for _ in 0..3 {
        let mut log = DownloadLog::open(&log_path).expect("open log");
        log.record_failure(url).expect("record failure");
    }

    let log = DownloadLog::open(&log_path).expect("reopen log");
    assert_eq!(log.failure_count(url), 3);
    assert!(!log.has(url));
}

#[test]
fn p0_created_at_survives_reopen_and_updates() {
    let temp_dir = TempDir::new().expect("temp dir");
    let log_path = temp_dir.path().join("download_log.json");

    let created = DownloadLog::open(&log_path).expect("create").created_at();
    let mut log = DownloadLog::open(&log_path).expect("reopen");
    log.record_success("https://nitter.net/pic/c.jpg?name=orig", "c.jpg")
        .expect("record");

    let log = DownloadLog::open(&log_path).expect("reopen again");
    assert_eq!(log.created_at(), created);
    assert!(log.updated_at() >= created);
}
