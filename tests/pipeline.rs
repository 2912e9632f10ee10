//! Library-level pipeline tests against a local HTTP server and temp files.

use hostblock::backup::{SnapshotStore, ROLLING_BACKUP_FILE};
use hostblock::config::{CategorySelection, Config};
use hostblock::extractor::{extract, DomainSet};
use hostblock::fetcher::Fetcher;
use hostblock::fs_abstraction::RealFileSystem;
use hostblock::hosts::HostsFile;
use hostblock::{HostblockError, Pipeline, Stage};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOSTS: &str = "127.0.0.1 localhost\n";

fn temp_hosts() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let hosts = dir.path().join("hosts");
    let state = dir.path().join("state");
    std::fs::write(&hosts, HOSTS).unwrap();
    (dir, hosts, state)
}

async fn serve(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[test]
fn test_extract_known_sample() {
    let domains = extract("0.0.0.0 ads.example.com\n127.0.0.1 track.example.com\n");
    let expected: DomainSet = ["ads.example.com", "track.example.com"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(domains, expected);
}

#[test]
fn test_append_tail_contains_exactly_new_lines() {
    let (_dir, hosts, _) = temp_hosts();
    let fs = RealFileSystem;
    let domains: DomainSet = ["a.com", "b.com"].iter().map(|s| s.to_string()).collect();

    HostsFile::new(&fs, &hosts).append(&domains).unwrap();

    let content = std::fs::read_to_string(&hosts).unwrap();
    let tail = content.strip_prefix(HOSTS).unwrap();
    let mut lines: Vec<&str> = tail.lines().collect();
    lines.sort();
    assert_eq!(lines, vec!["0.0.0.0 a.com", "0.0.0.0 b.com"]);
}

#[test]
fn test_restore_returns_exact_pre_backup_bytes() {
    let (_dir, hosts, state) = temp_hosts();
    let original = b"127.0.0.1 localhost\r\n# crlf and no trailing newline".to_vec();
    std::fs::write(&hosts, &original).unwrap();

    let fs = RealFileSystem;
    let store = SnapshotStore::new(&fs, &state);
    store.backup(&hosts).unwrap();
    std::fs::write(&hosts, "garbage").unwrap();
    store.restore(&hosts).unwrap();

    assert_eq!(std::fs::read(&hosts).unwrap(), original);
}

#[tokio::test]
async fn test_update_over_http() {
    let server = MockServer::start().await;
    serve(&server, "/ads", "0.0.0.0 ads.example.com\n").await;
    serve(&server, "/malware", "127.0.0.1 evil.example.com\n# 0.0.0.0 commented.com\n").await;

    let config = Config {
        ad_block_lists: vec![format!("{}/ads", server.uri())],
        malware_block_lists: vec![format!("{}/malware", server.uri())],
        ..Default::default()
    };
    let (_dir, hosts, state) = temp_hosts();
    let fs = RealFileSystem;
    let fetcher = Fetcher::new().unwrap();
    let mut pipeline = Pipeline::new(&config, &fs, &fetcher, &hosts, &state);

    let report = pipeline.update(&CategorySelection::all()).await.unwrap();

    assert_eq!(pipeline.stage(), Stage::Done);
    assert_eq!(report.appended, 2);
    assert_eq!(
        std::fs::read_to_string(&hosts).unwrap(),
        format!("{}0.0.0.0 ads.example.com\n0.0.0.0 evil.example.com\n", HOSTS)
    );
    assert_eq!(
        std::fs::read_to_string(state.join(ROLLING_BACKUP_FILE)).unwrap(),
        HOSTS
    );
}

#[tokio::test]
async fn test_update_only_selected_categories_are_fetched() {
    let server = MockServer::start().await;
    serve(&server, "/ads", "0.0.0.0 ads.example.com\n").await;
    Mock::given(method("GET"))
        .and(path("/tracking"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config {
        ad_block_lists: vec![format!("{}/ads", server.uri())],
        tracking_block_lists: vec![format!("{}/tracking", server.uri())],
        ..Default::default()
    };
    let (_dir, hosts, state) = temp_hosts();
    let fs = RealFileSystem;
    let fetcher = Fetcher::new().unwrap();
    let mut pipeline = Pipeline::new(&config, &fs, &fetcher, &hosts, &state);

    let report = pipeline
        .update(&CategorySelection::new(true, false, false, false))
        .await
        .unwrap();
    assert_eq!(report.sources.len(), 1);
}

#[tokio::test]
async fn test_update_with_no_flags_leaves_hosts_identical() {
    let config = Config::starter();
    let (_dir, hosts, state) = temp_hosts();
    let before = std::fs::read(&hosts).unwrap();

    let fs = RealFileSystem;
    let fetcher = Fetcher::new().unwrap();
    let mut pipeline = Pipeline::new(&config, &fs, &fetcher, &hosts, &state);

    let err = pipeline
        .update(&CategorySelection::default())
        .await
        .unwrap_err();

    assert!(matches!(err.source, HostblockError::NoListsSelected));
    assert_eq!(std::fs::read(&hosts).unwrap(), before);
}

#[tokio::test]
async fn test_update_unreachable_lists_fail_before_backup() {
    let config = Config {
        ad_block_lists: vec!["http://127.0.0.1:9/hosts".to_string()],
        ..Default::default()
    };
    let (_dir, hosts, state) = temp_hosts();
    let fs = RealFileSystem;
    let fetcher = Fetcher::with_timeout(Duration::from_secs(2)).unwrap();
    let mut pipeline = Pipeline::new(&config, &fs, &fetcher, &hosts, &state);

    let err = pipeline
        .update(&CategorySelection::all())
        .await
        .unwrap_err();

    assert_eq!(err.stage, Stage::Fetching);
    assert!(matches!(err.source, HostblockError::AllFetchesFailed(1)));
    assert_eq!(std::fs::read_to_string(&hosts).unwrap(), HOSTS);
    assert!(!state.join(ROLLING_BACKUP_FILE).exists());
}

#[tokio::test]
async fn test_bad_url_in_unselected_category_does_not_block_update() {
    let server = MockServer::start().await;
    serve(&server, "/ads", "0.0.0.0 ads.example.com\n").await;

    let config = Config::from_json(&format!(
        r#"{{"ad_block_lists": ["{}/ads"],
            "malicious_block_lists": ["ftp://evil.example/hosts", "HTTPS://evil.example/hosts"]}}"#,
        server.uri()
    ))
    .unwrap();
    let (_dir, hosts, state) = temp_hosts();
    let fs = RealFileSystem;
    let fetcher = Fetcher::new().unwrap();
    let mut pipeline = Pipeline::new(&config, &fs, &fetcher, &hosts, &state);

    let report = pipeline
        .update(&CategorySelection::new(true, false, false, false))
        .await
        .unwrap();

    assert_eq!(report.appended, 1);
    assert!(report.outcome.failed.is_empty());
}

#[tokio::test]
async fn test_bad_url_in_selected_category_is_skipped() {
    let server = MockServer::start().await;
    serve(&server, "/ads", "0.0.0.0 ads.example.com\n").await;

    let config = Config::from_json(&format!(
        r#"{{"ad_block_lists": ["ftp://ads.example/hosts", "{}/ads"]}}"#,
        server.uri()
    ))
    .unwrap();
    let (_dir, hosts, state) = temp_hosts();
    let fs = RealFileSystem;
    let fetcher = Fetcher::new().unwrap();
    let mut pipeline = Pipeline::new(&config, &fs, &fetcher, &hosts, &state);

    let report = pipeline.update(&CategorySelection::all()).await.unwrap();

    assert_eq!(report.outcome.failed.len(), 1);
    assert_eq!(report.outcome.failed[0].source.url, "ftp://ads.example/hosts");
    assert!(matches!(
        report.outcome.failed[0].error,
        HostblockError::Network { .. }
    ));
    assert_eq!(report.appended, 1);
}
