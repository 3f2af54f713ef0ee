//! Integration tests for the asynchronous scan lifecycle.
//!
//! Covers the non-blocking mode: submit during an assessment, then poll
//! the scan status by id until a terminal state, and merge the terminal
//! verdict back into the report bundle.

use std::time::Duration;

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use url_sentinel::{
    overall_safety, AssessOptions, Orchestrator, ProviderSettings, Providers, Report, ScanStatus,
    UrlscanReport,
};

fn test_orchestrator(gsb: &MockServer, vt: &MockServer, us: &MockServer) -> Orchestrator {
    let providers = Providers {
        safe_browsing: ProviderSettings::new(gsb.uri(), "test-key"),
        virus_total: ProviderSettings::new(vt.uri(), "test-key"),
        urlscan: ProviderSettings::new(us.uri(), "test-key"),
    };
    Orchestrator::new(providers)
        .expect("failed to build orchestrator")
        .with_urlscan_wait(Duration::from_millis(10))
}

async fn mount_clean_sync_providers(gsb: &MockServer, vt: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/threatMatches:find"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(gsb)
        .await;
    Mock::given(method("GET"))
        .and(path_regex("^/urls/.+$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(vt)
        .await;
}

#[tokio::test]
async fn test_poll_is_idempotent_until_terminal() {
    let (gsb, vt, us) = (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    );
    mount_clean_sync_providers(&gsb, &vt).await;
    Mock::given(method("POST"))
        .and(path("/scan/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uuid": "abc-123",
            "result": "https://urlscan.io/result/abc-123/"
        })))
        .mount(&us)
        .await;
    // First two polls: the provider has not indexed the scan yet.
    Mock::given(method("GET"))
        .and(path("/result/abc-123/"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(2)
        .mount(&us)
        .await;
    // Subsequent polls: terminal verdict.
    Mock::given(method("GET"))
        .and(path("/result/abc-123/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "task": {"time": "2026-08-24T10:00:00Z"},
            "verdicts": {"overall": {"score": 91, "malicious": true}}
        })))
        .mount(&us)
        .await;

    let orchestrator = test_orchestrator(&gsb, &vt, &us);
    let mut assessment = orchestrator
        .assess("example.com", AssessOptions::default())
        .await
        .unwrap();
    assert!(assessment.is_safe); // provisional: no verdict yet

    let scan_id = assessment
        .external_reports
        .urlscan
        .populated()
        .and_then(|scan| scan.scan_id.clone())
        .unwrap();

    // Re-polling a non-terminal scan is safe to repeat.
    for _ in 0..2 {
        let polled = orchestrator.poll_scan_status(&scan_id).await;
        let scan = polled.populated().unwrap();
        assert_eq!(scan.status, ScanStatus::Processing);
        assert!(!scan.status.is_terminal());
    }

    // Once the provider finishes, the poll returns the terminal state.
    let polled = orchestrator.poll_scan_status(&scan_id).await;
    let terminal = polled.populated().unwrap().clone();
    assert_eq!(terminal.status, ScanStatus::Completed);
    assert!(terminal.malicious);
    assert_eq!(terminal.score, 91);

    // A caller merging the completed verdict must end up with an unsafe
    // overall verdict, even though the initial assessment was safe.
    let submission = assessment.external_reports.urlscan.populated().unwrap().clone();
    assessment.external_reports.urlscan =
        Report::Populated(UrlscanReport::merged_with(&submission, terminal));
    assert!(!overall_safety(&assessment.external_reports));
}

#[tokio::test]
async fn test_poll_failure_is_terminal_and_keeps_scan_id() {
    let (gsb, vt, us) = (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    );
    mount_clean_sync_providers(&gsb, &vt).await;
    Mock::given(method("GET"))
        .and(path("/result/broken-456/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&us)
        .await;

    let orchestrator = test_orchestrator(&gsb, &vt, &us);
    let polled = orchestrator.poll_scan_status("broken-456").await;
    let scan = polled.populated().unwrap();
    assert_eq!(scan.status, ScanStatus::Failed);
    assert!(scan.status.is_terminal());
    // The scan id and result URL survive so the caller can still link or
    // re-poll manually.
    assert_eq!(scan.scan_id.as_deref(), Some("broken-456"));
    assert!(scan.scan_url.is_some());
    assert!(scan.message.contains("urlscan.io"));
}

#[tokio::test]
async fn test_submission_failure_is_error_variant() {
    let (gsb, vt, us) = (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    );
    mount_clean_sync_providers(&gsb, &vt).await;
    Mock::given(method("POST"))
        .and(path("/scan/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&us)
        .await;

    let orchestrator = test_orchestrator(&gsb, &vt, &us);
    let assessment = orchestrator
        .assess("example.com", AssessOptions::default())
        .await
        .unwrap();

    // Without a scan id there is nothing to poll: submission failure is
    // the error variant, and the verdict is fail-closed.
    let error = assessment.external_reports.urlscan.error_message().unwrap();
    assert!(error.starts_with("urlscan.io submission failed"));
    assert!(!assessment.is_safe);
}
