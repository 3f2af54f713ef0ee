//! urlscan.io v1 client: scan submission and result retrieval.

use log::{debug, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::constants::URLSCAN_RESULT_PREFIX;
use crate::config::ProviderSettings;
use crate::error::{InitializationError, ProviderError};
use crate::initialization::init_client;
use crate::report::{rfc3339_to_millis, ProviderKind, Report, ScanStatus, UrlscanReport};
use crate::target::Target;

/// Client for urlscan.io's asynchronous scan API.
pub struct UrlscanClient {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl UrlscanClient {
    /// Builds a client from explicit settings.
    pub fn new(settings: ProviderSettings) -> Result<Self, InitializationError> {
        let http = init_client(settings.timeout)?;
        Ok(Self { http, settings })
    }

    /// Submits a target for scanning and returns immediately.
    ///
    /// On success the report is in the `Submitted` state and carries the
    /// provider-assigned scan id. Submission failure is the one urlscan
    /// condition reported as the error variant: without a scan id there is
    /// nothing for the caller to poll.
    pub async fn submit(&self, target: &Target) -> Report<UrlscanReport> {
        match self.try_submit(target).await {
            Ok(report) => Report::Populated(report),
            Err(e) => {
                warn!("urlscan.io submission failed: {e}");
                Report::error(format!(
                    "{} submission failed: {e}",
                    ProviderKind::Urlscan.display_name()
                ))
            }
        }
    }

    /// Fetches the current result for a scan id.
    ///
    /// Always returns a populated report: a 404 is the provider's expected
    /// "not indexed yet" answer (`Processing`), and any other failure maps
    /// to the terminal `Failed` state with the scan id preserved so the
    /// caller can still re-poll or link to the result page.
    pub async fn fetch_result(&self, scan_id: &str) -> Report<UrlscanReport> {
        match self.try_fetch(scan_id).await {
            Ok(report) => Report::Populated(report),
            Err(ProviderError::Status(StatusCode::NOT_FOUND)) => {
                debug!("urlscan.io scan {scan_id} not indexed yet");
                Report::Populated(UrlscanReport::processing(scan_id))
            }
            Err(e) => {
                warn!("urlscan.io result retrieval failed for {scan_id}: {e}");
                Report::Populated(UrlscanReport::failed(
                    scan_id,
                    format!("Error retrieving urlscan.io results: {e}"),
                ))
            }
        }
    }

    async fn try_submit(&self, target: &Target) -> Result<UrlscanReport, ProviderError> {
        let response = self
            .http
            .post(format!("{}/scan/", self.settings.base_url))
            .header("API-Key", &self.settings.api_key)
            .json(&SubmitRequest {
                url: target.normalized.clone(),
                visibility: "private",
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let parsed: SubmitResponse = response.json().await?;
        debug!("urlscan.io accepted {} as {}", target.normalized, parsed.uuid);
        Ok(UrlscanReport::submitted(parsed.uuid, parsed.result))
    }

    async fn try_fetch(&self, scan_id: &str) -> Result<UrlscanReport, ProviderError> {
        let response = self
            .http
            .get(format!("{}/result/{}/", self.settings.base_url, scan_id))
            .header("API-Key", &self.settings.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let parsed: ResultResponse = response.json().await?;
        let overall = parsed
            .verdicts
            .as_ref()
            .and_then(|v| v.overall.as_ref());
        let completed = overall.is_some();

        Ok(UrlscanReport {
            status: if completed {
                ScanStatus::Completed
            } else {
                ScanStatus::Pending
            },
            scan_id: Some(scan_id.to_string()),
            scan_url: Some(format!("{URLSCAN_RESULT_PREFIX}{scan_id}/")),
            screenshot_url: parsed.task.as_ref().and_then(|t| t.screenshot_url.clone()),
            score: overall.map(|o| o.score).unwrap_or(0),
            malicious: overall.map(|o| o.malicious).unwrap_or(false),
            categories: parsed
                .verdicts
                .as_ref()
                .map(|v| v.categories.clone())
                .unwrap_or_default(),
            tags: parsed
                .verdicts
                .as_ref()
                .map(|v| v.tags.clone())
                .unwrap_or_default(),
            scan_date: parsed
                .task
                .as_ref()
                .and_then(|t| t.time.as_deref())
                .and_then(rfc3339_to_millis),
            message: if completed {
                "Scan completed".to_string()
            } else {
                "Scan still processing".to_string()
            },
        })
    }
}

#[derive(Serialize)]
struct SubmitRequest {
    url: String,
    visibility: &'static str,
}

#[derive(Deserialize)]
struct SubmitResponse {
    uuid: String,
    /// URL of the eventual result page, if the provider includes it.
    result: Option<String>,
}

#[derive(Deserialize)]
struct ResultResponse {
    verdicts: Option<Verdicts>,
    task: Option<TaskInfo>,
}

#[derive(Deserialize)]
struct Verdicts {
    overall: Option<OverallVerdict>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct OverallVerdict {
    #[serde(default)]
    score: i64,
    #[serde(default)]
    malicious: bool,
}

#[derive(Deserialize)]
struct TaskInfo {
    time: Option<String>,
    #[serde(rename = "screenshotURL")]
    screenshot_url: Option<String>,
}
