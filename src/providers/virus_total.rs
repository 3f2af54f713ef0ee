//! VirusTotal v3 client.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use log::{debug, warn};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::ProviderSettings;
use crate::error::{InitializationError, ProviderError};
use crate::initialization::init_client;
use crate::report::{seconds_to_millis, ProviderKind, Report, VirusTotalReport};
use crate::target::Target;

/// Client for the VirusTotal `/urls/{id}` lookup.
pub struct VirusTotalClient {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl VirusTotalClient {
    /// Builds a client from explicit settings.
    pub fn new(settings: ProviderSettings) -> Result<Self, InitializationError> {
        let http = init_client(settings.timeout)?;
        Ok(Self { http, settings })
    }

    /// Looks up a target's detection counts.
    ///
    /// A 404 means VirusTotal has never seen the URL; that is a populated
    /// zero-count report, not an error. Likewise for a response without
    /// analysis data. Only transport failures and other non-2xx statuses
    /// become the error variant.
    pub async fn check(&self, target: &Target) -> Report<VirusTotalReport> {
        match self.try_check(target).await {
            Ok(report) => Report::Populated(report),
            Err(ProviderError::Status(StatusCode::NOT_FOUND)) => {
                debug!("VirusTotal has no record of {}", target.normalized);
                Report::Populated(VirusTotalReport::not_found())
            }
            Err(e) => {
                warn!("VirusTotal request failed: {e}");
                Report::error(format!(
                    "{} failed: {e}",
                    ProviderKind::VirusTotal.display_name()
                ))
            }
        }
    }

    async fn try_check(&self, target: &Target) -> Result<VirusTotalReport, ProviderError> {
        // VirusTotal identifies URLs by their unpadded URL-safe base64 form.
        let url_id = URL_SAFE_NO_PAD.encode(target.normalized.as_bytes());
        let response = self
            .http
            .get(format!("{}/urls/{}", self.settings.base_url, url_id))
            .header("x-apikey", &self.settings.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let parsed: VtResponse = response.json().await?;
        let Some(attributes) = parsed.data.and_then(|d| d.attributes) else {
            return Ok(VirusTotalReport::no_analysis());
        };

        let stats = attributes.last_analysis_stats.unwrap_or_default();
        let total = attributes
            .last_analysis_results
            .map(|results| results.len() as u32)
            .unwrap_or(0);
        Ok(VirusTotalReport {
            positives: stats.malicious + stats.suspicious,
            total,
            scan_date: attributes.last_analysis_date.map(seconds_to_millis),
            message: None,
        })
    }
}

#[derive(Deserialize)]
struct VtResponse {
    data: Option<VtData>,
}

#[derive(Deserialize)]
struct VtData {
    attributes: Option<VtAttributes>,
}

#[derive(Deserialize)]
struct VtAttributes {
    last_analysis_stats: Option<VtStats>,
    last_analysis_results: Option<HashMap<String, serde_json::Value>>,
    /// Epoch seconds in VirusTotal's native representation.
    last_analysis_date: Option<i64>,
}

#[derive(Deserialize, Default)]
struct VtStats {
    #[serde(default)]
    malicious: u32,
    #[serde(default)]
    suspicious: u32,
}
