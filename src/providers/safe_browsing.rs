//! Google Safe Browsing v4 client.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::constants::{SAFE_BROWSING_CLIENT_ID, SAFE_BROWSING_CLIENT_VERSION};
use crate::config::ProviderSettings;
use crate::error::{InitializationError, ProviderError};
use crate::initialization::init_client;
use crate::report::{ProviderKind, Report, SafeBrowsingReport};
use crate::target::Target;

/// Client for the Safe Browsing `threatMatches:find` lookup.
pub struct SafeBrowsingClient {
    http: reqwest::Client,
    settings: ProviderSettings,
}

impl SafeBrowsingClient {
    /// Builds a client from explicit settings.
    pub fn new(settings: ProviderSettings) -> Result<Self, InitializationError> {
        let http = init_client(settings.timeout)?;
        Ok(Self { http, settings })
    }

    /// Checks a target against Safe Browsing.
    ///
    /// Transport failures never escape: they become the error variant of
    /// the report, tagged with the provider name and the causal message.
    pub async fn check(&self, target: &Target) -> Report<SafeBrowsingReport> {
        match self.try_check(target).await {
            Ok(report) => Report::Populated(report),
            Err(e) => {
                warn!("Google Safe Browsing request failed: {e}");
                Report::error(format!(
                    "{} failed: {e}",
                    ProviderKind::GoogleSafeBrowsing.display_name()
                ))
            }
        }
    }

    async fn try_check(&self, target: &Target) -> Result<SafeBrowsingReport, ProviderError> {
        let body = ThreatMatchesRequest::for_url(&target.normalized);
        let response = self
            .http
            .post(format!("{}/threatMatches:find", self.settings.base_url))
            .query(&[("key", self.settings.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let parsed: ThreatMatchesResponse = response.json().await?;
        let mut threats: Vec<String> = Vec::new();
        for m in parsed.matches.unwrap_or_default() {
            if !threats.contains(&m.threat_type) {
                threats.push(m.threat_type);
            }
        }
        debug!(
            "Safe Browsing: {} threat match(es) for {}",
            threats.len(),
            target.normalized
        );
        Ok(SafeBrowsingReport {
            safe: threats.is_empty(),
            threats,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatchesRequest {
    client: ClientInfo,
    threat_info: ThreatInfo,
}

impl ThreatMatchesRequest {
    fn for_url(url: &str) -> Self {
        Self {
            client: ClientInfo {
                client_id: SAFE_BROWSING_CLIENT_ID,
                client_version: SAFE_BROWSING_CLIENT_VERSION,
            },
            threat_info: ThreatInfo {
                threat_types: vec![
                    "MALWARE",
                    "SOCIAL_ENGINEERING",
                    "UNWANTED_SOFTWARE",
                    "POTENTIALLY_HARMFUL_APPLICATION",
                ],
                platform_types: vec!["ANY_PLATFORM"],
                threat_entry_types: vec!["URL"],
                threat_entries: vec![ThreatEntry {
                    url: url.to_string(),
                }],
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_id: &'static str,
    client_version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo {
    threat_types: Vec<&'static str>,
    platform_types: Vec<&'static str>,
    threat_entry_types: Vec<&'static str>,
    threat_entries: Vec<ThreatEntry>,
}

#[derive(Serialize)]
struct ThreatEntry {
    url: String,
}

#[derive(Deserialize)]
struct ThreatMatchesResponse {
    matches: Option<Vec<ThreatMatch>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    threat_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = ThreatMatchesRequest::for_url("https://example.com");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["client"]["clientId"], SAFE_BROWSING_CLIENT_ID);
        assert_eq!(
            value["threatInfo"]["threatEntries"][0]["url"],
            "https://example.com"
        );
        assert_eq!(
            value["threatInfo"]["threatTypes"]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_response_without_matches_deserializes() {
        let parsed: ThreatMatchesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.matches.is_none());
    }

    #[test]
    fn test_response_with_matches_deserializes() {
        let parsed: ThreatMatchesResponse = serde_json::from_str(
            r#"{"matches":[{"threatType":"MALWARE","platformType":"ANY_PLATFORM"}]}"#,
        )
        .unwrap();
        let matches = parsed.matches.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].threat_type, "MALWARE");
    }
}
