//! Provider settings: base endpoint, credential, and timeout per provider.
//!
//! Every provider client is constructed from an explicit [`ProviderSettings`]
//! value instead of reading globals, so tests can point clients at mock
//! servers and no hidden process-wide state exists.

use std::time::Duration;

use crate::config::constants::{
    DEFAULT_PROVIDER_TIMEOUT_SECS, SAFE_BROWSING_BASE_URL, URLSCAN_BASE_URL, VIRUSTOTAL_BASE_URL,
};
use crate::error::InitializationError;

/// Connection settings for one external provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Base URL of the provider's API, without a trailing slash.
    pub base_url: String,
    /// API key passed as a header or query parameter, per provider.
    pub api_key: String,
    /// Request timeout enforced by this provider's HTTP client.
    pub timeout: Duration,
}

impl ProviderSettings {
    /// Creates settings with the default 10-second timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Settings for all three external providers.
#[derive(Debug, Clone)]
pub struct Providers {
    /// Google Safe Browsing v4.
    pub safe_browsing: ProviderSettings,
    /// VirusTotal v3.
    pub virus_total: ProviderSettings,
    /// urlscan.io v1.
    pub urlscan: ProviderSettings,
}

impl Providers {
    /// Builds provider settings from the environment.
    ///
    /// Reads `GOOGLE_API_KEY`, `VIRUSTOTAL_API_KEY`, and `URL_SCAN_IO`
    /// against the public provider endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError::MissingCredential`] naming the first
    /// missing environment variable.
    pub fn from_env() -> Result<Self, InitializationError> {
        Ok(Self {
            safe_browsing: ProviderSettings::new(
                SAFE_BROWSING_BASE_URL,
                require_env("GOOGLE_API_KEY")?,
            ),
            virus_total: ProviderSettings::new(
                VIRUSTOTAL_BASE_URL,
                require_env("VIRUSTOTAL_API_KEY")?,
            ),
            urlscan: ProviderSettings::new(URLSCAN_BASE_URL, require_env("URL_SCAN_IO")?),
        })
    }

    /// Applies the same request timeout to all three providers.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.safe_browsing.timeout = timeout;
        self.virus_total.timeout = timeout;
        self.urlscan.timeout = timeout;
        self
    }
}

fn require_env(name: &'static str) -> Result<String, InitializationError> {
    std::env::var(name).map_err(|_| InitializationError::MissingCredential(name))
}
