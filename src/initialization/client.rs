//! HTTP client initialization.

use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::constants::{TCP_CONNECT_TIMEOUT_SECS, USER_AGENT};
use crate::error::InitializationError;

/// Builds the HTTP client used by one provider.
///
/// The request timeout is the provider's own bound; the TCP connect
/// timeout is shorter so unreachable hosts fail fast instead of consuming
/// the full request budget.
///
/// # Errors
///
/// Returns `InitializationError::HttpClient` if client creation fails.
pub fn init_client(timeout: Duration) -> Result<reqwest::Client, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}
