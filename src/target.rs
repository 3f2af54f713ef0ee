//! Target URL validation and normalization.

use log::warn;
use serde::Serialize;
use url::Url;

use crate::config::constants::MAX_URL_LENGTH;
use crate::error::TargetError;

/// The URL under assessment.
///
/// Normalization defaults the scheme to `https` when missing, strips the
/// fragment and any trailing slash, and lowercases the host (the `url`
/// crate does this during parsing). Normalization is idempotent: parsing
/// an already-normalized URL yields the same string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    /// The caller's original input, untouched.
    pub original: String,
    /// Normalized absolute URL used for provider requests and cache keys.
    pub normalized: String,
    /// Hostname derived from the normalized URL.
    pub domain: String,
}

impl Target {
    /// Validates and normalizes a URL.
    ///
    /// # Errors
    ///
    /// Rejects input exceeding [`MAX_URL_LENGTH`], syntactically invalid
    /// URLs, non-http(s) schemes, and URLs without a hostname.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let input = input.trim();
        if input.len() > MAX_URL_LENGTH {
            warn!(
                "rejecting URL exceeding maximum length ({} > {})",
                input.len(),
                MAX_URL_LENGTH
            );
            return Err(TargetError::TooLong {
                len: input.len(),
                max: MAX_URL_LENGTH,
            });
        }

        // Default the scheme to https when missing. Scheme detection is
        // case-insensitive; Url::parse lowercases it during parsing.
        let lower = input.to_ascii_lowercase();
        let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
            input.to_string()
        } else {
            format!("https://{input}")
        };

        let parsed = Url::parse(&candidate)?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                warn!("rejecting unsupported scheme for URL: {input}");
                return Err(TargetError::UnsupportedScheme(other.to_string()));
            }
        }
        let domain = parsed
            .host_str()
            .ok_or(TargetError::MissingHost)?
            .to_string();

        // Rebuild scheme://host[:port]path[?query], dropping the fragment,
        // then strip the trailing slash.
        let mut normalized = format!("{}://{}", parsed.scheme(), domain);
        if let Some(port) = parsed.port() {
            normalized.push(':');
            normalized.push_str(&port.to_string());
        }
        normalized.push_str(parsed.path());
        if let Some(query) = parsed.query() {
            normalized.push('?');
            normalized.push_str(query);
        }
        let normalized = normalized.trim_end_matches('/').to_string();

        Ok(Self {
            original: input.to_string(),
            normalized,
            domain,
        })
    }

    /// Whether the normalized URL uses plain http.
    pub fn is_insecure(&self) -> bool {
        self.normalized.starts_with("http://")
    }
}
