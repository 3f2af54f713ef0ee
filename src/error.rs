//! Error taxonomy.
//!
//! Three disjoint kinds of failure, each with its own escape path:
//! unusable input ([`TargetError`]) is the only error [`crate::Orchestrator::assess`]
//! returns; provider failures ([`ProviderError`]) are converted to
//! error-variant report slots inside the clients and never propagate;
//! startup failures ([`InitializationError`]) abort before any request
//! is made.

use thiserror::Error;

/// The caller's URL input cannot be assessed.
#[derive(Debug, Error)]
pub enum TargetError {
    /// Input exceeds the maximum accepted URL length.
    #[error("URL is too long ({len} > {max} characters)")]
    TooLong {
        /// Length of the rejected input.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Input is not a syntactically valid URL.
    #[error("invalid URL: {0}")]
    Invalid(#[from] url::ParseError),

    /// The URL uses a scheme other than http or https.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The URL has no hostname.
    #[error("URL has no host")]
    MissingHost,
}

/// A single provider request failed.
///
/// Used inside provider clients to classify failures before they are
/// flattened into the error variant of the provider's report.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection, timeout, or body-decoding failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP status {0}")]
    Status(reqwest::StatusCode),
}

/// Startup failed before any assessment could run.
#[derive(Debug, Error)]
pub enum InitializationError {
    /// A logger was already installed.
    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// An HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// A required credential environment variable is unset.
    #[error("missing required environment variable: {0}")]
    MissingCredential(&'static str),
}
