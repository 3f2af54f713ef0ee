//! Configuration types and CLI options.

use clap::{Parser, ValueEnum};

use crate::config::constants::DEFAULT_PROVIDER_TIMEOUT_SECS;

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line configuration for the `url_sentinel` binary.
///
/// Provider credentials are not CLI arguments; they come from the
/// environment (see [`crate::config::Providers::from_env`]).
#[derive(Debug, Parser)]
#[command(
    name = "url_sentinel",
    about = "Assess URL safety across external threat-intelligence providers"
)]
pub struct Config {
    /// URL to assess
    #[arg(required_unless_present = "poll")]
    pub url: Option<String>,

    /// Poll the status of a previously submitted urlscan.io scan instead of
    /// running a new assessment
    #[arg(long, value_name = "SCAN_ID", conflicts_with = "url")]
    pub poll: Option<String>,

    /// Bypass the 24-hour assessment cache and query every provider
    #[arg(long)]
    pub force_refresh: bool,

    /// After submitting to urlscan.io, wait once (bounded) and poll its
    /// result before returning
    #[arg(long)]
    pub wait: bool,

    /// Fetch the target page itself and include content heuristics in the
    /// score (contacts the suspect host directly)
    #[arg(long)]
    pub inspect_content: bool,

    /// Per-provider request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_PROVIDER_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_cli_requires_url_or_poll() {
        assert!(Config::try_parse_from(["url_sentinel"]).is_err());
        assert!(Config::try_parse_from(["url_sentinel", "example.com"]).is_ok());
        assert!(Config::try_parse_from(["url_sentinel", "--poll", "abc-123"]).is_ok());
    }

    #[test]
    fn test_cli_url_conflicts_with_poll() {
        assert!(Config::try_parse_from(["url_sentinel", "example.com", "--poll", "abc"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let config = Config::try_parse_from(["url_sentinel", "example.com"]).unwrap();
        assert!(!config.force_refresh);
        assert!(!config.wait);
        assert!(!config.inspect_content);
        assert_eq!(config.timeout_seconds, DEFAULT_PROVIDER_TIMEOUT_SECS);
    }
}
