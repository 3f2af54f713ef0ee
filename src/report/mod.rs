//! Normalized report model shared by all providers and the orchestrator.

mod time;
mod types;

pub use time::{now_millis, rfc3339_to_millis, seconds_to_millis};
pub use types::{
    Assessment, Classification, ExternalReports, ProviderKind, Report, SafeBrowsingReport,
    ScanStatus, UrlscanReport, VirusTotalReport,
};
