//! Report model: per-provider report shapes, the tagged populated/error
//! variant, and the composite assessment.

use serde::Serialize;
use strum_macros::Display;

use crate::config::constants::{
    SCORE_POTENTIALLY_SUSPICIOUS, SCORE_SAFE, SCORE_SUSPICIOUS, URLSCAN_RESULT_PREFIX,
};
use crate::target::Target;

/// The external providers queried during an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Google Safe Browsing v4 (boolean verdict + threat types).
    GoogleSafeBrowsing,
    /// VirusTotal v3 (detection counts).
    VirusTotal,
    /// urlscan.io v1 (asynchronous submit-then-poll scan).
    Urlscan,
}

impl ProviderKind {
    /// Human-readable provider name, used in error messages and output.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::GoogleSafeBrowsing => "Google Safe Browsing",
            ProviderKind::VirusTotal => "VirusTotal",
            ProviderKind::Urlscan => "urlscan.io",
        }
    }
}

/// A provider report: either populated data or an error payload.
///
/// The two cases are mutually exclusive. The error variant suppresses all
/// data fields and carries only a human-readable message; consumers must
/// handle both cases instead of guessing from field presence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report<T> {
    /// The provider answered and its response was normalized.
    Populated(T),
    /// The provider was unreachable, timed out, or answered unusably.
    Error {
        /// Human-readable message naming the provider and the cause.
        error: String,
    },
}

impl<T> Report<T> {
    /// Creates the error variant.
    pub fn error(message: impl Into<String>) -> Self {
        Report::Error {
            error: message.into(),
        }
    }

    /// Whether this report is the error variant.
    pub fn is_error(&self) -> bool {
        matches!(self, Report::Error { .. })
    }

    /// The populated data, if any.
    pub fn populated(&self) -> Option<&T> {
        match self {
            Report::Populated(data) => Some(data),
            Report::Error { .. } => None,
        }
    }

    /// The error message, if this report is the error variant.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Report::Populated(_) => None,
            Report::Error { error } => Some(error),
        }
    }
}

/// Normalized Google Safe Browsing result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafeBrowsingReport {
    /// True when no threat matches were returned.
    pub safe: bool,
    /// Distinct threat-type strings, in response order; empty when safe.
    pub threats: Vec<String>,
}

/// Normalized VirusTotal result.
///
/// A URL unknown to VirusTotal is a populated report with zero counts and
/// an explanatory message, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirusTotalReport {
    /// Engines that flagged the URL as malicious or suspicious.
    pub positives: u32,
    /// Total engines that analyzed the URL.
    pub total: u32,
    /// Last analysis time in epoch milliseconds, if any analysis exists.
    pub scan_date: Option<i64>,
    /// Explanatory note for zero-data responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VirusTotalReport {
    /// Report for a URL VirusTotal has never seen (its 404 response).
    pub fn not_found() -> Self {
        Self {
            positives: 0,
            total: 0,
            scan_date: None,
            message: Some(
                "URL not found in VirusTotal database, likely harmless or new.".to_string(),
            ),
        }
    }

    /// Report for a known URL that has no analysis data yet.
    pub fn no_analysis() -> Self {
        Self {
            positives: 0,
            total: 0,
            scan_date: None,
            message: Some("No analysis data found for this URL.".to_string()),
        }
    }
}

/// Lifecycle state of a urlscan.io scan.
///
/// `Submitted` is entered only by the submit operation. `Pending` and
/// `Processing` are equivalent pre-verdict states (`Pending` when the
/// provider returned a result body without a verdict block, `Processing`
/// when it has not indexed the scan yet). `Completed` and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// Scan accepted by the provider; no result polled yet.
    Submitted,
    /// Result body available but no verdict block yet.
    Pending,
    /// Provider has not produced a result body yet (its 404 response).
    Processing,
    /// Verdict block present; `malicious` and `score` are authoritative.
    Completed,
    /// Polling hit a non-recoverable provider error. Not retried.
    Failed,
}

impl ScanStatus {
    /// Whether no further state transition will occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Failed)
    }
}

/// Normalized urlscan.io result, valid across the whole scan lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlscanReport {
    /// Current lifecycle state.
    pub status: ScanStatus,
    /// Provider-assigned scan id; known from submission onwards.
    pub scan_id: Option<String>,
    /// Public result page URL.
    pub scan_url: Option<String>,
    /// Screenshot URL, available once completed.
    pub screenshot_url: Option<String>,
    /// Provider maliciousness score; meaningful only when completed.
    pub score: i64,
    /// Whether the verdict marks the page malicious; false pre-verdict.
    pub malicious: bool,
    /// Verdict categories, once completed.
    pub categories: Vec<String>,
    /// Verdict tags, once completed.
    pub tags: Vec<String>,
    /// Scan time in epoch milliseconds, once available.
    pub scan_date: Option<i64>,
    /// Human-readable lifecycle note.
    pub message: String,
}

impl UrlscanReport {
    fn base(status: ScanStatus, scan_id: Option<String>, message: impl Into<String>) -> Self {
        let scan_url = scan_id
            .as_deref()
            .map(|id| format!("{URLSCAN_RESULT_PREFIX}{id}/"));
        Self {
            status,
            scan_id,
            scan_url,
            screenshot_url: None,
            score: 0,
            malicious: false,
            categories: Vec::new(),
            tags: Vec::new(),
            scan_date: None,
            message: message.into(),
        }
    }

    /// Report returned by a successful submission.
    pub fn submitted(scan_id: String, scan_url: Option<String>) -> Self {
        let mut report = Self::base(
            ScanStatus::Submitted,
            Some(scan_id),
            "Scan submitted, results pending",
        );
        if scan_url.is_some() {
            report.scan_url = scan_url;
        }
        report
    }

    /// Report for a scan the provider has not indexed yet.
    pub fn processing(scan_id: &str) -> Self {
        Self::base(
            ScanStatus::Processing,
            Some(scan_id.to_string()),
            "Scan still processing or not found, try again later",
        )
    }

    /// Report for a poll that hit a non-recoverable provider error.
    ///
    /// Kept as a populated report (not the error variant) so the scan id
    /// and result URL survive for later re-polls by the caller.
    pub fn failed(scan_id: &str, message: impl Into<String>) -> Self {
        Self::base(ScanStatus::Failed, Some(scan_id.to_string()), message)
    }

    /// Merges a polled result over the submission-time report.
    ///
    /// Fields already known from submission (scan id, result URL) are
    /// preserved when the poll omits them; everything else comes from the
    /// poll.
    pub fn merged_with(submission: &UrlscanReport, polled: UrlscanReport) -> Self {
        let scan_id = polled
            .scan_id
            .clone()
            .or_else(|| submission.scan_id.clone());
        let scan_url = polled
            .scan_url
            .clone()
            .or_else(|| submission.scan_url.clone());
        Self {
            scan_id,
            scan_url,
            ..polled
        }
    }
}

/// Fixed-shape mapping from provider to report.
///
/// All three slots are always present in a completed assessment; a failed
/// provider occupies its slot with the error variant. Callers never need
/// to distinguish "slot absent" from "slot errored".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalReports {
    /// Google Safe Browsing slot.
    pub google_safe_browsing: Report<SafeBrowsingReport>,
    /// VirusTotal slot.
    pub virus_total: Report<VirusTotalReport>,
    /// urlscan.io slot.
    pub urlscan: Report<UrlscanReport>,
}

impl ExternalReports {
    /// Whether any slot holds the error variant.
    pub fn any_error(&self) -> bool {
        self.google_safe_browsing.is_error()
            || self.virus_total.is_error()
            || self.urlscan.is_error()
    }
}

/// Four-level classification of the clamped safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Classification {
    /// Score >= 80.
    Safe,
    /// Score >= 60.
    #[serde(rename = "Potentially Suspicious")]
    #[strum(serialize = "Potentially Suspicious")]
    PotentiallySuspicious,
    /// Score >= 40.
    Suspicious,
    /// Everything below.
    Dangerous,
}

impl Classification {
    /// Classifies a clamped score. Thresholds are checked from highest to
    /// lowest and the first match wins.
    pub fn from_score(score: u8) -> Self {
        if score >= SCORE_SAFE {
            Classification::Safe
        } else if score >= SCORE_POTENTIALLY_SUSPICIOUS {
            Classification::PotentiallySuspicious
        } else if score >= SCORE_SUSPICIOUS {
            Classification::Suspicious
        } else {
            Classification::Dangerous
        }
    }
}

/// The externally visible result of one assessment cycle.
///
/// Immutable once returned. Merging late urlscan data produces a new
/// `Assessment` value, never a mutation of an old one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// The normalized target.
    pub target: Target,
    /// Overall boolean verdict, computed fail-closed.
    pub is_safe: bool,
    /// Overall score in [0, 100].
    pub safety_score: u8,
    /// Classification of the clamped score.
    pub classification: Classification,
    /// Per-provider reports; all three slots always present.
    pub external_reports: ExternalReports,
    /// Assessment time in epoch milliseconds.
    pub scanned_at: i64,
}
