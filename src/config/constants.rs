//! Shared constants: provider endpoints, timeouts, and scoring parameters.

/// User-Agent header sent with every outbound provider request.
pub const USER_AGENT: &str = concat!("url_sentinel/", env!("CARGO_PKG_VERSION"));

/// Per-provider request timeout in seconds. Each client enforces its own
/// timeout so one slow provider degrades to an error report instead of
/// stalling the whole assessment.
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// TCP connect timeout for provider clients in seconds.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Timeout for fetching the target page during content inspection, in
/// seconds. Shorter than the provider timeout: the suspect host itself is
/// being contacted and a hang is informative enough.
pub const CONTENT_FETCH_TIMEOUT_SECS: u64 = 5;

/// Bounded wait before the single urlscan.io result poll, in seconds.
/// Chosen empirically as "usually enough for the provider to finish";
/// not a guarantee. Callers needing certainty must re-poll themselves.
pub const URLSCAN_WAIT_SECS: u64 = 20;

/// Freshness window for the assessment cache gate, in hours.
pub const CACHE_FRESHNESS_HOURS: i64 = 24;

/// Maximum accepted URL length (matches common browser and server limits).
pub const MAX_URL_LENGTH: usize = 2048;

// Provider base endpoints. Overridable per client for tests.
/// Google Safe Browsing v4 API base URL.
pub const SAFE_BROWSING_BASE_URL: &str = "https://safebrowsing.googleapis.com/v4";
/// VirusTotal v3 API base URL.
pub const VIRUSTOTAL_BASE_URL: &str = "https://www.virustotal.com/api/v3";
/// urlscan.io v1 API base URL.
pub const URLSCAN_BASE_URL: &str = "https://urlscan.io/api/v1";
/// Public result page prefix used as a fallback scan URL.
pub const URLSCAN_RESULT_PREFIX: &str = "https://urlscan.io/result/";

/// Client identifier sent in Safe Browsing threatMatches requests.
pub const SAFE_BROWSING_CLIENT_ID: &str = "url_sentinel";
/// Client version sent in Safe Browsing threatMatches requests.
pub const SAFE_BROWSING_CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// TLDs that carry a flat score penalty when they terminate the hostname.
pub const SUSPICIOUS_TLDS: &[&str] = &[".tk", ".ml", ".ga", ".cf", ".gq", ".xyz"];

/// Subdomain count above which the hostname is penalized.
pub const MAX_SUBDOMAINS: usize = 3;

/// Vocabulary that marks a page as credential-harvesting when paired with
/// a near-empty outbound link graph.
pub const PHISHING_KEYWORDS: &[&str] = &[
    "login",
    "sign in",
    "verify",
    "account",
    "banking",
    "password",
    "credit card",
];

/// Markers of obfuscated JavaScript in inline script text.
pub const SCRIPT_OBFUSCATION_MARKERS: &[&str] = &["eval(", "escape(", "unescape("];

/// Minimum absolute-link count below which phishing vocabulary counts as a
/// content signal.
pub const MIN_EXTERNAL_LINKS: usize = 3;

// Score penalties. The running score starts at 100 and is clamped to
// [0, 100] exactly once, after every deduction has been applied.
/// Deduction when Google Safe Browsing reports any threat match.
pub const PENALTY_SAFE_BROWSING_HIT: f64 = 30.0;
/// Proportional deduction factor once the VirusTotal positive ratio exceeds
/// [`VIRUSTOTAL_RATIO_PROPORTIONAL`].
pub const PENALTY_VIRUSTOTAL_RATIO: f64 = 25.0;
/// Flat deduction once the VirusTotal positive ratio exceeds
/// [`VIRUSTOTAL_RATIO_FLAT`].
pub const PENALTY_VIRUSTOTAL_FLAT: f64 = 10.0;
/// Positive ratio above which the proportional VirusTotal deduction applies.
pub const VIRUSTOTAL_RATIO_PROPORTIONAL: f64 = 0.1;
/// Positive ratio above which the flat VirusTotal deduction applies.
pub const VIRUSTOTAL_RATIO_FLAT: f64 = 0.05;
/// Deduction when a completed urlscan.io verdict marks the page malicious.
pub const PENALTY_URLSCAN_MALICIOUS: f64 = 40.0;
/// Deduction for a suspicious top-level domain.
pub const PENALTY_SUSPICIOUS_TLD: f64 = 10.0;
/// Deduction for more than [`MAX_SUBDOMAINS`] subdomains.
pub const PENALTY_EXCESSIVE_SUBDOMAINS: f64 = 5.0;
/// Deduction when the hostname is a raw IPv4 address.
pub const PENALTY_RAW_IP_HOST: f64 = 15.0;
/// Deduction for URL obfuscation markers in the hostname.
pub const PENALTY_OBFUSCATION: f64 = 20.0;
/// Deduction when the URL uses plain http.
pub const PENALTY_INSECURE_SCHEME: f64 = 15.0;
/// Deduction when inline scripts carry obfuscation markers.
pub const PENALTY_OBFUSCATED_SCRIPTS: f64 = 20.0;
/// Deduction for hidden or invisible inputs collecting sensitive data.
pub const PENALTY_HIDDEN_SENSITIVE_FIELDS: f64 = 15.0;
/// Deduction for phishing vocabulary on a page with few outbound links.
pub const PENALTY_PHISHING_CONTENT: f64 = 15.0;
/// Deduction when the target page could not be fetched for inspection.
pub const PENALTY_CONTENT_FETCH_FAILED: f64 = 10.0;

// Classification thresholds, evaluated on the clamped score, high to low.
/// Minimum clamped score classified as Safe.
pub const SCORE_SAFE: u8 = 80;
/// Minimum clamped score classified as Potentially Suspicious.
pub const SCORE_POTENTIALLY_SUSPICIOUS: u8 = 60;
/// Minimum clamped score classified as Suspicious; below is Dangerous.
pub const SCORE_SUSPICIOUS: u8 = 40;
