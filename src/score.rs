//! Safety score calculator.
//!
//! The single authoritative score/classification computation: a pure
//! function over the normalized report bundle plus local URL and content
//! signals. The score starts at 100, each risk signal subtracts its
//! penalty, and the running total is clamped to [0, 100] exactly once
//! after all deductions, never between them, so an early bad signal does
//! not shield the score from further deductions.

use crate::config::constants::{
    MAX_SUBDOMAINS, PENALTY_CONTENT_FETCH_FAILED, PENALTY_EXCESSIVE_SUBDOMAINS,
    PENALTY_HIDDEN_SENSITIVE_FIELDS, PENALTY_INSECURE_SCHEME, PENALTY_OBFUSCATED_SCRIPTS,
    PENALTY_OBFUSCATION, PENALTY_PHISHING_CONTENT, PENALTY_RAW_IP_HOST,
    PENALTY_SAFE_BROWSING_HIT, PENALTY_SUSPICIOUS_TLD, PENALTY_URLSCAN_MALICIOUS,
    PENALTY_VIRUSTOTAL_FLAT, PENALTY_VIRUSTOTAL_RATIO, SUSPICIOUS_TLDS, VIRUSTOTAL_RATIO_FLAT,
    VIRUSTOTAL_RATIO_PROPORTIONAL,
};
use crate::content::ContentSignals;
use crate::report::{Classification, ExternalReports, ScanStatus};
use crate::target::Target;

/// Risk signals derived from the URL itself, without any network I/O.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlSignals {
    /// Hostname ends in a TLD with a high abuse rate.
    pub suspicious_tld: bool,
    /// Hostname has more subdomain labels than legitimate sites use.
    pub excessive_subdomains: bool,
    /// Hostname is a raw IPv4 address instead of a domain name.
    pub raw_ip_host: bool,
    /// Hostname carries obfuscation markers (`@`, embedded `url=`, or a
    /// 32-digit hex run).
    pub obfuscated: bool,
    /// The URL uses plain http.
    pub insecure_scheme: bool,
}

impl UrlSignals {
    /// Derives all signals from a normalized target.
    pub fn derive(target: &Target) -> Self {
        let host = target.domain.as_str();
        Self {
            suspicious_tld: SUSPICIOUS_TLDS.iter().any(|tld| host.ends_with(tld)),
            excessive_subdomains: host.split('.').count().saturating_sub(2) > MAX_SUBDOMAINS,
            raw_ip_host: is_ipv4(host),
            obfuscated: host.contains('@') || host.contains("url=") || has_long_hex_run(host),
            insecure_scheme: target.is_insecure(),
        }
    }
}

fn is_ipv4(host: &str) -> bool {
    let octets: Vec<&str> = host.split('.').collect();
    octets.len() == 4 && octets.iter().all(|o| !o.is_empty() && o.parse::<u8>().is_ok())
}

// 32 consecutive hex digits in a hostname is a common mark of generated
// phishing subdomains (hashes embedded in the label).
fn has_long_hex_run(host: &str) -> bool {
    let mut run = 0usize;
    for c in host.chars() {
        if c.is_ascii_hexdigit() {
            run += 1;
            if run >= 32 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Computes the overall score and classification.
///
/// Error-variant provider slots contribute no deduction: the score reflects
/// whatever signals are available, while the fail-closed consequence of a
/// provider error is carried by the boolean verdict alone. Content signals
/// are neutral (`ContentSignals::default()`) when inspection was not run.
pub fn safety_score(
    reports: &ExternalReports,
    signals: &UrlSignals,
    content: &ContentSignals,
) -> (u8, Classification) {
    let mut score = 100.0_f64;

    if let Some(gsb) = reports.google_safe_browsing.populated() {
        if !gsb.safe {
            score -= PENALTY_SAFE_BROWSING_HIT;
        }
    }

    if let Some(vt) = reports.virus_total.populated() {
        if vt.positives > 0 && vt.total > 0 {
            let ratio = f64::from(vt.positives) / f64::from(vt.total);
            if ratio > VIRUSTOTAL_RATIO_PROPORTIONAL {
                score -= PENALTY_VIRUSTOTAL_RATIO * ratio;
            }
            if ratio > VIRUSTOTAL_RATIO_FLAT {
                score -= PENALTY_VIRUSTOTAL_FLAT;
            }
        }
    }

    if let Some(scan) = reports.urlscan.populated() {
        if scan.status == ScanStatus::Completed && scan.malicious {
            score -= PENALTY_URLSCAN_MALICIOUS;
        }
    }

    if signals.suspicious_tld {
        score -= PENALTY_SUSPICIOUS_TLD;
    }
    if signals.excessive_subdomains {
        score -= PENALTY_EXCESSIVE_SUBDOMAINS;
    }
    if signals.raw_ip_host {
        score -= PENALTY_RAW_IP_HOST;
    }
    if signals.obfuscated {
        score -= PENALTY_OBFUSCATION;
    }
    if signals.insecure_scheme {
        score -= PENALTY_INSECURE_SCHEME;
    }

    if content.obfuscated_scripts {
        score -= PENALTY_OBFUSCATED_SCRIPTS;
    }
    if content.hidden_sensitive_fields {
        score -= PENALTY_HIDDEN_SENSITIVE_FIELDS;
    }
    if content.phishing_content {
        score -= PENALTY_PHISHING_CONTENT;
    }
    if content.fetch_failed {
        score -= PENALTY_CONTENT_FETCH_FAILED;
    }

    // Single clamp, applied after every deduction.
    let clamped = score.clamp(0.0, 100.0).round() as u8;
    (clamped, Classification::from_score(clamped))
}
