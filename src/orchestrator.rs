//! Aggregation orchestrator: fan-out, fan-in, verdict, and assembly.

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::cache::{AssessmentStore, CacheGate};
use crate::config::Providers;
use crate::content::{ContentAnalyzer, ContentSignals};
use crate::error::{InitializationError, TargetError};
use crate::lifecycle::ScanLifecycle;
use crate::providers::{SafeBrowsingClient, UrlscanClient, VirusTotalClient};
use crate::report::{now_millis, Assessment, ExternalReports, Report, UrlscanReport};
use crate::score::{safety_score, UrlSignals};
use crate::target::Target;

/// Per-call options for [`Orchestrator::assess`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessOptions {
    /// Skip the cache gate and query every provider.
    pub force_refresh: bool,
    /// After submission, perform the bounded-wait poll for urlscan.io and
    /// merge its result before returning.
    pub wait_for_urlscan: bool,
    /// Fetch the target page and feed its content signals into the score.
    /// Off by default: the fetch contacts the suspect host directly, which
    /// the operator must opt into.
    pub analyze_content: bool,
}

/// Runs the full assessment pipeline.
///
/// Owns one client per provider (each with its own timeout), the scan
/// lifecycle manager for the asynchronous provider, and the cache gate.
/// No failure crosses [`Orchestrator::assess`]'s boundary except
/// [`TargetError`]: provider failures are data inside the returned
/// [`Assessment`].
pub struct Orchestrator {
    safe_browsing: SafeBrowsingClient,
    virus_total: VirusTotalClient,
    lifecycle: ScanLifecycle,
    content: ContentAnalyzer,
    gate: CacheGate,
    store: Option<Arc<dyn AssessmentStore>>,
}

impl Orchestrator {
    /// Builds the orchestrator and its provider clients from settings.
    ///
    /// # Errors
    ///
    /// Returns [`InitializationError`] if an HTTP client cannot be built.
    pub fn new(providers: Providers) -> Result<Self, InitializationError> {
        Ok(Self {
            safe_browsing: SafeBrowsingClient::new(providers.safe_browsing)?,
            virus_total: VirusTotalClient::new(providers.virus_total)?,
            lifecycle: ScanLifecycle::new(UrlscanClient::new(providers.urlscan)?),
            content: ContentAnalyzer::new()?,
            gate: CacheGate::default(),
            store: None,
        })
    }

    /// Attaches an assessment store for the cache gate to read.
    pub fn with_store(mut self, store: Arc<dyn AssessmentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Overrides the urlscan.io bounded-wait delay (shortened in tests).
    pub fn with_urlscan_wait(mut self, wait: Duration) -> Self {
        self.lifecycle = self.lifecycle.with_wait(wait);
        self
    }

    /// Assesses a URL across all providers and local heuristics.
    ///
    /// The three provider calls run concurrently and all settle before
    /// assembly; one provider's failure never prevents capturing the
    /// others' results. For urlscan.io the concurrent phase submits only;
    /// with [`AssessOptions::wait_for_urlscan`] set, one bounded wait and
    /// one poll follow, and the polled state is merged into the `urlscan`
    /// slot (submission-known fields are preserved where the poll omits
    /// them).
    ///
    /// # Errors
    ///
    /// Only [`TargetError`] for unusable input. Provider failures are
    /// returned as error-variant slots inside the assessment.
    pub async fn assess(
        &self,
        input: &str,
        options: AssessOptions,
    ) -> Result<Assessment, TargetError> {
        let target = Target::parse(input)?;

        if let Some(store) = &self.store {
            if let Some(hit) =
                self.gate
                    .lookup(store.as_ref(), &target, options.force_refresh, now_millis())
            {
                info!("returning cached assessment for {}", target.normalized);
                return Ok(hit);
            }
        }

        info!("assessing {}", target.normalized);
        let (google_safe_browsing, virus_total, urlscan, content) = futures::join!(
            self.safe_browsing.check(&target),
            self.virus_total.check(&target),
            self.lifecycle.submit(&target),
            self.content_signals(&target, options.analyze_content),
        );
        let mut reports = ExternalReports {
            google_safe_browsing,
            virus_total,
            urlscan,
        };

        if options.wait_for_urlscan {
            let submission = reports.urlscan.populated().cloned();
            if let Some(submission) = submission {
                if let Some(scan_id) = submission.scan_id.clone() {
                    let polled = self.lifecycle.wait_and_poll(&scan_id).await;
                    if let Report::Populated(polled) = polled {
                        reports.urlscan =
                            Report::Populated(UrlscanReport::merged_with(&submission, polled));
                    }
                }
            }
        }

        let signals = UrlSignals::derive(&target);
        let (safety_score, classification) = safety_score(&reports, &signals, &content);
        let is_safe = overall_safety(&reports);

        Ok(Assessment {
            target,
            is_safe,
            safety_score,
            classification,
            external_reports: reports,
            scanned_at: now_millis(),
        })
    }

    /// Content inspection runs inside the provider fan-out; when disabled
    /// it resolves immediately with neutral signals.
    async fn content_signals(&self, target: &Target, enabled: bool) -> ContentSignals {
        if enabled {
            self.content.inspect(target).await
        } else {
            ContentSignals::default()
        }
    }

    /// Polls the asynchronous provider's scan state by id.
    ///
    /// Idempotent; intended for callers that used the non-blocking mode
    /// and are waiting for a terminal state.
    pub async fn poll_scan_status(&self, scan_id: &str) -> Report<UrlscanReport> {
        self.lifecycle.poll(scan_id).await
    }
}

/// Computes the overall boolean verdict, fail-closed.
///
/// The target is unsafe if any provider signals a threat, if the
/// asynchronous scan terminated in failure, or if any slot is the error
/// variant. An unreachable provider therefore makes the verdict unsafe
/// rather than unknown; this is deliberate and must not be relaxed.
pub fn overall_safety(reports: &ExternalReports) -> bool {
    if reports.any_error() {
        return false;
    }
    if let Some(gsb) = reports.google_safe_browsing.populated() {
        if !gsb.safe {
            return false;
        }
    }
    if let Some(vt) = reports.virus_total.populated() {
        if vt.positives > 0 {
            return false;
        }
    }
    if let Some(scan) = reports.urlscan.populated() {
        if scan.malicious {
            return false;
        }
        if scan.status == crate::report::ScanStatus::Failed {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{SafeBrowsingReport, ScanStatus, VirusTotalReport};

    fn clean_reports() -> ExternalReports {
        ExternalReports {
            google_safe_browsing: Report::Populated(SafeBrowsingReport {
                safe: true,
                threats: vec![],
            }),
            virus_total: Report::Populated(VirusTotalReport {
                positives: 0,
                total: 70,
                scan_date: None,
                message: None,
            }),
            urlscan: Report::Populated(UrlscanReport::processing("abc-123")),
        }
    }

    #[test]
    fn test_clean_reports_are_safe() {
        assert!(overall_safety(&clean_reports()));
    }

    #[test]
    fn test_fail_closed_on_any_error_slot() {
        // Any single error slot flips the verdict, regardless of the rest.
        let mut reports = clean_reports();
        reports.google_safe_browsing = Report::error("Google Safe Browsing failed: timeout");
        assert!(!overall_safety(&reports));

        let mut reports = clean_reports();
        reports.virus_total = Report::error("VirusTotal failed: timeout");
        assert!(!overall_safety(&reports));

        let mut reports = clean_reports();
        reports.urlscan = Report::error("urlscan.io submission failed: timeout");
        assert!(!overall_safety(&reports));
    }

    #[test]
    fn test_unsafe_on_safe_browsing_threat() {
        let mut reports = clean_reports();
        reports.google_safe_browsing = Report::Populated(SafeBrowsingReport {
            safe: false,
            threats: vec!["SOCIAL_ENGINEERING".to_string()],
        });
        assert!(!overall_safety(&reports));
    }

    #[test]
    fn test_unsafe_on_virustotal_positives() {
        let mut reports = clean_reports();
        reports.virus_total = Report::Populated(VirusTotalReport {
            positives: 1,
            total: 70,
            scan_date: None,
            message: None,
        });
        assert!(!overall_safety(&reports));
    }

    #[test]
    fn test_unsafe_on_malicious_urlscan_verdict() {
        let mut reports = clean_reports();
        let mut scan = UrlscanReport::processing("abc-123");
        scan.status = ScanStatus::Completed;
        scan.malicious = true;
        reports.urlscan = Report::Populated(scan);
        assert!(!overall_safety(&reports));
    }

    #[test]
    fn test_unsafe_on_failed_scan() {
        let mut reports = clean_reports();
        reports.urlscan =
            Report::Populated(UrlscanReport::failed("abc-123", "provider error"));
        assert!(!overall_safety(&reports));
    }

    #[test]
    fn test_pending_scan_is_not_unsafe() {
        // A still-processing scan carries no verdict and must not flip
        // the assessment on its own.
        assert!(overall_safety(&clean_reports()));
    }
}
