//! Assessment cache gate.
//!
//! Decides whether a previous assessment can be returned unchanged instead
//! of invoking any provider. This is a pure short-circuit: the gate only
//! reads. Storing assessments after computation is the persistence
//! collaborator's responsibility, invoked by the caller, never by the
//! orchestrator.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Duration;
use log::debug;

use crate::config::constants::CACHE_FRESHNESS_HOURS;
use crate::report::Assessment;
use crate::target::Target;

/// Read-only lookup into stored assessments.
///
/// The single operation the core needs from persistence: the most recent
/// assessment keyed by exact normalized URL string.
pub trait AssessmentStore: Send + Sync {
    /// Most recent stored assessment for the exact normalized URL, if any.
    fn most_recent(&self, normalized_url: &str) -> Option<Assessment>;
}

/// Freshness gate over an [`AssessmentStore`].
pub struct CacheGate {
    freshness: Duration,
}

impl Default for CacheGate {
    fn default() -> Self {
        Self {
            freshness: Duration::hours(CACHE_FRESHNESS_HOURS),
        }
    }
}

impl CacheGate {
    /// Creates a gate with a custom freshness window.
    pub fn new(freshness: Duration) -> Self {
        Self { freshness }
    }

    /// Returns a stored assessment when the pipeline can be skipped.
    ///
    /// With `force_refresh` set the gate never short-circuits. Otherwise a
    /// stored assessment is returned unchanged when its timestamp is within
    /// the freshness window of `now_ms`.
    pub fn lookup(
        &self,
        store: &dyn AssessmentStore,
        target: &Target,
        force_refresh: bool,
        now_ms: i64,
    ) -> Option<Assessment> {
        if force_refresh {
            return None;
        }
        let hit = store.most_recent(&target.normalized)?;
        let age_ms = now_ms - hit.scanned_at;
        if age_ms <= self.freshness.num_milliseconds() {
            debug!(
                "cache hit for {} (age {:.1}h)",
                target.normalized,
                age_ms as f64 / 3_600_000.0
            );
            Some(hit)
        } else {
            None
        }
    }
}

/// In-memory [`AssessmentStore`] for the CLI and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, Vec<Assessment>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed assessment under its normalized URL.
    pub fn insert(&self, assessment: Assessment) {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .entry(assessment.target.normalized.clone())
            .or_default()
            .push(assessment);
    }
}

impl AssessmentStore for MemoryStore {
    fn most_recent(&self, normalized_url: &str) -> Option<Assessment> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .get(normalized_url)?
            .iter()
            .max_by_key(|a| a.scanned_at)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        Classification, ExternalReports, Report, SafeBrowsingReport, UrlscanReport,
        VirusTotalReport,
    };

    fn assessment(normalized: &str, scanned_at: i64) -> Assessment {
        Assessment {
            target: Target::parse(normalized).unwrap(),
            is_safe: true,
            safety_score: 100,
            classification: Classification::Safe,
            external_reports: ExternalReports {
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
            },
            scanned_at,
        }
    }

    const HOUR_MS: i64 = 3_600_000;

    #[test]
    fn test_fresh_hit_short_circuits() {
        let store = MemoryStore::new();
        let now = 1_000 * HOUR_MS;
        store.insert(assessment("https://example.com", now - HOUR_MS));

        let gate = CacheGate::default();
        let target = Target::parse("example.com").unwrap();
        let hit = gate.lookup(&store, &target, false, now);
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().scanned_at, now - HOUR_MS);
    }

    #[test]
    fn test_stale_entry_misses() {
        let store = MemoryStore::new();
        let now = 1_000 * HOUR_MS;
        store.insert(assessment("https://example.com", now - 25 * HOUR_MS));

        let gate = CacheGate::default();
        let target = Target::parse("example.com").unwrap();
        assert!(gate.lookup(&store, &target, false, now).is_none());
    }

    #[test]
    fn test_force_refresh_bypasses_fresh_entry() {
        let store = MemoryStore::new();
        let now = 1_000 * HOUR_MS;
        store.insert(assessment("https://example.com", now - HOUR_MS));

        let gate = CacheGate::default();
        let target = Target::parse("example.com").unwrap();
        assert!(gate.lookup(&store, &target, true, now).is_none());
    }

    #[test]
    fn test_lookup_is_keyed_by_exact_normalized_url() {
        let store = MemoryStore::new();
        let now = 1_000 * HOUR_MS;
        store.insert(assessment("https://example.com/a", now - HOUR_MS));

        let gate = CacheGate::default();
        let other = Target::parse("https://example.com/b").unwrap();
        assert!(gate.lookup(&store, &other, false, now).is_none());
    }

    #[test]
    fn test_most_recent_wins() {
        let store = MemoryStore::new();
        let now = 1_000 * HOUR_MS;
        store.insert(assessment("https://example.com", now - 30 * HOUR_MS));
        store.insert(assessment("https://example.com", now - 2 * HOUR_MS));

        let gate = CacheGate::default();
        let target = Target::parse("example.com").unwrap();
        let hit = gate.lookup(&store, &target, false, now).unwrap();
        assert_eq!(hit.scanned_at, now - 2 * HOUR_MS);
    }
}
