//! Scan lifecycle manager for the asynchronous provider.
//!
//! Owns the submit → poll → terminal state machine for urlscan.io. The
//! manager is a stateless conduit: scan state lives with the provider, and
//! callers re-poll by scan id. Two usage modes:
//!
//! 1. **Non-blocking**: [`ScanLifecycle::submit`] returns the `Submitted`
//!    state and scan id immediately; the caller polls later, as often as
//!    needed. Polling is idempotent until a terminal state is observed.
//! 2. **Bounded-wait**: [`ScanLifecycle::wait_and_poll`] suspends once for
//!    a fixed delay, then polls exactly once and returns whatever state
//!    results, terminal or not. No loop, no retry.

use std::time::Duration;

use log::debug;

use crate::config::constants::URLSCAN_WAIT_SECS;
use crate::providers::UrlscanClient;
use crate::report::{Report, UrlscanReport};
use crate::target::Target;

/// Submit/poll state machine over a [`UrlscanClient`].
pub struct ScanLifecycle {
    client: UrlscanClient,
    wait: Duration,
}

impl ScanLifecycle {
    /// Wraps a urlscan client with the default 20-second bounded wait.
    pub fn new(client: UrlscanClient) -> Self {
        Self {
            client,
            wait: Duration::from_secs(URLSCAN_WAIT_SECS),
        }
    }

    /// Overrides the bounded-wait delay (shortened in tests).
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Submits the target and returns immediately (mode 1).
    pub async fn submit(&self, target: &Target) -> Report<UrlscanReport> {
        self.client.submit(target).await
    }

    /// Polls the current state for a scan id.
    ///
    /// Safe to repeat: a non-terminal answer ("not indexed yet", no verdict
    /// block) stays non-terminal, and terminal answers are stable.
    pub async fn poll(&self, scan_id: &str) -> Report<UrlscanReport> {
        self.client.fetch_result(scan_id).await
    }

    /// Bounded wait, then exactly one poll (mode 2).
    ///
    /// The returned state may still be non-terminal; callers needing
    /// certainty must fall back to repeated [`ScanLifecycle::poll`] calls.
    pub async fn wait_and_poll(&self, scan_id: &str) -> Report<UrlscanReport> {
        debug!(
            "waiting {:.0}s before polling urlscan.io scan {scan_id}",
            self.wait.as_secs_f64()
        );
        tokio::time::sleep(self.wait).await;
        self.poll(scan_id).await
    }
}
