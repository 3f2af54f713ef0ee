//! Provider clients, one per external threat-intelligence service.
//!
//! Each client owns its own HTTP client (with its own timeout) built from
//! injected [`crate::config::ProviderSettings`], and converts every
//! transport failure into report data at its boundary. No client ever
//! returns `Err` to the orchestrator.

mod safe_browsing;
mod urlscan;
mod virus_total;

pub use safe_browsing::SafeBrowsingClient;
pub use urlscan::UrlscanClient;
pub use virus_total::VirusTotalClient;
