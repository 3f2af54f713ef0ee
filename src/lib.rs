//! url_sentinel library: composite URL safety assessment.
//!
//! Assesses whether a URL is safe by fanning out to three external
//! threat-intelligence providers (Google Safe Browsing, VirusTotal, and
//! urlscan.io) concurrently, tolerating per-provider failure, and reducing
//! the normalized reports plus local URL heuristics into one score,
//! classification, and fail-closed boolean verdict.
//!
//! # Example
//!
//! ```no_run
//! use url_sentinel::{AssessOptions, Orchestrator, Providers};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(Providers::from_env()?)?;
//! let assessment = orchestrator
//!     .assess("example.com", AssessOptions::default())
//!     .await?;
//! println!(
//!     "{}: {}/100 ({})",
//!     assessment.target.normalized, assessment.safety_score, assessment.classification
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Failure model
//!
//! Provider failures never surface as errors from [`Orchestrator::assess`]:
//! each provider slot in the returned [`Assessment`] is either populated or
//! an error variant carrying the causal message, and the overall verdict is
//! computed fail-closed from whatever data is available. The only error the
//! orchestrator returns is [`TargetError`] for unusable input.
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or call library functions from within an async context.

#![warn(missing_docs)]

mod cache;
pub mod config;
mod content;
mod error;
pub mod initialization;
mod lifecycle;
mod orchestrator;
mod providers;
mod report;
mod score;
mod target;

// Re-export public API
pub use cache::{AssessmentStore, CacheGate, MemoryStore};
pub use config::{Config, LogFormat, LogLevel, ProviderSettings, Providers};
pub use content::{ContentAnalyzer, ContentSignals};
pub use error::{InitializationError, ProviderError, TargetError};
pub use lifecycle::ScanLifecycle;
pub use orchestrator::{overall_safety, AssessOptions, Orchestrator};
pub use providers::{SafeBrowsingClient, UrlscanClient, VirusTotalClient};
pub use report::{
    Assessment, Classification, ExternalReports, ProviderKind, Report, SafeBrowsingReport,
    ScanStatus, UrlscanReport, VirusTotalReport,
};
pub use score::{safety_score, UrlSignals};
pub use target::Target;
