//! Configuration: CLI options, provider settings, and shared constants.

pub mod constants;
mod providers;
mod types;

pub use providers::{ProviderSettings, Providers};
pub use types::{Config, LogFormat, LogLevel};
