//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `url_sentinel` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use url_sentinel::initialization::init_logger_with;
use url_sentinel::{AssessOptions, Assessment, Config, Orchestrator, Providers, Report};

#[tokio::main]
async fn main() -> Result<()> {
    // Load provider API keys from a .env file if one exists.
    let _ = dotenvy::dotenv();

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let providers = Providers::from_env()
        .context("missing credentials (set GOOGLE_API_KEY, VIRUSTOTAL_API_KEY, URL_SCAN_IO)")?
        .with_timeout(Duration::from_secs(config.timeout_seconds));
    let orchestrator =
        Orchestrator::new(providers).context("Failed to build provider clients")?;

    // Standalone status poll for a previously submitted scan.
    if let Some(scan_id) = &config.poll {
        let report = orchestrator.poll_scan_status(scan_id).await;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let url = config
        .url
        .context("a URL to assess is required (or use --poll <SCAN_ID>)")?;
    let options = AssessOptions {
        force_refresh: config.force_refresh,
        wait_for_urlscan: config.wait,
        analyze_content: config.inspect_content,
    };

    match orchestrator.assess(&url, options).await {
        Ok(assessment) => {
            print_summary(&assessment);
            Ok(())
        }
        Err(e) => {
            eprintln!("url_sentinel error: {e:#}");
            process::exit(1);
        }
    }
}

fn print_summary(assessment: &Assessment) {
    println!(
        "{} - {}/100, {} ({})",
        assessment.target.normalized,
        assessment.safety_score,
        assessment.classification,
        if assessment.is_safe { "safe" } else { "unsafe" }
    );

    let reports = &assessment.external_reports;
    match &reports.google_safe_browsing {
        Report::Populated(r) if r.safe => println!("  Google Safe Browsing: no threats"),
        Report::Populated(r) => {
            println!("  Google Safe Browsing: threats {}", r.threats.join(", "))
        }
        Report::Error { error } => println!("  Google Safe Browsing: {error}"),
    }
    match &reports.virus_total {
        Report::Populated(r) => println!(
            "  VirusTotal: {}/{} engines flagged{}",
            r.positives,
            r.total,
            r.message
                .as_deref()
                .map(|m| format!(" ({m})"))
                .unwrap_or_default()
        ),
        Report::Error { error } => println!("  VirusTotal: {error}"),
    }
    match &reports.urlscan {
        Report::Populated(r) => {
            println!(
                "  urlscan.io: {:?}{}{}",
                r.status,
                r.scan_id
                    .as_deref()
                    .map(|id| format!(", scan id {id}"))
                    .unwrap_or_default(),
                if r.malicious { ", malicious" } else { "" }
            );
            if let Some(scan_url) = &r.scan_url {
                println!("    result: {scan_url}");
            }
        }
        Report::Error { error } => println!("  urlscan.io: {error}"),
    }
}
