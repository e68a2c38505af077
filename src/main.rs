// src/main.rs
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use ct_verify::cert_parser;
use ct_verify::cli::Cli;
use ct_verify::config::Config;
use ct_verify::ct_log::{CtLogRegistry, LogListFetcher};
use ct_verify::verifier::{self, SctVerdict};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Validate arguments
    cli.validate()?;

    // Load config file when given, defaults otherwise
    let mut config = match cli.config {
        Some(ref path) => Config::from_file(Path::new(path))?,
        None => Config::default(),
    };

    // Apply CLI overrides
    if let Some(ref url) = cli.log_list_url {
        config.ct_logs.log_list_url = url.clone();
    }

    // Initialize logging
    let log_level = if cli.verbose || cli.quiet {
        cli.log_level()
    } else {
        &config.logging.level
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    // Load the certificate and issuer; missing or unparseable files are
    // fatal usage errors
    let certificate = cert_parser::load_certificate_pem(Path::new(&cli.certificate))?;
    let issuer = cert_parser::load_certificate_pem(Path::new(&cli.issuer))?;

    let http_timeout = Duration::from_secs(config.ct_logs.http_timeout_secs);

    let fetcher = LogListFetcher::new(&config.ct_logs.log_list_url, http_timeout)?;
    let registry = CtLogRegistry::new(
        fetcher,
        chrono::Duration::days(config.ct_logs.freshness_days as i64),
    );
    registry.ensure_initialized().await?;

    for log in config.extra_logs {
        tracing::info!("Adding log from config: {} ({})", log.description, log.url);
        registry.add_log(log).await?;
    }

    let outcomes =
        verifier::verify_embedded_scts(&certificate, &issuer, &registry, http_timeout).await?;

    if outcomes.is_empty() {
        tracing::warn!(
            "No Signed Certificate Timestamps found in certificate {}",
            cli.certificate
        );
        return Ok(());
    }

    println!("Found {} SCTs in certificate", outcomes.len());

    // A failed verification is a reported outcome, not a process fault:
    // exit zero once every discovered SCT was attempted.
    for outcome in outcomes {
        let log_name = outcome.log_description.as_deref().unwrap_or("unknown log");

        match &outcome.verdict {
            SctVerdict::Verified(result) => {
                println!(
                    "{} SCT #{} successfully verified in log \"{}\" (root {})",
                    "✓".green(),
                    outcome.index,
                    log_name,
                    result.calculated_root_hex
                );
            }
            SctVerdict::RootMismatch(result) => {
                println!(
                    "{} SCT #{} verification failed in log \"{}\": calculated root {} != expected {}",
                    "✗".red(),
                    outcome.index,
                    log_name,
                    result.calculated_root_hex,
                    result.expected_root_hex
                );
            }
            SctVerdict::UnknownLog => {
                println!(
                    "{} SCT #{}: CT log {} not found in registry, skipped",
                    "!".yellow(),
                    outcome.index,
                    outcome.log_id
                );
            }
            SctVerdict::Network(e) => {
                println!(
                    "{} SCT #{} verification failed in log \"{}\": {}",
                    "✗".red(),
                    outcome.index,
                    log_name,
                    e
                );
            }
            SctVerdict::Malformed(e) => {
                println!(
                    "{} SCT #{}: could not rebuild pre-certificate leaf: {}",
                    "✗".red(),
                    outcome.index,
                    e
                );
            }
        }
    }

    Ok(())
}
