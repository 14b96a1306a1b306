//! coreid - operator CLI for CORE ID issuance.
//!
//! Issues, parses, and calibrates `RR.LLLL.SSSS` identifiers against the
//! registry at `DATABASE_URL`.

use anyhow::Result;
use clap::Parser;
use coreid_issuer::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod output;

use commands::Cli;

fn init_tracing(config: &Config) {
    // Prefer RUST_LOG, fall back to COREID_LOG_LEVEL. Logs go to stderr;
    // stdout carries command output.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into());

    let json = config.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text = (!config.log_json).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error::print_error(&e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    // Run the command
    if let Err(e) = cli.run(config).await {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
