//! CLI commands.

mod calibrate;
mod db;
mod issue;
mod parse;
mod roles;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use coreid_issuer::{
    config::Config,
    db::Database,
    store::{IdentifierStore, MemoryIdentifierStore},
    IdentifierIssuer,
};
use tracing::info;

use crate::error::CliError;
use crate::output::{print_warning, OutputFormat};

/// coreid - issue, parse, and calibrate CORE IDs.
#[derive(Debug, Parser)]
#[command(name = "coreid")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (table or json).
    #[arg(long, global = true, default_value = "table")]
    format: String,

    /// Use a throwaway in-memory store instead of DATABASE_URL.
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Issue new identifiers.
    Issue(issue::IssueCommand),

    /// Parse an identifier into its segments.
    Parse(parse::ParseCommand),

    /// Rewrite the location segment of existing identifiers.
    Calibrate(calibrate::CalibrateCommand),

    /// List role codes.
    Roles,

    /// Run pending database migrations.
    Migrate,

    /// Check that the database is reachable.
    Health,

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self, config: Config) -> Result<()> {
        let ctx = CommandContext {
            config,
            format: OutputFormat::from_flag(&self.format),
            in_memory: self.in_memory,
        };

        match self.command {
            Commands::Issue(cmd) => cmd.run(ctx).await,
            Commands::Parse(cmd) => cmd.run(ctx),
            Commands::Calibrate(cmd) => cmd.run(ctx).await,
            Commands::Roles => roles::list_roles(ctx),
            Commands::Migrate => db::migrate(ctx).await,
            Commands::Health => db::health(ctx).await,
            Commands::Version => {
                println!("coreid {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub format: OutputFormat,
    pub in_memory: bool,
}

impl CommandContext {
    /// Connect to the configured database, running migrations in dev mode.
    pub async fn database(&self) -> Result<Database> {
        let db = Database::connect(&self.config.database)
            .await
            .map_err(CliError::from)?;

        if self.config.dev_mode {
            info!("Running database migrations (dev mode)");
            db.run_migrations().await.map_err(CliError::from)?;
        }

        Ok(db)
    }

    /// The store commands operate on.
    pub async fn store(&self) -> Result<Arc<dyn IdentifierStore>> {
        if self.in_memory {
            print_warning("Using an in-memory store; nothing will be persisted.");
            return Ok(Arc::new(MemoryIdentifierStore::new()));
        }

        let db = self.database().await?;
        Ok(Arc::new(db.identifier_store()))
    }

    /// An issuer over [`CommandContext::store`].
    pub async fn issuer(&self) -> Result<IdentifierIssuer<Arc<dyn IdentifierStore>>> {
        let store = self.store().await?;
        Ok(IdentifierIssuer::new(store, self.config.issuer.clone()))
    }
}
