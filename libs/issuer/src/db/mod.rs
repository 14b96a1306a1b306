//! Postgres backing for the identifier registry.
//!
//! [`Database`] owns the pool, applies the `core_ids` and
//! `core_id_counters` migrations, and hands out [`PgIdentifierStore`]s.

mod error;
mod identifiers;

pub use error::DbError;
pub use identifiers::PgIdentifierStore;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info};

/// Pool settings for the registry database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `DATABASE_URL`.
    pub database_url: String,

    /// Upper bound on pooled connections. Concurrent issuers each hold one
    /// for the duration of a counter upsert.
    pub max_connections: u32,

    pub min_connections: u32,

    /// How long an issue call waits for a free connection before failing.
    pub acquire_timeout: Duration,

    pub idle_timeout: Duration,

    pub max_lifetime: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/coreid".to_string(),
            max_connections: 5,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Reads `name` and parses it, ignoring unset or unparsable values.
fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse().ok())
}

impl DbConfig {
    /// Reads `DATABASE_URL`, `DB_MAX_CONNECTIONS`, `DB_MIN_CONNECTIONS`
    /// and `DB_ACQUIRE_TIMEOUT_SECS`, keeping defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url.clone()),
            max_connections: env_parsed("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
            min_connections: env_parsed("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
            acquire_timeout: env_parsed("DB_ACQUIRE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            ..defaults
        }
    }
}

/// Directories searched for registry migrations, in order.
fn migration_dirs() -> [PathBuf; 3] {
    [
        PathBuf::from("./migrations"),
        PathBuf::from("libs/issuer/migrations"),
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations"),
    ]
}

/// Connected registry database.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        info!(
            max_connections = config.max_connections,
            acquire_timeout_secs = config.acquire_timeout.as_secs(),
            "Connecting to identifier registry"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .max_lifetime(Some(config.max_lifetime))
            .connect(&config.database_url)
            .await
            .map_err(DbError::Connect)?;

        Ok(Self { pool })
    }

    /// Round-trips `SELECT 1`.
    pub async fn health_check(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(DbError::Query)?;
        Ok(())
    }

    /// Applies pending registry migrations from the first directory in
    /// [`migration_dirs`] that loads.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        let dirs = migration_dirs();
        let mut last_error = None;

        for dir in &dirs {
            let migrator = match Migrator::new(dir.clone()).await {
                Ok(migrator) => migrator,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "Skipping migrations directory");
                    last_error = Some(e);
                    continue;
                }
            };

            migrator.run(&self.pool).await.map_err(DbError::Migration)?;
            info!(dir = %dir.display(), "Identifier registry migrated");
            return Ok(());
        }

        Err(DbError::MigrationDirNotFound {
            tried: dirs
                .iter()
                .map(|dir| dir.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            last_error: last_error.map_or_else(|| "none".to_string(), |e| e.to_string()),
        })
    }

    pub fn identifier_store(&self) -> PgIdentifierStore {
        PgIdentifierStore::new(self.pool.clone())
    }
}
