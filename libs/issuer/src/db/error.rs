//! Database error types.

use thiserror::Error;

/// Postgres SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Identifier store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to connect to the database.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Failed to execute a query.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),

    /// Migration directory not found in the current environment.
    #[error("migration directory not found; tried {tried}. Last error: {last_error}. Run from repo root or libs/issuer.")]
    MigrationDirNotFound { tried: String, last_error: String },

    /// The identifier already exists in the registry.
    #[error("identifier already exists: {identifier}")]
    DuplicateIdentifier { identifier: String },
}

impl DbError {
    /// Maps a write error, turning unique violations into [`DbError::DuplicateIdentifier`].
    pub(crate) fn from_write(err: sqlx::Error, identifier: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return DbError::DuplicateIdentifier {
                    identifier: identifier.to_string(),
                };
            }
        }
        DbError::Query(err)
    }

    /// Returns true if this error reports an identifier clash.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DbError::DuplicateIdentifier { .. })
    }
}
