//! Postgres identifier store.
//!
//! Identifiers live in `core_ids`; per-prefix counters live in
//! `core_id_counters`. Sequence reservation is a single upsert, so concurrent
//! issuers on the same prefix serialize on the counter row instead of racing
//! on a `MAX()` scan.

use async_trait::async_trait;
use coreid_id::{CoreId, LocationDigits, RoleDigits};
use sqlx::postgres::PgPool;
use tracing::debug;

use super::DbError;
use crate::store::IdentifierStore;

/// Escapes `LIKE` metacharacters so `prefix` matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Pattern matching every identifier at `location`, optionally for one role.
fn location_pattern(location: &LocationDigits, role: Option<&RoleDigits>) -> String {
    match role {
        Some(role) => format!("{role}.{location}.%"),
        None => format!("__.{location}.%"),
    }
}

/// Counter values are stored as `INTEGER`.
fn counter_value(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Store for CORE IDs backed by Postgres.
#[derive(Clone)]
pub struct PgIdentifierStore {
    pool: PgPool,
}

impl PgIdentifierStore {
    /// Create a new identifier store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Read the counter for a prefix without advancing it.
    pub async fn current_counter(&self, prefix: &str) -> Result<Option<u32>, DbError> {
        let value: Option<i32> =
            sqlx::query_scalar("SELECT last_sequence FROM core_id_counters WHERE prefix = $1")
                .bind(prefix)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::Query)?;

        Ok(value.and_then(|v| u32::try_from(v).ok()))
    }
}

#[async_trait]
impl IdentifierStore for PgIdentifierStore {
    async fn find_max_starting_with(&self, prefix: &str) -> Result<Option<String>, DbError> {
        sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT MAX(identifier COLLATE "C")
            FROM core_ids
            WHERE identifier LIKE $1
            "#,
        )
        .bind(like_prefix(prefix))
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    async fn reserve_sequence(&self, prefix: &str, floor: u32) -> Result<u32, DbError> {
        let reserved: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO core_id_counters (prefix, last_sequence, updated_at)
            VALUES ($1, $2 + 1, now())
            ON CONFLICT (prefix) DO UPDATE
            SET last_sequence = GREATEST(core_id_counters.last_sequence, $2) + 1,
                updated_at = now()
            RETURNING last_sequence
            "#,
        )
        .bind(prefix)
        .bind(counter_value(floor))
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)?;

        debug!(prefix, floor, reserved, "Reserved sequence");
        Ok(u32::try_from(reserved).unwrap_or(0))
    }

    async fn raise_counter(&self, prefix: &str, at_least: u32) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO core_id_counters (prefix, last_sequence, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (prefix) DO UPDATE
            SET last_sequence = GREATEST(core_id_counters.last_sequence, EXCLUDED.last_sequence),
                updated_at = now()
            "#,
        )
        .bind(prefix)
        .bind(counter_value(at_least))
        .execute(&self.pool)
        .await
        .map_err(DbError::Query)?;

        Ok(())
    }

    async fn record(&self, id: &CoreId) -> Result<(), DbError> {
        let identifier = id.to_string();
        sqlx::query("INSERT INTO core_ids (identifier) VALUES ($1)")
            .bind(&identifier)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::from_write(e, &identifier))?;

        Ok(())
    }

    async fn contains(&self, identifier: &str) -> Result<bool, DbError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM core_ids WHERE identifier = $1)")
            .bind(identifier)
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::Query)
    }

    async fn list_by_location(
        &self,
        location: &LocationDigits,
        role: Option<&RoleDigits>,
    ) -> Result<Vec<String>, DbError> {
        sqlx::query_scalar(
            r#"
            SELECT identifier
            FROM core_ids
            WHERE identifier LIKE $1
            ORDER BY identifier COLLATE "C"
            "#,
        )
        .bind(location_pattern(location, role))
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)
    }

    async fn relocate(&self, moves: &[(CoreId, CoreId)]) -> Result<u64, DbError> {
        if moves.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(DbError::Query)?;
        let mut rewritten = 0;

        for (from, to) in moves {
            let target = to.to_string();
            let result = sqlx::query("UPDATE core_ids SET identifier = $2 WHERE identifier = $1")
                .bind(from.to_string())
                .bind(&target)
                .execute(&mut *tx)
                .await
                .map_err(|e| DbError::from_write(e, &target))?;
            rewritten += result.rows_affected();
        }

        tx.commit().await.map_err(DbError::Query)?;
        Ok(rewritten)
    }
}
