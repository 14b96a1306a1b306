//! The identifier store seam.
//!
//! The issuer only needs a handful of operations from its backing store: the
//! greatest identifier under a prefix, an atomic per-prefix counter, and a
//! registry it can write issued identifiers into. [`crate::db::PgIdentifierStore`]
//! is the production implementation; [`MemoryIdentifierStore`] backs tests and
//! offline CLI runs.

mod memory;

pub use memory::MemoryIdentifierStore;

use std::sync::Arc;

use async_trait::async_trait;
use coreid_id::{CoreId, LocationDigits, RoleDigits};

use crate::db::DbError;

/// Persistent record store for CORE IDs.
#[async_trait]
pub trait IdentifierStore: Send + Sync {
    /// Greatest stored identifier (byte order) starting with `prefix`.
    async fn find_max_starting_with(&self, prefix: &str) -> Result<Option<String>, DbError>;

    /// Atomically sets the prefix counter to `max(counter, floor) + 1` and
    /// returns the new value.
    async fn reserve_sequence(&self, prefix: &str, floor: u32) -> Result<u32, DbError>;

    /// Moves the prefix counter forward to at least `at_least`.
    async fn raise_counter(&self, prefix: &str, at_least: u32) -> Result<(), DbError>;

    /// Writes an issued identifier into the registry.
    ///
    /// Fails with [`DbError::DuplicateIdentifier`] if it is already present.
    async fn record(&self, id: &CoreId) -> Result<(), DbError>;

    /// Returns true if the registry holds `identifier`.
    async fn contains(&self, identifier: &str) -> Result<bool, DbError>;

    /// Every stored identifier whose location segment is `location`, in byte
    /// order. Malformed rows are returned as-is.
    async fn list_by_location(
        &self,
        location: &LocationDigits,
        role: Option<&RoleDigits>,
    ) -> Result<Vec<String>, DbError>;

    /// Renames identifiers in one all-or-nothing step. Returns the number of
    /// rows rewritten.
    async fn relocate(&self, moves: &[(CoreId, CoreId)]) -> Result<u64, DbError>;
}

#[async_trait]
impl<T: IdentifierStore + ?Sized> IdentifierStore for Arc<T> {
    async fn find_max_starting_with(&self, prefix: &str) -> Result<Option<String>, DbError> {
        (**self).find_max_starting_with(prefix).await
    }

    async fn reserve_sequence(&self, prefix: &str, floor: u32) -> Result<u32, DbError> {
        (**self).reserve_sequence(prefix, floor).await
    }

    async fn raise_counter(&self, prefix: &str, at_least: u32) -> Result<(), DbError> {
        (**self).raise_counter(prefix, at_least).await
    }

    async fn record(&self, id: &CoreId) -> Result<(), DbError> {
        (**self).record(id).await
    }

    async fn contains(&self, identifier: &str) -> Result<bool, DbError> {
        (**self).contains(identifier).await
    }

    async fn list_by_location(
        &self,
        location: &LocationDigits,
        role: Option<&RoleDigits>,
    ) -> Result<Vec<String>, DbError> {
        (**self).list_by_location(location, role).await
    }

    async fn relocate(&self, moves: &[(CoreId, CoreId)]) -> Result<u64, DbError> {
        (**self).relocate(moves).await
    }
}
