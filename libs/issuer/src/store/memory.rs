//! In-memory identifier store.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use coreid_id::{CoreId, LocationDigits, RoleDigits};

use super::IdentifierStore;
use crate::db::DbError;

#[derive(Debug, Default)]
struct Inner {
    /// Byte-ordered like Postgres `COLLATE "C"`.
    identifiers: BTreeSet<String>,
    counters: HashMap<String, u32>,
}

/// Identifier store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryIdentifierStore {
    inner: Mutex<Inner>,

    /// Whether every operation should fail as if the store were unreachable.
    unavailable: AtomicBool,
}

impl MemoryIdentifierStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with registry rows, well formed or not.
    pub fn with_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        store
            .lock()
            .identifiers
            .extend(identifiers.into_iter().map(Into::into));
        store
    }

    /// Toggle simulated store outages.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of every stored identifier, in byte order.
    pub fn identifiers(&self) -> Vec<String> {
        self.lock().identifiers.iter().cloned().collect()
    }

    /// Current counter for a prefix, if one exists.
    pub fn counter(&self, prefix: &str) -> Option<u32> {
        self.lock().counters.get(prefix).copied()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), DbError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentifierStore for MemoryIdentifierStore {
    async fn find_max_starting_with(&self, prefix: &str) -> Result<Option<String>, DbError> {
        self.check_available()?;
        let inner = self.lock();
        Ok(inner
            .identifiers
            .range(prefix.to_string()..)
            .take_while(|id| id.starts_with(prefix))
            .last()
            .cloned())
    }

    async fn reserve_sequence(&self, prefix: &str, floor: u32) -> Result<u32, DbError> {
        self.check_available()?;
        let mut inner = self.lock();
        let counter = inner.counters.entry(prefix.to_string()).or_insert(0);
        *counter = (*counter).max(floor).saturating_add(1);
        Ok(*counter)
    }

    async fn raise_counter(&self, prefix: &str, at_least: u32) -> Result<(), DbError> {
        self.check_available()?;
        let mut inner = self.lock();
        let counter = inner.counters.entry(prefix.to_string()).or_insert(0);
        *counter = (*counter).max(at_least);
        Ok(())
    }

    async fn record(&self, id: &CoreId) -> Result<(), DbError> {
        self.check_available()?;
        let identifier = id.to_string();
        if !self.lock().identifiers.insert(identifier.clone()) {
            return Err(DbError::DuplicateIdentifier { identifier });
        }
        Ok(())
    }

    async fn contains(&self, identifier: &str) -> Result<bool, DbError> {
        self.check_available()?;
        Ok(self.lock().identifiers.contains(identifier))
    }

    async fn list_by_location(
        &self,
        location: &LocationDigits,
        role: Option<&RoleDigits>,
    ) -> Result<Vec<String>, DbError> {
        self.check_available()?;
        let location = location.as_str();
        let role = role.map(RoleDigits::as_str);

        Ok(self
            .lock()
            .identifiers
            .iter()
            .filter(|id| {
                let mut segments = id.splitn(3, '.');
                let (Some(r), Some(l), Some(_)) =
                    (segments.next(), segments.next(), segments.next())
                else {
                    return false;
                };
                r.chars().count() == 2 && l == location && role.is_none_or(|role| role == r)
            })
            .cloned()
            .collect())
    }

    async fn relocate(&self, moves: &[(CoreId, CoreId)]) -> Result<u64, DbError> {
        self.check_available()?;
        let mut inner = self.lock();

        // Validate everything before touching the set.
        let mut staged = inner.identifiers.clone();
        let mut rewritten = 0;
        for (from, to) in moves {
            if staged.remove(&from.to_string()) {
                let target = to.to_string();
                if !staged.insert(target.clone()) {
                    return Err(DbError::DuplicateIdentifier { identifier: target });
                }
                rewritten += 1;
            }
        }

        inner.identifiers = staged;
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CoreId {
        CoreId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_find_max_respects_prefix_boundary() {
        let store = MemoryIdentifierStore::with_identifiers([
            "04.3171.0002",
            "04.3171.0010",
            "04.3172.0099",
            "04.3170.0500",
        ]);

        let max = store.find_max_starting_with("04.3171.").await.unwrap();
        assert_eq!(max.as_deref(), Some("04.3171.0010"));
        assert_eq!(store.find_max_starting_with("05.3171.").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reserve_sequence_honours_floor() {
        let store = MemoryIdentifierStore::new();
        assert_eq!(store.reserve_sequence("04.3171.", 0).await.unwrap(), 1);
        assert_eq!(store.reserve_sequence("04.3171.", 0).await.unwrap(), 2);
        assert_eq!(store.reserve_sequence("04.3171.", 7).await.unwrap(), 8);
        assert_eq!(store.reserve_sequence("04.3171.", 3).await.unwrap(), 9);
        assert_eq!(store.counter("04.3171."), Some(9));
    }

    #[tokio::test]
    async fn test_record_rejects_duplicates() {
        let store = MemoryIdentifierStore::new();
        store.record(&id("02.9999.0001")).await.unwrap();
        let err = store.record(&id("02.9999.0001")).await.unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn test_list_by_location_includes_malformed_rows() {
        let store = MemoryIdentifierStore::with_identifiers([
            "03.0000.0001",
            "04.0000.0002",
            "04.0000.abcd",
            "04.3171.0001",
        ]);
        let placeholder = LocationDigits::PLACEHOLDER;

        let all = store.list_by_location(&placeholder, None).await.unwrap();
        assert_eq!(all, vec!["03.0000.0001", "04.0000.0002", "04.0000.abcd"]);

        let athletes = RoleDigits::parse("04").unwrap();
        let only = store
            .list_by_location(&placeholder, Some(&athletes))
            .await
            .unwrap();
        assert_eq!(only, vec!["04.0000.0002", "04.0000.abcd"]);
    }

    #[tokio::test]
    async fn test_relocate_is_all_or_nothing() {
        let store = MemoryIdentifierStore::with_identifiers(["03.0000.0001", "03.0000.0002", "03.9999.0002"]);
        let moves = vec![
            (id("03.0000.0001"), id("03.9999.0001")),
            (id("03.0000.0002"), id("03.9999.0002")),
        ];

        let err = store.relocate(&moves).await.unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(
            store.identifiers(),
            vec!["03.0000.0001", "03.0000.0002", "03.9999.0002"]
        );
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryIdentifierStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.find_max_starting_with("04.3171.").await,
            Err(DbError::Query(_))
        ));
        assert!(store.reserve_sequence("04.3171.", 0).await.is_err());
        store.set_unavailable(false);
        assert!(store.reserve_sequence("04.3171.", 0).await.is_ok());
    }
}
