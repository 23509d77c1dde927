//! In-memory store. Thread-safe via RwLock; ids come from a counter that never goes backwards.

use crate::error::StoreError;
use crate::resource::{Fields, Resource};
use crate::store::ResourceStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    rows: BTreeMap<u64, Resource>,
    last_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Resource>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Resource>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn insert(&self, candidate: &Fields) -> Result<Resource, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        inner.last_id += 1;
        let now = Utc::now();
        let resource = Resource {
            id: inner.last_id,
            fields: candidate.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(resource.id, resource.clone());
        Ok(resource)
    }

    async fn replace(&self, id: u64, candidate: &Fields) -> Result<Option<Resource>, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.fields = candidate.clone();
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_by_id(&self, id: u64) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(u64::from(inner.rows.remove(&id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn candidate(title: &str) -> Fields {
        let mut f = Fields::new();
        f.insert("title".into(), json!(title));
        f
    }

    #[tokio::test]
    async fn ids_are_monotonic_and_never_reused() {
        let store = MemoryStore::new();
        let a = store.insert(&candidate("a")).await.unwrap();
        let b = store.insert(&candidate("b")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert_eq!(store.delete_by_id(2).await.unwrap(), 1);
        let c = store.insert(&candidate("c")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn find_all_is_ordered_and_empty_is_ok() {
        let store = MemoryStore::new();
        assert!(store.find_all().await.unwrap().is_empty());
        for t in ["x", "y", "z"] {
            store.insert(&candidate(t)).await.unwrap();
        }
        let ids: Vec<u64> = store.find_all().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn replace_keeps_identity_and_created_at() {
        let store = MemoryStore::new();
        let created = store.insert(&candidate("old")).await.unwrap();
        let replaced = store.replace(created.id, &candidate("new")).await.unwrap().unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.created_at, created.created_at);
        assert!(replaced.updated_at >= created.updated_at);
        assert_eq!(replaced.get("title"), Some(&json!("new")));

        assert!(store.replace(99, &candidate("x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_returns_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.delete_by_id(1).await.unwrap(), 0);
        store.insert(&candidate("a")).await.unwrap();
        assert_eq!(store.delete_by_id(1).await.unwrap(), 1);
        assert_eq!(store.delete_by_id(1).await.unwrap(), 0);
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn poisoned_lock_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        let writer = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = writer.inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Poisoned)));
        assert!(matches!(store.find_all().await, Err(StoreError::Poisoned)));
        assert!(matches!(store.insert(&candidate("a")).await, Err(StoreError::Poisoned)));
    }
}
