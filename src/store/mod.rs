//! Resource persistence port and its adapters.
//!
//! - [`MemoryStore`]: process-local map, used by tests and `STORE=memory`
//! - [`PgStore`]: PostgreSQL table per resource type

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::StoreError;
use crate::resource::{Fields, Resource};
use async_trait::async_trait;

/// Durable key-addressed storage for one resource type.
///
/// Each method is a single atomic operation. Validation happens before any call reaches a store.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// All resources in ascending id order. Empty when nothing is stored.
    async fn find_all(&self) -> Result<Vec<Resource>, StoreError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<Resource>, StoreError>;

    /// Assign a fresh id, set both timestamps, persist.
    async fn insert(&self, candidate: &Fields) -> Result<Resource, StoreError>;

    /// Overwrite every declared field of row `id`, keeping `created_at`. `None` if no such row.
    async fn replace(&self, id: u64, candidate: &Fields) -> Result<Option<Resource>, StoreError>;

    /// Number of rows removed: 0 or 1.
    async fn delete_by_id(&self, id: u64) -> Result<u64, StoreError>;

    /// Liveness check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
