//! Repository layer for data access operations.
//!
//! Provides the document store abstraction and its Postgres and
//! in-memory implementations.

mod document_store;
mod memory_store;
mod pg_store;

pub use document_store::DocumentStore;
pub use memory_store::MemoryDocumentStore;
pub use pg_store::PgDocumentStore;

use std::sync::Arc;

use crate::db::AsyncDbPool;
use crate::models::{ResourceKind, Tour, User};

/// Aggregates the store handle shared by all services.
///
/// Cloning is cheap since the store sits behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub store: Arc<dyn DocumentStore>,
}

impl Repositories {
    /// Wraps an already constructed store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates repositories backed by PostgreSQL.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    pub fn postgres(pool: AsyncDbPool) -> Self {
        Self::new(Arc::new(PgDocumentStore::new(pool)))
    }

    /// Creates repositories backed by an in-memory store with the unique
    /// fields of every resource kind registered.
    pub fn memory() -> Self {
        Self::new(Arc::new(memory_store_for_resources()))
    }
}

/// Builds a memory store enforcing the unique fields declared by the
/// served resource kinds.
pub fn memory_store_for_resources() -> MemoryDocumentStore {
    let store = register_unique_fields::<Tour>(MemoryDocumentStore::new());
    register_unique_fields::<User>(store)
}

fn register_unique_fields<K: ResourceKind>(mut store: MemoryDocumentStore) -> MemoryDocumentStore {
    for field in K::UNIQUE_FIELDS {
        store = store.with_unique_field(K::COLLECTION, field);
    }
    store
}
