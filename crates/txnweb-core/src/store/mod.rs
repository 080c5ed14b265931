//! Durable keyed storage for transaction records
//!
//! The store owns id assignment and primary-key uniqueness. Backends:
//! - memory: `BTreeMap` behind a lock, lost on restart
//! - file: the memory backend mirrored to a JSON snapshot after each write

mod file;
mod memory;

use async_trait::async_trait;
use std::sync::Arc;
use txnweb_config::{StorageBackend, StorageConfig};

use crate::error::CoreResult;
use crate::models::{CustomerId, NewTransaction, Transaction, TransactionId};
use crate::query::TransactionFilter;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Store reference type
pub type StoreRef = Arc<dyn TransactionStore>;

/// Trait for transaction record stores
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a new record and return it with its assigned id
    async fn insert(&self, record: NewTransaction) -> CoreResult<Transaction>;

    /// Look up a record by id
    async fn get(&self, id: TransactionId) -> CoreResult<Option<Transaction>>;

    /// Overwrite an existing record in full
    async fn replace(&self, record: Transaction) -> CoreResult<Transaction>;

    /// Remove a record; returns whether it existed
    async fn remove(&self, id: TransactionId) -> CoreResult<bool>;

    /// All records matching the filter, in ascending id order
    async fn find(&self, filter: &TransactionFilter) -> CoreResult<Vec<Transaction>>;

    /// Sum of amounts over the customer's valid records, `None` when nothing
    /// contributes to the sum
    async fn total_amount(&self, customer_id: CustomerId) -> CoreResult<Option<i64>>;

    /// Number of stored records
    async fn count(&self) -> CoreResult<usize>;
}

/// Open the store selected by the configuration
pub async fn open_store(config: &StorageConfig) -> CoreResult<StoreRef> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::File => {
            let store = FileStore::open(config.path.clone()).await?;
            log::info!("Using snapshot file {}", store.path().display());
            Ok(Arc::new(store))
        }
    }
}
