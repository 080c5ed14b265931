//! In-memory transaction store

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::TransactionStore;
use crate::error::{CoreError, CoreResult};
use crate::models::{CustomerId, NewTransaction, Transaction, TransactionId};
use crate::query::TransactionFilter;

/// In-memory store data
#[derive(Debug, Clone)]
pub(crate) struct StoreData {
    pub(crate) next_id: TransactionId,
    pub(crate) records: BTreeMap<TransactionId, Transaction>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: BTreeMap::new(),
        }
    }
}

impl StoreData {
    pub(crate) fn insert(&mut self, record: NewTransaction) -> Transaction {
        let id = self.next_id;
        self.next_id += 1;

        let transaction = record.into_transaction(id);
        self.records.insert(id, transaction.clone());
        transaction
    }

    pub(crate) fn replace(&mut self, record: Transaction) -> CoreResult<Transaction> {
        match self.records.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(CoreError::storage(format!(
                "transaction {} disappeared before it could be written",
                record.id
            ))),
        }
    }

    pub(crate) fn remove(&mut self, id: TransactionId) -> bool {
        self.records.remove(&id).is_some()
    }
}

/// Store that keeps records in a map for the life of the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_data(data: StoreData) -> Self {
        Self { data: RwLock::new(data) }
    }

    fn read(&self) -> CoreResult<RwLockReadGuard<'_, StoreData>> {
        self.data
            .read()
            .map_err(|_| CoreError::storage("record lock poisoned"))
    }

    fn write(&self) -> CoreResult<RwLockWriteGuard<'_, StoreData>> {
        self.data
            .write()
            .map_err(|_| CoreError::storage("record lock poisoned"))
    }

    /// Copy of the current contents, for staging a change
    pub(crate) fn snapshot(&self) -> CoreResult<StoreData> {
        Ok(self.read()?.clone())
    }

    /// Swap in staged contents
    pub(crate) fn commit(&self, data: StoreData) -> CoreResult<()> {
        *self.write()? = data;
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn insert(&self, record: NewTransaction) -> CoreResult<Transaction> {
        let transaction = self.write()?.insert(record);
        log::debug!("Inserted transaction {}", transaction.id);
        Ok(transaction)
    }

    async fn get(&self, id: TransactionId) -> CoreResult<Option<Transaction>> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    async fn replace(&self, record: Transaction) -> CoreResult<Transaction> {
        let transaction = self.write()?.replace(record)?;
        log::debug!("Replaced transaction {}", transaction.id);
        Ok(transaction)
    }

    async fn remove(&self, id: TransactionId) -> CoreResult<bool> {
        let removed = self.write()?.remove(id);
        if removed {
            log::debug!("Removed transaction {}", id);
        }
        Ok(removed)
    }

    async fn find(&self, filter: &TransactionFilter) -> CoreResult<Vec<Transaction>> {
        let data = self.read()?;
        Ok(data
            .records
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn total_amount(&self, customer_id: CustomerId) -> CoreResult<Option<i64>> {
        let data = self.read()?;
        let mut total: Option<i64> = None;
        for amount in data
            .records
            .values()
            .filter(|t| t.is_valid && t.belongs_to(customer_id))
            .filter_map(|t| t.amount)
        {
            total = Some(
                total
                    .unwrap_or(0)
                    .checked_add(amount)
                    .ok_or_else(|| CoreError::storage("amount total overflowed"))?,
            );
        }
        Ok(total)
    }

    async fn count(&self) -> CoreResult<usize> {
        Ok(self.read()?.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn new_tx(customer_id: i64, amount: Option<i64>, is_valid: bool) -> NewTransaction {
        NewTransaction {
            customer_id: Some(customer_id),
            customer_name: Some(format!("customer-{}", customer_id)),
            amount,
            created_at: created(),
            is_valid,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = store.insert(new_tx(1, Some(10), true)).await.unwrap();
        let second = store.insert(new_tx(1, Some(20), true)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_remove() {
        let store = MemoryStore::new();
        let first = store.insert(new_tx(1, Some(10), true)).await.unwrap();
        assert!(store.remove(first.id).await.unwrap());

        let second = store.insert(new_tx(1, Some(10), true)).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_get_and_remove() {
        let store = MemoryStore::new();
        let tx = store.insert(new_tx(3, Some(10), true)).await.unwrap();

        assert_eq!(store.get(tx.id).await.unwrap(), Some(tx.clone()));
        assert!(store.remove(tx.id).await.unwrap());
        assert!(!store.remove(tx.id).await.unwrap());
        assert_eq!(store.get(tx.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_replace_overwrites_whole_record() {
        let store = MemoryStore::new();
        let mut tx = store.insert(new_tx(1, Some(10), true)).await.unwrap();
        tx.amount = None;
        tx.is_valid = false;

        store.replace(tx.clone()).await.unwrap();
        assert_eq!(store.get(tx.id).await.unwrap(), Some(tx));
    }

    #[tokio::test]
    async fn test_replace_missing_record_is_storage_error() {
        let store = MemoryStore::new();
        let ghost = new_tx(1, Some(10), true).into_transaction(42);

        let err = store.replace(ghost).await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::StorageError);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_returns_ascending_ids() {
        let store = MemoryStore::new();
        for amount in [30, 10, 20] {
            store.insert(new_tx(1, Some(amount), true)).await.unwrap();
        }

        let ids: Vec<_> = store
            .find(&TransactionFilter::All)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_total_amount_counts_valid_records_only() {
        let store = MemoryStore::new();
        store.insert(new_tx(1, Some(100), true)).await.unwrap();
        store.insert(new_tx(1, Some(-30), true)).await.unwrap();
        store.insert(new_tx(1, Some(1000), false)).await.unwrap();
        store.insert(new_tx(1, None, true)).await.unwrap();
        store.insert(new_tx(2, Some(5), true)).await.unwrap();

        assert_eq!(store.total_amount(1).await.unwrap(), Some(70));
        assert_eq!(store.total_amount(2).await.unwrap(), Some(5));
        assert_eq!(store.total_amount(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_total_amount_overflow_is_storage_error() {
        let store = MemoryStore::new();
        store.insert(new_tx(1, Some(i64::MAX), true)).await.unwrap();
        store.insert(new_tx(1, Some(1), true)).await.unwrap();

        assert!(store.total_amount(1).await.is_err());
    }
}
