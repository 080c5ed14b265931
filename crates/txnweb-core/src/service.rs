//! Transaction service: business operations over a record store

use crate::error::{CoreError, CoreResult};
use crate::merge::{merge_update, prepare_create};
use crate::models::{CustomerId, Transaction, TransactionId, TransactionInput};
use crate::query::{AmountRange, TransactionFilter};
use crate::store::StoreRef;
use crate::time::ClockRef;

/// Creates, merges, queries and deletes transactions
///
/// Update is read-merge-write with no lock held between the read and the
/// write; concurrent updates to one id resolve as last write wins.
#[derive(Clone)]
pub struct TransactionService {
    store: StoreRef,
    clock: ClockRef,
}

impl TransactionService {
    pub fn new(store: StoreRef, clock: ClockRef) -> Self {
        Self { store, clock }
    }

    // ==================== Queries ====================

    pub async fn all_transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.store.find(&TransactionFilter::All).await
    }

    pub async fn transaction(&self, id: TransactionId) -> CoreResult<Option<Transaction>> {
        self.store.get(id).await
    }

    pub async fn transactions_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> CoreResult<Vec<Transaction>> {
        self.store.find(&TransactionFilter::Customer(customer_id)).await
    }

    pub async fn transactions_by_customer_validity(
        &self,
        customer_id: CustomerId,
        is_valid: bool,
    ) -> CoreResult<Vec<Transaction>> {
        self.store
            .find(&TransactionFilter::CustomerValidity { customer_id, is_valid })
            .await
    }

    pub async fn valid_transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.store.find(&TransactionFilter::Valid).await
    }

    /// Case-insensitive substring search; a blank name is a validation error
    pub async fn search_by_customer_name(
        &self,
        customer_name: Option<&str>,
    ) -> CoreResult<Vec<Transaction>> {
        let filter = TransactionFilter::name_search(customer_name)?;
        self.store.find(&filter).await
    }

    /// Inclusive amount filter; bounds are validated before the store is hit
    pub async fn transactions_by_amount_range(
        &self,
        min_amount: i64,
        max_amount: i64,
    ) -> CoreResult<Vec<Transaction>> {
        let range = AmountRange::new(min_amount, max_amount)?;
        self.store.find(&range.into()).await
    }

    /// Total of valid amounts for a customer, `0` when there are none
    pub async fn total_amount_by_customer(&self, customer_id: CustomerId) -> CoreResult<i64> {
        Ok(self.store.total_amount(customer_id).await?.unwrap_or(0))
    }

    // ==================== Mutations ====================

    pub async fn create_transaction(&self, input: TransactionInput) -> CoreResult<Transaction> {
        let record = prepare_create(input, self.clock.now());
        let created = self.store.insert(record).await?;
        log::info!(
            "Created transaction {} for customer {:?}",
            created.id,
            created.customer_id
        );
        Ok(created)
    }

    pub async fn update_transaction(
        &self,
        id: TransactionId,
        input: TransactionInput,
    ) -> CoreResult<Transaction> {
        let existing = self
            .store
            .get(id)
            .await?
            .ok_or(CoreError::TransactionNotFound { id })?;

        let updated = self.store.replace(merge_update(existing, input)).await?;
        log::info!("Updated transaction {}", id);
        Ok(updated)
    }

    /// Delete a record; a missing id is `TransactionNotFound`, not a no-op
    pub async fn delete_transaction(&self, id: TransactionId) -> CoreResult<()> {
        if self.store.get(id).await?.is_none() {
            return Err(CoreError::TransactionNotFound { id });
        }

        // Another request may have removed it since the lookup
        if !self.store.remove(id).await? {
            return Err(CoreError::TransactionNotFound { id });
        }
        log::info!("Deleted transaction {}", id);
        Ok(())
    }
}

// ==================== Tests ====================
