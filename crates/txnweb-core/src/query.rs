//! Filter predicates and validation of query parameters
//!
//! Validation happens here, before any store lookup, so a rejected
//! parameter never reaches the store.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::{CustomerId, Transaction};

pub const BLANK_NAME_MESSAGE: &str = "Customer name parameter is required";
pub const INVALID_RANGE_MESSAGE: &str =
    "Invalid amount range: minAmount and maxAmount must be positive and minAmount <= maxAmount";

/// Store lookup predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionFilter {
    /// Every record
    All,
    /// Records owned by a customer
    Customer(CustomerId),
    /// Records owned by a customer with the given validity
    CustomerValidity { customer_id: CustomerId, is_valid: bool },
    /// Records flagged valid
    Valid,
    /// Case-insensitive name match; the needle is stored lowercased
    NameContains(String),
    /// Inclusive amount range
    AmountBetween { min: i64, max: i64 },
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Customer(customer_id) => tx.belongs_to(*customer_id),
            TransactionFilter::CustomerValidity { customer_id, is_valid } => {
                tx.belongs_to(*customer_id) && tx.is_valid == *is_valid
            }
            TransactionFilter::Valid => tx.is_valid,
            TransactionFilter::NameContains(needle) => tx.name_contains(needle),
            TransactionFilter::AmountBetween { min, max } => tx.amount_between(*min, *max),
        }
    }

    /// Build a name search, rejecting a missing or blank term
    pub fn name_search(customer_name: Option<&str>) -> CoreResult<Self> {
        match customer_name {
            Some(name) if !name.trim().is_empty() => {
                Ok(TransactionFilter::NameContains(name.to_lowercase()))
            }
            _ => Err(CoreError::validation(BLANK_NAME_MESSAGE)),
        }
    }
}

/// A validated inclusive amount range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountRange {
    min: i64,
    max: i64,
}

impl AmountRange {
    /// Both bounds must be non-negative and `min <= max`
    pub fn new(min: i64, max: i64) -> CoreResult<Self> {
        if min < 0 || max < 0 || min > max {
            return Err(CoreError::validation(INVALID_RANGE_MESSAGE));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

impl From<AmountRange> for TransactionFilter {
    fn from(range: AmountRange) -> Self {
        TransactionFilter::AmountBetween { min: range.min, max: range.max }
    }
}
