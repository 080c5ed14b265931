//! Core data models for transaction records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Store-assigned record identifier
pub type TransactionId = i64;

/// Customer identifier
pub type CustomerId = i64;

/// A stored transaction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier, assigned by the store on insert
    pub id: TransactionId,
    /// Owning customer
    pub customer_id: Option<CustomerId>,
    /// Customer display name
    pub customer_name: Option<String>,
    /// Signed amount in monetary units
    pub amount: Option<i64>,
    /// Creation timestamp, written once
    pub created_at: NaiveDateTime,
    /// Business validity flag
    pub is_valid: bool,
}

impl Transaction {
    /// Case-insensitive substring match on the customer name
    pub fn name_contains(&self, needle_lower: &str) -> bool {
        self.customer_name
            .as_deref()
            .map(|name| name.to_lowercase().contains(needle_lower))
            .unwrap_or(false)
    }

    /// Check if the amount lies in `[min, max]`
    pub fn amount_between(&self, min: i64, max: i64) -> bool {
        self.amount.map(|a| a >= min && a <= max).unwrap_or(false)
    }

    pub fn belongs_to(&self, customer_id: CustomerId) -> bool {
        self.customer_id == Some(customer_id)
    }
}

/// Incoming create/update payload
///
/// Every field is optional. An absent or `null` JSON field deserializes to
/// `None` and means "not provided"; `Some(0)`, `Some("")` and `Some(false)`
/// are real values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// Ignored on both create and update
    #[serde(default, alias = "pkId")]
    pub id: Option<TransactionId>,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    /// Honoured on create only
    #[serde(default, alias = "createTime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_valid: Option<bool>,
}

impl TransactionInput {
    pub fn with_customer(mut self, customer_id: CustomerId, customer_name: &str) -> Self {
        self.customer_id = Some(customer_id);
        self.customer_name = Some(customer_name.to_string());
        self
    }

    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_validity(mut self, is_valid: bool) -> Self {
        self.is_valid = Some(is_valid);
        self
    }

    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// A record ready for insertion; the store supplies the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub customer_id: Option<CustomerId>,
    pub customer_name: Option<String>,
    pub amount: Option<i64>,
    pub created_at: NaiveDateTime,
    pub is_valid: bool,
}

impl NewTransaction {
    /// Attach the store-assigned id
    pub fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            amount: self.amount,
            created_at: self.created_at,
            is_valid: self.is_valid,
        }
    }
}
