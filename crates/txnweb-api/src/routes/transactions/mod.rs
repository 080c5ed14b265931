//! Transaction routes
//!
//! Structure:
//! - api.rs: JSON endpoints for records, filters and totals

pub mod api;

pub use api::{
    api_create_transaction,
    api_customer_total,
    api_delete_transaction,
    api_search_transactions,
    api_transaction_detail,
    api_transactions,
    api_transactions_by_amount_range,
    api_transactions_by_customer,
    api_update_transaction,
    api_valid_transactions,
};
