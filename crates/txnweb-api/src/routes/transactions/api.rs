//! Transactions API endpoints - JSON envelope responses
//!
//! Endpoints:
//! - api_transactions: List all transactions
//! - api_transaction_detail: Get single transaction
//! - api_transactions_by_customer: Transactions for a customer
//! - api_valid_transactions: Transactions flagged valid
//! - api_search_transactions: Search by customer name
//! - api_transactions_by_amount_range: Inclusive amount filter
//! - api_create_transaction: Create a transaction
//! - api_update_transaction: Merge a payload into a transaction
//! - api_delete_transaction: Delete a transaction
//! - api_customer_total: Total valid amount for a customer

use crate::error::ApiError;
use crate::reply::Reply;
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use std::collections::HashMap;
use txnweb_core::{CustomerId, Transaction, TransactionId, TransactionInput};

type ApiResult<T> = Result<Reply<T>, ApiError>;

/// Fetch a required integer query parameter
fn required_i64(params: &HashMap<String, String>, name: &str) -> Result<i64, ApiError> {
    let raw = params
        .get(name)
        .ok_or_else(|| ApiError::bad_request(format!("Required parameter '{}' is missing", name)))?;
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Parameter '{}' must be an integer", name)))
}

/// Fetch an optional boolean query parameter
fn optional_bool(params: &HashMap<String, String>, name: &str) -> Result<Option<bool>, ApiError> {
    match params.get(name) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            _ => Err(ApiError::bad_request(format!(
                "Parameter '{}' must be true or false",
                name
            ))),
        },
    }
}

/// List all transactions
pub async fn api_transactions(State(state): State<AppState>) -> ApiResult<Vec<Transaction>> {
    let transactions = state
        .service
        .all_transactions()
        .await
        .map_err(|e| ApiError::from_core("Failed to list transactions", e))?;
    Ok(Reply::success(transactions))
}

/// Get single transaction detail
pub async fn api_transaction_detail(
    State(state): State<AppState>,
    path: Result<Path<TransactionId>, PathRejection>,
) -> ApiResult<Transaction> {
    let Path(id) = path?;
    state
        .service
        .transaction(id)
        .await
        .map_err(|e| ApiError::from_core("Failed to load transaction", e))?
        .map(Reply::success)
        .ok_or(ApiError::NotFound)
}

/// Transactions for a customer, optionally narrowed by `isValid`
pub async fn api_transactions_by_customer(
    State(state): State<AppState>,
    path: Result<Path<CustomerId>, PathRejection>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Transaction>> {
    let Path(customer_id) = path?;
    let result = match optional_bool(&params, "isValid")? {
        Some(is_valid) => {
            state
                .service
                .transactions_by_customer_validity(customer_id, is_valid)
                .await
        }
        None => state.service.transactions_by_customer(customer_id).await,
    };
    let transactions =
        result.map_err(|e| ApiError::from_core("Failed to list customer transactions", e))?;
    Ok(Reply::success(transactions))
}

/// Transactions flagged valid
pub async fn api_valid_transactions(State(state): State<AppState>) -> ApiResult<Vec<Transaction>> {
    let transactions = state
        .service
        .valid_transactions()
        .await
        .map_err(|e| ApiError::from_core("Failed to list valid transactions", e))?;
    Ok(Reply::success(transactions))
}

/// Search by customer name (case-insensitive substring)
pub async fn api_search_transactions(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Transaction>> {
    let customer_name = params.get("customerName").map(|s| s.as_str());
    let transactions = state
        .service
        .search_by_customer_name(customer_name)
        .await
        .map_err(|e| ApiError::from_core("Failed to search transactions", e))?;
    Ok(Reply::success(transactions))
}

/// Inclusive amount range filter
pub async fn api_transactions_by_amount_range(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<Transaction>> {
    let min_amount = required_i64(&params, "minAmount")?;
    let max_amount = required_i64(&params, "maxAmount")?;
    let transactions = state
        .service
        .transactions_by_amount_range(min_amount, max_amount)
        .await
        .map_err(|e| ApiError::from_core("Failed to filter transactions", e))?;
    Ok(Reply::success(transactions))
}

/// Create a new transaction
pub async fn api_create_transaction(
    State(state): State<AppState>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Json(input) = body?;
    let created = state
        .service
        .create_transaction(input)
        .await
        .map_err(|e| ApiError::from_core("Failed to create transaction", e))?;
    Ok(Reply::success(created))
}

/// Merge the provided fields into an existing transaction
pub async fn api_update_transaction(
    State(state): State<AppState>,
    path: Result<Path<TransactionId>, PathRejection>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<Transaction> {
    let Path(id) = path?;
    let Json(input) = body?;
    let updated = state
        .service
        .update_transaction(id, input)
        .await
        .map_err(|e| ApiError::from_core("Failed to update transaction", e))?;
    Ok(Reply::success(updated))
}

/// Delete a transaction
pub async fn api_delete_transaction(
    State(state): State<AppState>,
    path: Result<Path<TransactionId>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    state
        .service
        .delete_transaction(id)
        .await
        .map_err(|e| ApiError::from_core("Failed to delete transaction", e))?;
    Ok(Reply::ok())
}

/// Total valid amount for a customer
pub async fn api_customer_total(
    State(state): State<AppState>,
    path: Result<Path<CustomerId>, PathRejection>,
) -> ApiResult<i64> {
    let Path(customer_id) = path?;
    let total = state
        .service
        .total_amount_by_customer(customer_id)
        .await
        .map_err(|e| ApiError::from_core("Failed to calculate total amount", e))?;
    Ok(Reply::success(total))
}
