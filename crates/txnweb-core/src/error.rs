//! Error types for txnweb-core
//!
//! This module provides the error taxonomy for the transaction service,
//! including error codes, severities, detailed messages, and suggestions.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

use crate::models::TransactionId;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Transaction not found
    TransactionNotFound,
    /// Validation error
    ValidationError,
    /// Storage error
    StorageError,
    /// Snapshot file I/O failed
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for txnweb-core
///
/// Display text may reach API clients, so it never names files or carries
/// OS error strings. Those go to the logs through `to_details`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: TransactionId },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Snapshot {action} failed")]
    IoError {
        action: &'static str,
        #[source]
        source: io::Error,
    },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError { message: message.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        CoreError::StorageError { message: message.into() }
    }

    pub fn io(action: &'static str, source: io::Error) -> Self {
        CoreError::IoError { action, source }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::StorageError { .. } => ErrorCode::StorageError,
            CoreError::IoError { .. } => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::TransactionNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::StorageError { .. } => ErrorSeverity::Error,
            CoreError::IoError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::TransactionNotFound { id } => {
                details = details.with_detail(serde_json::json!({ "id": id }));
                details = details.with_suggestion(
                    "Use the /v1/transactions endpoint to list all transactions.".to_string()
                );
            }
            CoreError::ValidationError { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
            }
            CoreError::StorageError { .. } => {
                details = details.with_suggestion(
                    "Check that the snapshot is valid JSON.".to_string()
                );
            }
            CoreError::IoError { action, source } => {
                details = details.with_detail(serde_json::json!({
                    "action": action,
                    "cause": source.to_string(),
                }));
                details = details.with_suggestion(
                    "Check that the storage path is writable.".to_string()
                );
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data, logged but never returned to clients
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log debug information
    fn log_debug(&self, message: &str, context: &ErrorContext);

    /// Route an error by severity: info and warning to debug, the rest to error
    fn log(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => {
                self.log_debug(&error.to_string(), context)
            }
            ErrorSeverity::Error | ErrorSeverity::Critical => self.log_error(error, context),
        }
    }
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "txnweb::error",
            "ERROR [{}] {} - Operation: {} - Data: {}",
            error.severity(),
            error.to_details(),
            context.operation,
            context.data
        );
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        log::debug!(
            target: "txnweb::error",
            "DEBUG: {} - Operation: {} - Data: {}",
            message,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================
