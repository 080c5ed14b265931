//! Error types for txnweb-api

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use txnweb_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use txnweb_core::CoreError;

use crate::reply::Reply;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found")]
    NotFound,

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{operation}: {message}")]
    InternalError { operation: String, message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest { message: message.into() }
    }

    /// Classify a core failure raised while performing `operation`
    pub fn from_core(operation: &str, error: CoreError) -> Self {
        DefaultErrorLogger.log(&error, &ErrorContext::new(operation));
        match error {
            CoreError::TransactionNotFound { .. } => ApiError::NotFound,
            CoreError::ValidationError { message } => ApiError::BadRequest { message },
            other => ApiError::InternalError {
                operation: operation.to_string(),
                message: other.to_string(),
            },
        }
    }

    pub fn into_reply<T>(self) -> Reply<T> {
        match self {
            ApiError::NotFound => Reply::not_found(),
            ApiError::BadRequest { message } => Reply::bad_request(message),
            internal @ ApiError::InternalError { .. } => Reply::server_error(internal.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_reply::<()>().into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        ApiError::from_core("Request failed", error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}
