//! Uniform response envelope
//!
//! Every endpoint answers with `{code, message, payload}`. `code` is 0 on
//! success and otherwise mirrors the HTTP status of the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

pub const OK_MESSAGE: &str = "OK";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

pub const CODE_SUCCESS: i32 = 0;
pub const CODE_BAD_REQUEST: i32 = 400;
pub const CODE_NOT_FOUND: i32 = 404;
pub const CODE_METHOD_NOT_ALLOWED: i32 = 405;
pub const CODE_SERVER_ERROR: i32 = 500;

/// Response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply<T> {
    pub code: i32,
    pub message: String,
    pub payload: Option<T>,
}

impl<T> Reply<T> {
    /// Success carrying a result
    pub fn success(payload: T) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: OK_MESSAGE.to_string(),
            payload: Some(payload),
        }
    }

    /// Success for operations without a result
    pub fn ok() -> Self {
        Self {
            code: CODE_SUCCESS,
            message: OK_MESSAGE.to_string(),
            payload: None,
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            payload: None,
        }
    }

    pub fn not_found() -> Self {
        Self::error(CODE_NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    pub fn method_not_allowed() -> Self {
        Self::error(CODE_METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(CODE_BAD_REQUEST, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::error(CODE_SERVER_ERROR, message)
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }

    /// HTTP status matching the envelope code
    pub fn status(&self) -> StatusCode {
        if self.is_success() {
            return StatusCode::OK;
        }
        u16::try_from(self.code)
            .ok()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let reply = Reply::success(42);
        assert_eq!(reply.code, 0);
        assert_eq!(reply.message, "OK");
        assert_eq!(reply.payload, Some(42));
        assert_eq!(reply.status(), StatusCode::OK);
    }

    #[test]
    fn test_void_success_serializes_null_payload() {
        let value = serde_json::to_value(Reply::<()>::ok()).unwrap();
        assert_eq!(value, serde_json::json!({ "code": 0, "message": "OK", "payload": null }));
    }

    #[test]
    fn test_error_envelopes() {
        let not_found = Reply::<()>::not_found();
        assert_eq!(not_found.code, 404);
        assert_eq!(not_found.message, "Resource not found");
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let bad = Reply::<()>::bad_request("Customer name parameter is required");
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
        assert!(bad.payload.is_none());

        let wrong_method = Reply::<()>::method_not_allowed();
        assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);

        let failed = Reply::<()>::server_error("Failed to create transaction: disk full");
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_code_maps_to_server_error_status() {
        assert_eq!(Reply::<()>::error(-7, "odd").status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Reply::<()>::error(70000, "odd").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
