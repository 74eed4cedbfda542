//! Error types for the cart ledger
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

// == Field Error ==
/// A single failed input rule, reported next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the input field (e.g. "email")
    pub field: &'static str,
    /// Human readable message
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

// == Ledger Error Enum ==
/// Unified error type for the cart ledger and its HTTP surface.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Checkout attempted on a cart with no items
    #[error("Your cart is empty")]
    EmptyCart,

    /// Operation requires an authenticated session
    #[error("Please login to checkout")]
    Unauthenticated,

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A line total or order total does not fit in a decimal amount
    #[error("Cart amount is out of range")]
    AmountOverflow,

    /// One or more input fields failed validation
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// The external auth service failed or rejected the call
    #[error("Auth service error: {0}")]
    Upstream(String),

    /// Internal error (e.g. serialization of the cart failed)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Upstream(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = match &self {
            LedgerError::EmptyCart => StatusCode::CONFLICT,
            LedgerError::Unauthenticated => StatusCode::UNAUTHORIZED,
            LedgerError::InvalidRequest(_)
            | LedgerError::AmountOverflow
            | LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
            LedgerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            LedgerError::Validation(fields) => Json(json!({
                "error": self.to_string(),
                "fields": fields,
            })),
            _ => Json(json!({
                "error": self.to_string()
            })),
        };

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cart ledger.
pub type Result<T> = std::result::Result<T, LedgerError>;
