//! Error responses.
//!
//! # Responsibilities
//! - Turn a rejected `ValidationResult` into 400 Bad Request
//! - Turn a caught panic into 500 Internal Server Error
//! - Serialize both with the same JSON envelope
//!
//! # Body
//! ```text
//! { "error": { "code": 400, "message": "...",
//!              "details": [ { "header": "X-Id", "reason": "missing" } ] } }
//! ```
//! `details` is omitted when empty and sorted by header name, then reason.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::validation::{ValidationFailure, ValidationResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    status: StatusCode,
    message: &'static str,
    details: Vec<ValidationFailure>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    message: &'a str,
    #[serde(skip_serializing_if = "no_details")]
    details: &'a [ValidationFailure],
}

fn no_details(details: &&[ValidationFailure]) -> bool {
    details.is_empty()
}

impl ErrorResponse {
    /// 400 carrying every header failure.
    pub fn header_validation(result: ValidationResult) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "header validation failed",
            details: result.sorted(),
        }
    }

    /// Opaque 500. Never carries panic details.
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal server error",
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn body(&self) -> serde_json::Value {
        let envelope = Envelope {
            error: ErrorBody {
                code: self.status.as_u16(),
                message: self.message,
                details: &self.details,
            },
        };
        serde_json::to_value(envelope).unwrap_or_default()
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}
