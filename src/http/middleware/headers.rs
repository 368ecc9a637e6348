//! Header validation middleware.
//! Rejects requests whose headers break the current schema.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::response::ErrorResponse;
use crate::observability::metrics;
use crate::validation::HeaderGuard;

pub async fn header_validation_middleware(
    State(guard): State<Arc<HeaderGuard>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let result = guard.check(request.headers());

    if result.is_valid() {
        metrics::record_accepted();
        return next.run(request).await;
    }

    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        failures = result.len(),
        "Header validation failed"
    );
    for failure in result.failures() {
        tracing::debug!(header = %failure.header, reason = %failure.reason, "Rejected header");
    }
    metrics::record_rejected(result.failures());

    ErrorResponse::header_validation(result).into_response()
}
