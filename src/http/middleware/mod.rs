//! Middleware stack.
//!
//! # Layer Order (outermost first)
//! ```text
//! TraceLayer
//!     → cors.rs (preflight answered here; also decorates 400 and 500)
//!     → recovery.rs (panic → 500)
//!     → TimeoutLayer
//!     → headers.rs (schema check → 400), guarded routes only
//!     → handler
//! ```

pub mod cors;
pub mod headers;
pub mod recovery;

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::CorsConfig;
use crate::validation::HeaderGuard;

pub use cors::cors_layer;
pub use headers::header_validation_middleware;
pub use recovery::recovery_layer;

/// Run header validation in front of every route in `router`.
pub fn validate_headers(router: Router, guard: Arc<HeaderGuard>) -> Router {
    router.layer(middleware::from_fn_with_state(guard, header_validation_middleware))
}

/// Wrap `router` with tracing, CORS, panic recovery and the request timeout.
#[allow(deprecated)]
pub fn protect(router: Router, cors: &CorsConfig, request_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(recovery_layer())
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}
