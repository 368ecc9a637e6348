//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router (echo handler + health check)
//! - Wire up middleware (tracing, CORS, panic recovery, header validation)
//! - Apply schema reloads while serving
//! - Shut down gracefully on signal

use std::io;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{Method, Uri},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};

use crate::config::GuardConfig;
use crate::error::SchemaError;
use crate::http::middleware;
use crate::observability::metrics;
use crate::validation::HeaderGuard;

/// HTTP server fronted by the guard middleware.
pub struct GuardServer {
    router: Router,
    guard: Arc<HeaderGuard>,
}

impl GuardServer {
    /// Build the server, freezing the configured header schema.
    pub fn new(config: GuardConfig) -> Result<Self, SchemaError> {
        let guard = Arc::new(HeaderGuard::new(config.build_schema()?));
        let router = Self::build_router(&config, guard.clone());
        Ok(Self { router, guard })
    }

    fn build_router(config: &GuardConfig, guard: Arc<HeaderGuard>) -> Router {
        let guarded = Router::new()
            .route("/", any(echo_handler))
            .route("/{*path}", any(echo_handler));

        let app = Router::new()
            .route("/health", get(health_handler))
            .merge(middleware::validate_headers(guarded, guard));

        middleware::protect(
            app,
            &config.cors,
            Duration::from_secs(config.timeouts.request_secs),
        )
    }

    /// Run until `shutdown` fires, applying schemas from `config_updates`.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<GuardConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rules = self.guard.schema().len(),
            "HTTP server starting"
        );

        let reloader = tokio::spawn(apply_reloads(self.guard.clone(), config_updates));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Swap in the header schema of each new config.
async fn apply_reloads(
    guard: Arc<HeaderGuard>,
    mut updates: mpsc::UnboundedReceiver<GuardConfig>,
) {
    while let Some(config) = updates.recv().await {
        match config.build_schema() {
            Ok(schema) => {
                guard.replace(schema);
                metrics::record_schema_reload(true);
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Reloaded config has an invalid schema, keeping current"
                );
                metrics::record_schema_reload(false);
            }
        }
    }
}

/// Reached only by requests that passed header validation.
async fn echo_handler(method: Method, uri: Uri) -> impl IntoResponse {
    Json(json!({
        "status": "accepted",
        "method": method.as_str(),
        "path": uri.path(),
    }))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}
