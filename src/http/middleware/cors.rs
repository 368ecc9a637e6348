//! Cross-origin policy.
//!
//! # Responsibilities
//! - Echo allowed origins in `Access-Control-Allow-Origin`
//! - Advertise allowed methods and request headers
//! - Answer preflight `OPTIONS` requests directly
//!
//! # Design Decisions
//! - `"*"` in the origin list echoes any origin rather than sending a literal `*`
//! - Empty method/header lists fall back to conservative defaults
//! - Entries that do not parse are skipped; config validation reports them first

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

pub const DEFAULT_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

pub const DEFAULT_HEADERS: [HeaderName; 2] = [header::CONTENT_TYPE, header::AUTHORIZATION];

const WILDCARD: &str = "*";

/// Build the CORS layer for `config`.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allow_origin(&config.allowed_origins))
        .allow_methods(allow_methods(&config.allowed_methods))
        .allow_headers(allow_headers(&config.allowed_headers))
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == WILDCARD) {
        return AllowOrigin::mirror_request();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Skipping unparseable CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(parsed)
}

fn allow_methods(methods: &[String]) -> AllowMethods {
    if methods.is_empty() {
        return AllowMethods::list(DEFAULT_METHODS);
    }

    let parsed: Vec<Method> = methods
        .iter()
        .filter_map(|m| m.to_ascii_uppercase().parse().ok())
        .collect();
    AllowMethods::list(parsed)
}

fn allow_headers(headers: &[String]) -> AllowHeaders {
    if headers.is_empty() {
        return AllowHeaders::list(DEFAULT_HEADERS);
    }
    if headers.iter().any(|h| h == WILDCARD) {
        return AllowHeaders::mirror_request();
    }

    let parsed: Vec<HeaderName> = headers.iter().filter_map(|h| h.parse().ok()).collect();
    AllowHeaders::list(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    fn app(config: CorsConfig) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&config))
    }

    fn config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_allowed_origin_is_echoed() {
        let res = app(config(&["https://app.example.com"]))
            .oneshot(
                Request::get("/")
                    .header("Origin", "https://app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn test_unknown_origin_gets_no_allow_header() {
        let res = app(config(&["https://app.example.com"]))
            .oneshot(
                Request::get("/")
                    .header("Origin", "https://evil.example.net")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_wildcard_mirrors_origin() {
        let res = app(config(&["*"]))
            .oneshot(
                Request::get("/")
                    .header("Origin", "https://anything.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://anything.example"
        );
    }

    #[tokio::test]
    async fn test_preflight_uses_defaults() {
        let res = app(config(&["https://app.example.com"]))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/")
                    .header("Origin", "https://app.example.com")
                    .header("Access-Control-Request-Method", "PUT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), 200);
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET,POST,PUT,DELETE,OPTIONS"
        );
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "content-type,authorization"
        );
    }
}
