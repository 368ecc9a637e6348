//! End-to-end tests against a running server.

use std::net::SocketAddr;
use std::time::Duration;

use http_guards::config::HeaderRuleConfig;
use http_guards::GuardConfig;
use serde_json::{json, Value};

mod common;

const VALID_UUID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn api_config() -> GuardConfig {
    let mut config = GuardConfig::default();
    config.cors.allowed_origins = vec!["https://app.example.com".into()];
    config
        .headers
        .insert("X-Request-Id".into(), common::rule("uuid", true));
    config
        .headers
        .insert("X-Account".into(), common::rule("int", true));
    config.headers.insert(
        "X-Name".into(),
        HeaderRuleConfig {
            kind: "string".into(),
            min_length: Some(3),
            max_length: Some(5),
            ..Default::default()
        },
    );
    config
}

#[tokio::test]
async fn test_rejects_with_every_failure() {
    let addr: SocketAddr = "127.0.0.1:28481".parse().unwrap();
    let server = common::start_server(addr, api_config()).await;

    let res = common::client()
        .get(server.url("/orders"))
        .header("X-Account", "12x")
        .header("X-Name", "ab")
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "error": {
                "code": 400,
                "message": "header validation failed",
                "details": [
                    { "header": "X-Account", "reason": "invalid" },
                    { "header": "X-Name", "reason": "invalid" },
                    { "header": "X-Request-Id", "reason": "missing" }
                ]
            }
        })
    );
}

#[tokio::test]
async fn test_forwards_valid_request() {
    let addr: SocketAddr = "127.0.0.1:28482".parse().unwrap();
    let server = common::start_server(addr, api_config()).await;

    let res = common::client()
        .post(server.url("/orders/42"))
        .header("X-Request-Id", VALID_UUID)
        .header("X-Account", "-7")
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["method"], "POST");
    assert_eq!(body["path"], "/orders/42");
}

#[tokio::test]
async fn test_preflight_bypasses_header_validation() {
    let addr: SocketAddr = "127.0.0.1:28483".parse().unwrap();
    let server = common::start_server(addr, api_config()).await;

    let res = common::client()
        .request(reqwest::Method::OPTIONS, server.url("/orders"))
        .header("Origin", "https://app.example.com")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );
}

#[tokio::test]
async fn test_rejection_carries_cors_headers() {
    let addr: SocketAddr = "127.0.0.1:28484".parse().unwrap();
    let server = common::start_server(addr, api_config()).await;

    let res = common::client()
        .get(server.url("/"))
        .header("Origin", "https://app.example.com")
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 400);
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );
}

#[tokio::test]
async fn test_health_is_not_validated() {
    let addr: SocketAddr = "127.0.0.1:28485".parse().unwrap();
    let server = common::start_server(addr, api_config()).await;

    let res = common::client()
        .get(server.url("/health"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_schema_reload_applies_to_new_requests() {
    let addr: SocketAddr = "127.0.0.1:28486".parse().unwrap();
    let server = common::start_server(addr, api_config()).await;
    let client = common::client();

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 400);

    // Same config, no header rules.
    let mut relaxed = api_config();
    relaxed.headers.clear();
    server.config_tx.send(relaxed).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), 200);
}
