//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use http_guards::config::HeaderRuleConfig;
use http_guards::{GuardConfig, GuardServer, Shutdown};
use tokio::sync::mpsc;

/// A running server plus the handles needed to drive and stop it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    #[allow(dead_code)]
    pub config_tx: mpsc::UnboundedSender<GuardConfig>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server for `config` on `addr` and wait until it accepts requests.
pub async fn start_server(addr: SocketAddr, mut config: GuardConfig) -> TestServer {
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = GuardServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestServer {
        addr,
        shutdown,
        config_tx,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Shorthand for a `[headers.*]` entry.
pub fn rule(kind: &str, required: bool) -> HeaderRuleConfig {
    HeaderRuleConfig {
        kind: kind.to_string(),
        required,
        ..Default::default()
    }
}
