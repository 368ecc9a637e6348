//! http-guards service.
//!
//! `serve` runs an echo endpoint behind the guard middleware stack.
//! `check` validates a set of headers against a config file offline.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use http_guards::check::check_headers;
use http_guards::config::loader::{load_config, load_schema};
use http_guards::config::watcher::ConfigWatcher;
use http_guards::lifecycle::{signals, Shutdown};
use http_guards::observability::{logging, metrics};
use http_guards::{GuardConfig, GuardServer, ServeError};

#[derive(Parser)]
#[command(name = "http-guards")]
#[command(
    about = "Header validation, CORS and panic recovery middleware service",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the echo endpoint behind the middleware stack
    Serve {
        /// TOML config file; defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate headers against a config's schema and print the failures
    Check {
        #[arg(short, long)]
        config: PathBuf,

        /// Header as "Name: value"; repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { config, headers } => check(&config, &headers),
    }
}

async fn serve(path: Option<&Path>) -> Result<(), ServeError> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => GuardConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "http-guards starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        header_rules = config.headers.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| ServeError::Address(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr).map_err(ServeError::Metrics)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    // Kept alive for the whole run; dropping either side stops reloads.
    let (_watcher, _idle_tx, updates) = match path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), None, updates)
        }
        None => {
            let (tx, updates) = mpsc::unbounded_channel();
            (None, Some(tx), updates)
        }
    };

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = GuardServer::new(config).map_err(|e| ServeError::Config(e.into()))?;
    server.run(listener, updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn check(path: &Path, raw_headers: &[String]) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let (_, schema) = load_schema(path)?;
    let report = check_headers(&schema, raw_headers)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.exit_code())
}
