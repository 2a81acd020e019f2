//! Tombola server binary.
//!
//! Launches the lottery service: embedded store, join/draw engine, and the
//! JSON HTTP surface.
//!
//! # Usage
//!
//! ```bash
//! # Start with persistent storage
//! tombola --listen 0.0.0.0:3000 --data /var/lib/tombola
//!
//! # Start with environment variables
//! TOMBOLA__LISTEN_ADDR=0.0.0.0:3000 \
//! TOMBOLA__DATA_DIR=/var/lib/tombola \
//! tombola
//!
//! # CLI arguments override environment variables
//! TOMBOLA__LISTEN_ADDR=0.0.0.0:9999 tombola --listen 127.0.0.1:3000
//! ```

use std::io::IsTerminal;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tombola_server::catalog::{ProductCatalog, StaticCatalog};
use tombola_server::config::{Cli, Config, LogFormat};
use tombola_server::{app, seed, shutdown, AppState};
use tombola_store::Store;
use tombola_types::TombolaError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Top-level error type for the server binary.
#[derive(Debug)]
enum ServerError {
    Config(TombolaError),
    Startup(TombolaError),
    Serve(std::io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "configuration error: {e}"),
            ServerError::Startup(e) => write!(f, "startup error: {e}"),
            ServerError::Serve(e) => write!(f, "server error: {e}"),
        }
    }
}

impl std::error::Error for ServerError {}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let cli = Cli::parse();
    let config = Config::load(&cli).map_err(ServerError::Config)?;

    init_logging(&config);

    let data_dir = config.resolve_data_dir().map_err(ServerError::Startup)?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %data_dir.display(),
        "Starting Tombola"
    );

    if config.is_ephemeral() {
        tracing::warn!(
            data_dir = %data_dir.display(),
            "Running in ephemeral mode. All data will be lost on shutdown. \
             Set --data or TOMBOLA__DATA_DIR for persistent storage."
        );
    }

    if let Some(metrics_addr) = config.metrics_addr {
        init_metrics_exporter(metrics_addr)?;
    }

    let store =
        Arc::new(Store::open(data_dir.join("tombola.redb")).map_err(ServerError::Startup)?);

    if config.seed {
        store.seed_users(&seed::demo_users()).map_err(ServerError::Startup)?;
    }

    let catalog: Arc<dyn ProductCatalog> = match &config.catalog_file {
        Some(path) => Arc::new(StaticCatalog::from_file(path).map_err(ServerError::Startup)?),
        None => {
            tracing::warn!("No product catalog configured; /products serves an empty list");
            Arc::new(StaticCatalog::new())
        },
    };

    let state = AppState::new(store, catalog);
    let router = app(state);

    let listener =
        tokio::net::TcpListener::bind(config.listen_addr).await.map_err(ServerError::Serve)?;
    tracing::info!("Server ready, accepting connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the logging system based on configuration.
///
/// Supports three formats:
/// - `Text`: Human-readable format (development)
/// - `Json`: JSON structured logging (production)
/// - `Auto`: JSON for non-TTY stdout, text otherwise
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = match config.log_format {
        LogFormat::Json => true,
        LogFormat::Text => false,
        LogFormat::Auto => !std::io::stdout().is_terminal(),
    };

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().flatten_event(true).with_current_span(false))
            .init();
    } else {
        tracing_subscriber::registry().with(env_filter).with(fmt::layer()).init();
    }
}

/// Initializes the Prometheus metrics exporter.
///
/// Starts an HTTP server that exposes metrics at `/metrics`.
fn init_metrics_exporter(addr: SocketAddr) -> Result<(), ServerError> {
    PrometheusBuilder::new().with_http_listener(addr).install().map_err(|e| {
        ServerError::Startup(TombolaError::Config {
            message: format!("failed to install Prometheus exporter: {e}"),
        })
    })?;

    tracing::info!(metrics_addr = %addr, "Prometheus metrics exporter started");
    Ok(())
}
