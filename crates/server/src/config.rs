//! Server configuration.
//!
//! Configuration merges three sources, later ones winning:
//!
//! 1. an optional TOML file (`--config`, or `tombola.toml` /
//!    `/etc/tombola/config.toml` if present)
//! 2. environment variables with the `TOMBOLA__` prefix
//!    (e.g. `TOMBOLA__LISTEN_ADDR=0.0.0.0:3000`)
//! 3. CLI flags

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use tombola_types::{Result, TombolaError};

/// Command-line interface.
#[derive(Debug, Parser)]
#[command(name = "tombola", about = "Lottery service", version)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to listen on (e.g. 0.0.0.0:3000).
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Data directory for the embedded database.
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Address to expose Prometheus metrics on. Disabled if unset.
    #[arg(long)]
    pub metrics: Option<SocketAddr>,

    /// Log output format.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Skip demo account seeding.
    #[arg(long)]
    pub no_seed: bool,

    /// Path to a JSON product catalog file.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (development).
    Text,
    /// JSON structured logging (production).
    Json,
    /// JSON for non-TTY stdout, text otherwise.
    Auto,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Data directory for the embedded database. If not set, an ephemeral
    /// temp directory is used and all data is lost on shutdown.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Address to expose Prometheus metrics. If not set, the metrics
    /// endpoint is disabled.
    #[serde(default)]
    pub metrics_addr: Option<SocketAddr>,
    /// Log output format.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
    /// Whether to seed the demo accounts at startup.
    #[serde(default = "default_seed")]
    pub seed: bool,
    /// Path to a JSON product catalog file.
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,
}

fn default_listen_addr() -> SocketAddr {
    "0.0.0.0:3000".parse().expect("static default listen address")
}

fn default_log_format() -> LogFormat {
    LogFormat::Auto
}

fn default_seed() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            data_dir: None,
            metrics_addr: None,
            log_format: default_log_format(),
            seed: default_seed(),
            catalog_file: None,
        }
    }
}

impl Config {
    /// Loads configuration, merging file, environment, and CLI flags.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Config`] if a source fails to load or parse.
    pub fn load(cli: &Cli) -> Result<Self> {
        let builder = config::Config::builder();

        let builder = if let Some(path) = &cli.config {
            builder.add_source(config::File::from(path.as_path()))
        } else {
            builder
                .add_source(config::File::with_name("tombola").required(false))
                .add_source(config::File::with_name("/etc/tombola/config").required(false))
        };

        // Environment variables with the TOMBOLA__ prefix. "__" separates
        // nesting; single underscores in field names are preserved.
        let builder = builder.add_source(
            config::Environment::with_prefix("TOMBOLA").separator("__").try_parsing(true),
        );

        let merged = builder
            .build()
            .map_err(|e| TombolaError::Config { message: format!("failed to load config: {e}") })?;

        let mut loaded: Self = merged.try_deserialize().map_err(|e| TombolaError::Config {
            message: format!("failed to parse config: {e}"),
        })?;

        // CLI flags override everything.
        if let Some(listen) = cli.listen {
            loaded.listen_addr = listen;
        }
        if let Some(data) = &cli.data {
            loaded.data_dir = Some(data.clone());
        }
        if let Some(metrics) = cli.metrics {
            loaded.metrics_addr = Some(metrics);
        }
        if let Some(format) = cli.log_format {
            loaded.log_format = format;
        }
        if cli.no_seed {
            loaded.seed = false;
        }
        if let Some(catalog) = &cli.catalog {
            loaded.catalog_file = Some(catalog.clone());
        }

        Ok(loaded)
    }

    /// Whether the server will run on an ephemeral data directory.
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.data_dir.is_none()
    }

    /// Resolves the data directory, creating an ephemeral temp directory
    /// if none is configured.
    ///
    /// # Errors
    ///
    /// Returns [`TombolaError::Io`] if the directory cannot be created.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => std::env::temp_dir().join(format!("tombola-{}", std::process::id())),
        };
        std::fs::create_dir_all(&dir).map_err(|source| TombolaError::Io {
            source,
            location: snafu::location!(),
        })?;
        Ok(dir)
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_test(data_dir: PathBuf) -> Self {
        Self {
            listen_addr: "127.0.0.1:0".parse().expect("static test listen address"),
            data_dir: Some(data_dir),
            metrics_addr: None,
            log_format: LogFormat::Text,
            seed: true,
            catalog_file: None,
        }
    }
}
