//! Layered configuration for the widget server.
//!
//! Priority: CLI flag > CLI env var > `WIDGET_*` environment > config file > defaults.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Backend address used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:9001";

/// Status panel refresh period used when nothing else is configured.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Host to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the chat backend (serves `/chat` and `/estado`)
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Seconds between status panel refreshes
    #[arg(long, env = "STATUS_POLL_INTERVAL_SECS")]
    pub poll_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub status: StatusConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatusConfig {
    pub poll_interval_secs: u64,
}

/// Page-level settings: title plus the labels of the one-click buttons.
#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub title: String,
    #[serde(default)]
    pub quick_actions: Vec<String>,
    #[serde(default)]
    pub recent_searches: Vec<String>,
}

impl BackendConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl StatusConfig {
    /// Poll period, never shorter than one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("backend.base_url", DEFAULT_BACKEND_URL)?
            .set_default("backend.request_timeout_secs", 30)?
            .set_default("status.poll_interval_secs", DEFAULT_POLL_INTERVAL_SECS)?
            .set_default("widget.title", "Next Stop")?
            .set_default(
                "widget.quick_actions",
                vec!["Show me accepted places", "List my notifications"],
            )?
            .set_default("widget.recent_searches", Vec::<String>::new())?;

        // 2. Config file: explicit path is required, ./config.yaml is optional
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path)),
            None => builder.add_source(File::with_name("config.yaml").required(false)),
        };

        // 3. Environment variables (prefixed with WIDGET_), e.g. WIDGET_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("WIDGET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("widget.quick_actions")
                .with_list_parse_key("widget.recent_searches"),
        );

        // 4. CLI overrides (clap already folded in the plain env vars)
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(secs) = cli.poll_interval_secs {
            builder = builder.set_override("status.poll_interval_secs", secs)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }

    /// Address the HTTP listener binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
