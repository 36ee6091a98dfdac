//! Server configuration from command-line flags and environment

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::event_store::EventStoreConfig;

/// Default listen port
pub const DEFAULT_PORT: u16 = 7777;

/// Default request body cap (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Diagnostic log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// JSON lines for machine consumption
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "debug-collector",
    about = "Collects structured debug logs over HTTP and answers queries about them",
    version
)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "DEBUG_COLLECTOR_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "DEBUG_COLLECTOR_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Record file, truncated on startup
    #[arg(long, env = "DEBUG_COLLECTOR_LOG_FILE", default_value = "debug_logs.jsonl")]
    pub log_file: PathBuf,

    /// Largest accepted request body in bytes
    #[arg(long, env = "DEBUG_COLLECTOR_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Do not echo ingested records to the console
    #[arg(long, env = "DEBUG_COLLECTOR_NO_MIRROR")]
    pub no_mirror: bool,

    /// Diagnostic log filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            log_file: PathBuf::from("debug_logs.jsonl"),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            no_mirror: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Address string handed to the listener
    pub fn bind_address(&self) -> String {
        match self.host.parse::<std::net::IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, self.port).to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }

    pub fn store_config(&self) -> EventStoreConfig {
        EventStoreConfig::new(&self.log_file)
    }
}
