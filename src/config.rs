//! Configuration management for the queue service.
//!
//! Loads configuration from `config.toml` at startup. All knobs are
//! configurable to avoid hardcoded constants scattered through the code.

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listener: ListenerConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Acceptor/worker listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    #[serde(default = "default_ip")]
    pub ip: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_worker_thread_num")]
    pub worker_thread_num: usize,
}

/// Per-queue storage-engine settings (component A/B knobs).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Size of the per-queue item-metadata pool, in bytes (informational;
    /// the pool itself grows by slot count, not raw bytes).
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Size of a single payload block, in bytes.
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    /// Number of blocks a freshly created queue pre-allocates.
    #[serde(default = "default_initial_block_count")]
    pub initial_block_count: usize,

    /// Maximum number of retired blocks the free-block pool recycles
    /// before over-cap blocks are simply dropped.
    #[serde(default = "default_free_block_pool_cap")]
    pub free_block_pool_cap: usize,
}

/// Per-connection receive-buffer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_rbuf_init_size")]
    pub rbuf_init_size: usize,

    #[serde(default = "default_rbuf_max_size")]
    pub rbuf_max_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            ip: default_ip(),
            port: default_port(),
            worker_thread_num: default_worker_thread_num(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            block_size: default_block_size(),
            initial_block_count: default_initial_block_count(),
            free_block_pool_cap: default_free_block_pool_cap(),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            rbuf_init_size: default_rbuf_init_size(),
            rbuf_max_size: default_rbuf_max_size(),
        }
    }
}

fn default_ip() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7733
}

fn default_worker_thread_num() -> usize {
    8
}

fn default_pool_size() -> usize {
    1 << 20 // 1 MiB
}

fn default_block_size() -> usize {
    8 << 20 // 8 MiB
}

fn default_initial_block_count() -> usize {
    5
}

fn default_free_block_pool_cap() -> usize {
    8
}

fn default_rbuf_init_size() -> usize {
    4096
}

fn default_rbuf_max_size() -> usize {
    16 << 20 // 16 MiB
}

impl Config {
    /// Load configuration from a `config.toml` file.
    ///
    /// The path defaults to `config.toml` in the working directory, or
    /// can be overridden via the `CONFIG_PATH` environment variable.
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => {
                let config: Config = toml::from_str(&contents)
                    .map_err(|e| ConfigError::Parse(e.to_string()))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
