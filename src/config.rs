use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::parser::ValidationPolicy;

/// Config file read when neither --config nor FRIDGETOP_CONFIG is given (optional).
pub const DEFAULT_CONFIG_FILE: &str = "fridgetop.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub history: HistoryConfig,
    pub validation: ValidationConfig,
    pub watch: WatchConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: String,
    /// Buffered entries that trigger a save in the history writer.
    pub flush_rate: u64,
    /// Periodic save (and retry after a failed save), in seconds.
    pub flush_interval_secs: u64,
    /// Entries queued between updates and the history writer before updates start deferring.
    pub writer_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: "data/fridgetop.db".into(),
            flush_rate: 1,
            flush_interval_secs: 5,
            writer_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Also reject lines whose warmup interval is out of order.
    pub strict: bool,
}

impl ValidationConfig {
    pub fn policy(&self) -> ValidationPolicy {
        if self.strict {
            ValidationPolicy::Strict
        } else {
            ValidationPolicy::Lenient
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period used to coalesce bursts of file-change events.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Max number of update notifications kept for /ws/updates (slow clients may lag).
    pub broadcast_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8090,
            broadcast_capacity: 16,
        }
    }
}

impl AppConfig {
    /// Explicit path (must exist), else FRIDGETOP_CONFIG, else `fridgetop.toml` if present,
    /// else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var("FRIDGETOP_CONFIG") {
                Ok(p) => Some(PathBuf::from(p)),
                Err(_) => {
                    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                    default.exists().then_some(default)
                }
            },
        };
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.history.path.is_empty(),
            "history.path must be non-empty"
        );
        anyhow::ensure!(
            self.history.flush_rate > 0,
            "history.flush_rate must be > 0, got {}",
            self.history.flush_rate
        );
        anyhow::ensure!(
            self.history.flush_interval_secs > 0,
            "history.flush_interval_secs must be > 0, got {}",
            self.history.flush_interval_secs
        );
        anyhow::ensure!(
            self.history.writer_capacity > 0,
            "history.writer_capacity must be > 0, got {}",
            self.history.writer_capacity
        );
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.server.broadcast_capacity > 0,
            "server.broadcast_capacity must be > 0, got {}",
            self.server.broadcast_capacity
        );
        Ok(())
    }
}
