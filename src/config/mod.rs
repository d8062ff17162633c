//! Platform configuration
//!
//! Loaded from a YAML file with serde-supplied defaults, then overridden
//! by `BRIDGEHUB_*` environment variables.

use crate::core::types::MonitoredAdapter;
use crate::monitoring::escalation::EscalationPolicy;
use crate::utils::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file consulted when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/bridgehub.yaml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Health-monitoring engine configuration
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Adapters seeded into the in-memory adapter store at startup
    #[serde(default)]
    pub adapters: Vec<MonitoredAdapter>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    /// Load from the given path, the default path, or built-in defaults,
    /// then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Override recognized options from `BRIDGEHUB_*` environment variables
    pub fn apply_env(&mut self) {
        if let Some(v) = env_parse::<u64>("BRIDGEHUB_CHECK_INTERVAL_MS") {
            self.monitoring.check_interval_ms = v;
        }
        if let Some(v) = env_parse::<u64>("BRIDGEHUB_CHECK_TIMEOUT_MS") {
            self.monitoring.check_timeout_ms = v;
        }
        if let Some(v) = env_parse::<u32>("BRIDGEHUB_FAILURE_THRESHOLD") {
            self.monitoring.failure_threshold = v;
        }
        if let Some(v) = env_parse::<usize>("BRIDGEHUB_WORKER_POOL_SIZE") {
            self.monitoring.worker_pool_size = v;
        }
        if let Ok(v) = std::env::var("BRIDGEHUB_SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env_parse::<u16>("BRIDGEHUB_SERVER_PORT") {
            self.server.port = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Health-monitoring engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Interval between scheduled check ticks, in milliseconds
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    /// Per-check timeout, in milliseconds
    #[serde(default = "default_check_timeout_ms")]
    pub check_timeout_ms: u64,
    /// Batch timeout; when unset, twice the per-check timeout
    #[serde(default)]
    pub batch_timeout_ms: Option<u64>,
    /// Consecutive failures before escalation
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Size of the bounded worker pool
    #[serde(default = "default_worker_pool_size")]
    pub worker_pool_size: usize,
    /// Interval between aggregate metrics recomputations, in milliseconds
    #[serde(default = "default_metrics_interval_ms")]
    pub metrics_interval_ms: u64,
    /// Interval between history snapshot captures, in milliseconds
    #[serde(default = "default_snapshot_interval_ms")]
    pub snapshot_interval_ms: u64,
    /// Hours of snapshot history retained per adapter
    #[serde(default = "default_history_retention_hours")]
    pub history_retention_hours: u64,
    /// Escalation re-fire policy
    #[serde(default)]
    pub escalation_policy: EscalationPolicy,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: default_check_interval_ms(),
            check_timeout_ms: default_check_timeout_ms(),
            batch_timeout_ms: None,
            failure_threshold: default_failure_threshold(),
            worker_pool_size: default_worker_pool_size(),
            metrics_interval_ms: default_metrics_interval_ms(),
            snapshot_interval_ms: default_snapshot_interval_ms(),
            history_retention_hours: default_history_retention_hours(),
            escalation_policy: EscalationPolicy::default(),
        }
    }
}

impl MonitoringConfig {
    /// Interval between scheduled check ticks
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Per-check timeout
    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }

    /// Batch timeout, defaulting to twice the per-check timeout
    pub fn batch_timeout(&self) -> Duration {
        match self.batch_timeout_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_millis(self.check_timeout_ms * 2),
        }
    }

    /// Interval between aggregate metrics recomputations
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    /// Interval between history snapshot captures
    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_millis(self.snapshot_interval_ms)
    }

    /// Snapshot retention window
    pub fn history_retention(&self) -> Duration {
        Duration::from_secs(self.history_retention_hours * 3600)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_check_interval_ms() -> u64 {
    30_000
}

fn default_check_timeout_ms() -> u64 {
    5_000
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_worker_pool_size() -> usize {
    10
}

fn default_metrics_interval_ms() -> u64 {
    60_000
}

fn default_snapshot_interval_ms() -> u64 {
    300_000
}

fn default_history_retention_hours() -> u64 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitoringConfig::default();
        assert_eq!(config.check_interval(), Duration::from_secs(30));
        assert_eq!(config.check_timeout(), Duration::from_secs(5));
        assert_eq!(config.batch_timeout(), Duration::from_secs(10));
        assert_eq!(config.failure_threshold, 3);
        assert_eq!(config.worker_pool_size, 10);
        assert_eq!(config.history_retention(), Duration::from_secs(24 * 3600));
        assert_eq!(
            config.escalation_policy,
            EscalationPolicy::WhileAboveThreshold
        );
    }

    #[test]
    fn test_explicit_batch_timeout_wins() {
        let config = MonitoringConfig {
            batch_timeout_ms: Some(1_500),
            ..Default::default()
        };
        assert_eq!(config.batch_timeout(), Duration::from_millis(1_500));
    }

    #[test]
    fn test_yaml_round_trip_with_adapters() {
        let yaml = r#"
server:
  port: 9090
monitoring:
  check_interval_ms: 10000
  failure_threshold: 5
  escalation_policy: on_cross
adapters:
  - id: orders-api
    name: Orders API
    protocol: http
    config:
      endpoint: "https://orders.internal"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.monitoring.check_interval_ms, 10_000);
        assert_eq!(config.monitoring.failure_threshold, 5);
        assert_eq!(config.monitoring.escalation_policy, EscalationPolicy::OnCross);
        assert_eq!(config.adapters.len(), 1);
        assert_eq!(config.adapters[0].id, "orders-api");
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("BRIDGEHUB_CHECK_INTERVAL_MS", "12000");
        std::env::set_var("BRIDGEHUB_FAILURE_THRESHOLD", "7");

        let mut config = Config::default();
        config.apply_env();
        assert_eq!(config.monitoring.check_interval_ms, 12_000);
        assert_eq!(config.monitoring.failure_threshold, 7);

        std::env::remove_var("BRIDGEHUB_CHECK_INTERVAL_MS");
        std::env::remove_var("BRIDGEHUB_FAILURE_THRESHOLD");
    }
}
