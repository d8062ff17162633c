//! Filesystem drop-directory check

use super::{elapsed_ms, ProtocolCheck};
use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use async_trait::async_trait;
use std::path::Path;
use std::time::{Duration, Instant};

/// Verifies a drop directory exists and carries the configured permission
pub struct FilesystemCheck;

impl FilesystemCheck {
    async fn probe_read(path: &Path) -> Result<(), String> {
        tokio::fs::read_dir(path)
            .await
            .map(|_| ())
            .map_err(|e| format!("directory {} is not readable: {}", path.display(), e))
    }

    async fn probe_write(path: &Path) -> Result<(), String> {
        let probe = path.join(format!(".bridgehub-probe-{}", uuid::Uuid::new_v4()));
        tokio::fs::write(&probe, b"probe")
            .await
            .map_err(|e| format!("directory {} is not writable: {}", path.display(), e))?;
        let _ = tokio::fs::remove_file(&probe).await;
        Ok(())
    }
}

#[async_trait]
impl ProtocolCheck for FilesystemCheck {
    fn protocol(&self) -> ProtocolType {
        ProtocolType::Filesystem
    }

    async fn check(&self, adapter: &MonitoredAdapter, _timeout: Duration) -> HealthCheckResult {
        let start = Instant::now();

        let configured = match adapter.config_str("path") {
            Some(p) => p,
            None => {
                return HealthCheckResult::unhealthy(
                    "filesystem adapter has no 'path' configured",
                    elapsed_ms(start),
                );
            }
        };
        let path = Path::new(configured);

        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) => m,
            Err(_) => {
                return HealthCheckResult::unhealthy(
                    format!("directory {} does not exist", path.display()),
                    elapsed_ms(start),
                );
            }
        };
        if !metadata.is_dir() {
            return HealthCheckResult::unhealthy(
                format!("{} is not a directory", path.display()),
                elapsed_ms(start),
            );
        }

        let mode = adapter
            .config_str("accessMode")
            .map(str::to_ascii_uppercase)
            .unwrap_or_else(|| "READ".to_string());
        let probe = if mode == "WRITE" {
            Self::probe_write(path).await
        } else {
            Self::probe_read(path).await
        };

        match probe {
            Ok(()) => HealthCheckResult::healthy(elapsed_ms(start)),
            Err(reason) => HealthCheckResult::unhealthy(reason, elapsed_ms(start)),
        }
    }
}
