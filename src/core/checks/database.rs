//! Database connectivity check
//!
//! Opens a transient connection and runs a validation query against it.

use super::{elapsed_ms, ProtocolCheck};
use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database};
use std::time::{Duration, Instant};

const DEFAULT_VALIDATION_QUERY: &str = "SELECT 1";

/// Validates database reachability with a short-lived connection
pub struct DatabaseCheck;

#[async_trait]
impl ProtocolCheck for DatabaseCheck {
    fn protocol(&self) -> ProtocolType {
        ProtocolType::Database
    }

    async fn check(&self, adapter: &MonitoredAdapter, timeout: Duration) -> HealthCheckResult {
        let start = Instant::now();

        let url = match adapter.config_str("url") {
            Some(u) => u,
            None => {
                return HealthCheckResult::unhealthy(
                    "database adapter has no 'url' configured",
                    elapsed_ms(start),
                );
            }
        };
        let query = adapter
            .config_str("validationQuery")
            .unwrap_or(DEFAULT_VALIDATION_QUERY);

        let mut options = ConnectOptions::new(url.to_string());
        options
            .connect_timeout(timeout)
            .max_connections(1)
            .sqlx_logging(false);

        let connection = match Database::connect(options).await {
            Ok(c) => c,
            Err(e) => {
                return HealthCheckResult::unhealthy(
                    format!("database connection failed: {}", e),
                    elapsed_ms(start),
                );
            }
        };

        let outcome = connection.execute_unprepared(query).await;
        let _ = connection.close().await;

        match outcome {
            Ok(_) => HealthCheckResult::healthy(elapsed_ms(start)),
            Err(e) => HealthCheckResult::unhealthy(
                format!("validation query failed: {}", e),
                elapsed_ms(start),
            ),
        }
    }
}
