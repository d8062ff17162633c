//! Message-broker reachability check
//!
//! Configuration completeness is checked first; an incomplete adapter is
//! reported unhealthy without any connection attempt. When a destination
//! is configured, a bounded TCP connect to the broker proves it is
//! accepting consumers.

use super::{elapsed_ms, ProtocolCheck};
use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;

const DEFAULT_BROKER_PORT: u64 = 5672;

/// Message-queue adapter check
pub struct QueueCheck;

#[async_trait]
impl ProtocolCheck for QueueCheck {
    fn protocol(&self) -> ProtocolType {
        ProtocolType::MessageQueue
    }

    async fn check(&self, adapter: &MonitoredAdapter, timeout: Duration) -> HealthCheckResult {
        let start = Instant::now();

        let host = match adapter.config_str("host") {
            Some(h) => h,
            None => {
                return HealthCheckResult::unhealthy(
                    "message queue adapter has no 'host' configured",
                    elapsed_ms(start),
                );
            }
        };
        if adapter.config_str("queueManager").is_none() {
            return HealthCheckResult::unhealthy(
                "message queue adapter has no 'queueManager' configured",
                elapsed_ms(start),
            );
        }

        // Without a destination there is nothing to consume from; the
        // configuration itself is the check.
        let Some(_destination) = adapter.config_str("destination") else {
            return HealthCheckResult::healthy(elapsed_ms(start));
        };

        let port = adapter.config_u64("port").unwrap_or(DEFAULT_BROKER_PORT);
        let addr = format!("{}:{}", host, port);

        match tokio::time::timeout(timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => {
                drop(stream);
                HealthCheckResult::healthy(elapsed_ms(start))
            }
            Ok(Err(e)) => HealthCheckResult::unhealthy(
                format!("broker unreachable at {}: {}", addr, e),
                elapsed_ms(start),
            ),
            Err(_) => HealthCheckResult::unhealthy(
                format!("broker connect to {} timed out after {}ms", addr, timeout.as_millis()),
                elapsed_ms(start),
            ),
        }
    }
}
