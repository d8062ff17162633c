//! HTTP/REST endpoint check

use super::{elapsed_ms, ProtocolCheck};
use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Probes an HTTP endpoint and treats any 2xx response as healthy
pub struct HttpCheck;

#[async_trait]
impl ProtocolCheck for HttpCheck {
    fn protocol(&self) -> ProtocolType {
        ProtocolType::Http
    }

    async fn check(&self, adapter: &MonitoredAdapter, timeout: Duration) -> HealthCheckResult {
        let start = Instant::now();

        let endpoint = match adapter.config_str("endpoint") {
            Some(e) => e,
            None => {
                return HealthCheckResult::unhealthy(
                    "http adapter has no 'endpoint' configured",
                    elapsed_ms(start),
                );
            }
        };
        let url = format!("{}{}", endpoint, adapter.config_str("healthPath").unwrap_or(""));

        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(c) => c,
            Err(e) => {
                return HealthCheckResult::unhealthy(
                    format!("failed to create HTTP client: {}", e),
                    elapsed_ms(start),
                );
            }
        };

        let method = adapter
            .config_str("method")
            .map(str::to_ascii_uppercase)
            .unwrap_or_else(|| "GET".to_string());
        let mut request = if method == "HEAD" {
            client.head(&url)
        } else {
            client.get(&url)
        };

        if let Some(username) = adapter.config_str("username") {
            request = request.basic_auth(username, adapter.config_str("password"));
        }

        match request.send().await {
            Ok(response) => {
                let elapsed = elapsed_ms(start);
                let status = response.status();
                if status.is_success() {
                    HealthCheckResult::healthy(elapsed)
                } else {
                    HealthCheckResult::unhealthy(format!("HTTP {}", status), elapsed)
                }
            }
            Err(e) => {
                HealthCheckResult::unhealthy(format!("http request failed: {}", e), elapsed_ms(start))
            }
        }
    }
}
