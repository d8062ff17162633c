//! SOAP service check
//!
//! Fetches the WSDL when one is configured, otherwise posts an empty
//! envelope. An HTTP 500 counts as healthy: a SOAP fault still proves a
//! reachable, responding service.

use super::{elapsed_ms, ProtocolCheck};
use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use async_trait::async_trait;
use std::time::{Duration, Instant};

const EMPTY_ENVELOPE: &str = r#"<?xml version="1.0" encoding="utf-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Header/><soapenv:Body/></soapenv:Envelope>"#;

/// SOAP endpoint check
pub struct SoapCheck;

#[async_trait]
impl ProtocolCheck for SoapCheck {
    fn protocol(&self) -> ProtocolType {
        ProtocolType::Soap
    }

    async fn check(&self, adapter: &MonitoredAdapter, timeout: Duration) -> HealthCheckResult {
        let start = Instant::now();

        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(c) => c,
            Err(e) => {
                return HealthCheckResult::unhealthy(
                    format!("failed to create HTTP client: {}", e),
                    elapsed_ms(start),
                );
            }
        };

        if let Some(wsdl_url) = adapter.config_str("wsdlUrl") {
            return match client.get(wsdl_url).send().await {
                Ok(response) => {
                    let elapsed = elapsed_ms(start);
                    if response.status().is_success() {
                        HealthCheckResult::healthy(elapsed)
                    } else {
                        HealthCheckResult::unhealthy(
                            format!("WSDL fetch returned HTTP {}", response.status()),
                            elapsed,
                        )
                    }
                }
                Err(e) => {
                    HealthCheckResult::unhealthy(format!("WSDL fetch failed: {}", e), elapsed_ms(start))
                }
            };
        }

        let endpoint = match adapter.config_str("endpoint") {
            Some(e) => e,
            None => {
                return HealthCheckResult::unhealthy(
                    "soap adapter has neither 'wsdlUrl' nor 'endpoint' configured",
                    elapsed_ms(start),
                );
            }
        };

        match client
            .post(endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(EMPTY_ENVELOPE)
            .send()
            .await
        {
            Ok(response) => {
                let elapsed = elapsed_ms(start);
                let code = response.status().as_u16();
                // 500 carries a SOAP fault, which is still a live service
                if response.status().is_success() || code == 500 {
                    HealthCheckResult::healthy(elapsed)
                } else {
                    HealthCheckResult::unhealthy(format!("HTTP {}", response.status()), elapsed)
                }
            }
            Err(e) => {
                HealthCheckResult::unhealthy(format!("soap request failed: {}", e), elapsed_ms(start))
            }
        }
    }
}
