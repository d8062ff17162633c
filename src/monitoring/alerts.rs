//! On-demand alert derivation
//!
//! Scans current registry and scoring state and emits one alert per
//! triggered condition. Alerts are never stored; each query recomputes
//! them from live state.

use super::registry::AdapterHealthRegistry;
use super::scoring::ScoringEngine;
use super::POOL_UTILIZATION_GAUGE;
use crate::core::traits::MetricsRegistry;
use crate::core::types::{AlertSeverity, AlertType, HealthAlert};
use chrono::Utc;
use std::sync::Arc;

/// Error-rate percentage above which an alert is raised
const ERROR_RATE_ALERT_PERCENT: f64 = 10.0;
/// Mean response time above which an alert is raised, in milliseconds
const SLOW_RESPONSE_ALERT_MS: f64 = 5_000.0;
/// Resource utilization ratio above which an alert is raised
const RESOURCE_ALERT_RATIO: f64 = 0.8;
/// SLA score below which an alert is raised
const SLA_ALERT_SCORE: f64 = 80.0;

/// Derives the current alert list from live health state
pub struct AlertScanner {
    registry: Arc<AdapterHealthRegistry>,
    scoring: Arc<ScoringEngine>,
    metrics: Arc<dyn MetricsRegistry>,
}

impl AlertScanner {
    /// Wire the scanner over its inputs
    pub fn new(
        registry: Arc<AdapterHealthRegistry>,
        scoring: Arc<ScoringEngine>,
        metrics: Arc<dyn MetricsRegistry>,
    ) -> Self {
        Self {
            registry,
            scoring,
            metrics,
        }
    }

    /// Scan all adapters and return alerts sorted by severity, then time,
    /// both descending
    pub async fn scan(&self) -> Vec<HealthAlert> {
        let now = Utc::now();
        let mut alerts = Vec::new();

        for status in self.registry.all() {
            let id = &status.adapter_id;

            if !status.active {
                alerts.push(HealthAlert {
                    adapter_id: id.clone(),
                    alert_type: AlertType::AdapterInactive,
                    message: format!("adapter {} is inactive", status.adapter_name),
                    severity: AlertSeverity::Critical,
                    timestamp: now,
                });
            }

            let error_rate = status.error_rate_percent();
            if error_rate > ERROR_RATE_ALERT_PERCENT {
                alerts.push(HealthAlert {
                    adapter_id: id.clone(),
                    alert_type: AlertType::HighErrorRate,
                    message: format!(
                        "adapter {} error rate is {:.1}%",
                        status.adapter_name, error_rate
                    ),
                    severity: AlertSeverity::Critical,
                    timestamp: now,
                });
            }

            let mean_response = status.mean_response_time_ms();
            if mean_response > SLOW_RESPONSE_ALERT_MS {
                alerts.push(HealthAlert {
                    adapter_id: id.clone(),
                    alert_type: AlertType::SlowResponse,
                    message: format!(
                        "adapter {} mean response time is {:.0}ms",
                        status.adapter_name, mean_response
                    ),
                    severity: AlertSeverity::Warning,
                    timestamp: now,
                });
            }

            if let Some(utilization) = self.metrics.adapter_gauge(POOL_UTILIZATION_GAUGE, id) {
                if utilization > RESOURCE_ALERT_RATIO {
                    alerts.push(HealthAlert {
                        adapter_id: id.clone(),
                        alert_type: AlertType::ResourceExhaustion,
                        message: format!(
                            "adapter {} pool utilization is {:.0}%",
                            status.adapter_name,
                            utilization * 100.0
                        ),
                        severity: AlertSeverity::Warning,
                        timestamp: now,
                    });
                }
            }

            if let Some(score) = self.scoring.score(id).await {
                if score.sla < SLA_ALERT_SCORE {
                    alerts.push(HealthAlert {
                        adapter_id: id.clone(),
                        alert_type: AlertType::SlaViolation,
                        message: format!(
                            "adapter {} SLA compliance is {:.0}%",
                            status.adapter_name, score.sla
                        ),
                        severity: AlertSeverity::Warning,
                        timestamp: now,
                    });
                }
            }
        }

        alerts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then(b.timestamp.cmp(&a.timestamp))
        });
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{MockPoolManager, MockSlaReports, SlaComplianceReport};
    use crate::core::types::{MonitoredAdapter, ProtocolType};
    use crate::storage::memory::InMemoryMetricsRegistry;

    fn scanner_with(
        registry: Arc<AdapterHealthRegistry>,
        metrics: Arc<InMemoryMetricsRegistry>,
        sla_reports: Vec<SlaComplianceReport>,
    ) -> AlertScanner {
        let mut sla = MockSlaReports::new();
        sla.expect_all_compliance_reports()
            .returning(move || sla_reports.clone());
        let mut pools = MockPoolManager::new();
        pools.expect_pool_statistics().returning(|_| None);

        let scoring = Arc::new(ScoringEngine::new(
            registry.clone(),
            metrics.clone(),
            Arc::new(sla),
            Arc::new(pools),
        ));
        AlertScanner::new(registry, scoring, metrics)
    }

    #[tokio::test]
    async fn test_quiet_system_raises_no_alerts() {
        let registry = Arc::new(AdapterHealthRegistry::new());
        registry.ensure(&MonitoredAdapter::new("a", "A", ProtocolType::Http));
        registry.mark_healthy("a", 40);

        let scanner = scanner_with(
            registry,
            Arc::new(InMemoryMetricsRegistry::new()),
            vec![],
        );
        assert!(scanner.scan().await.is_empty());
    }

    #[tokio::test]
    async fn test_inactive_adapter_raises_critical() {
        let registry = Arc::new(AdapterHealthRegistry::new());
        registry.ensure(&MonitoredAdapter::new("a", "A", ProtocolType::Http));
        registry.mark_inactive("a");

        let scanner = scanner_with(
            registry,
            Arc::new(InMemoryMetricsRegistry::new()),
            vec![],
        );
        let alerts = scanner.scan().await;
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::AdapterInactive);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    }

    #[tokio::test]
    async fn test_error_rate_and_slow_response_conditions() {
        let registry = Arc::new(AdapterHealthRegistry::new());
        registry.ensure(&MonitoredAdapter::new("a", "A", ProtocolType::Http));
        // 2 successes at 9s mean, 3 failures: 60% error rate
        registry.mark_healthy("a", 9_000);
        registry.mark_healthy("a", 9_000);
        for _ in 0..3 {
            registry.mark_unhealthy("a", "down");
        }

        let scanner = scanner_with(
            registry,
            Arc::new(InMemoryMetricsRegistry::new()),
            vec![],
        );
        let alerts = scanner.scan().await;
        let types: Vec<_> = alerts.iter().map(|a| a.alert_type).collect();
        assert!(types.contains(&AlertType::HighErrorRate));
        assert!(types.contains(&AlertType::SlowResponse));
    }

    #[tokio::test]
    async fn test_resource_and_sla_conditions() {
        let registry = Arc::new(AdapterHealthRegistry::new());
        registry.ensure(&MonitoredAdapter::new("a", "A", ProtocolType::Http));
        registry.mark_healthy("a", 40);

        let metrics = Arc::new(InMemoryMetricsRegistry::new());
        metrics.set_adapter_gauge(POOL_UTILIZATION_GAUGE, "a", 0.95);

        let reports = vec![SlaComplianceReport {
            adapter_type: ProtocolType::Http,
            success_rate: 60.0,
            response_time_compliance: 60.0,
        }];
        let scanner = scanner_with(registry, metrics, reports);
        let alerts = scanner.scan().await;
        let types: Vec<_> = alerts.iter().map(|a| a.alert_type).collect();
        assert!(types.contains(&AlertType::ResourceExhaustion));
        assert!(types.contains(&AlertType::SlaViolation));
    }

    #[tokio::test]
    async fn test_alerts_sorted_by_severity_descending() {
        let registry = Arc::new(AdapterHealthRegistry::new());

        // One adapter only slow (warning), another inactive (critical)
        registry.ensure(&MonitoredAdapter::new("slow", "Slow", ProtocolType::Http));
        registry.mark_healthy("slow", 9_000);
        registry.ensure(&MonitoredAdapter::new("gone", "Gone", ProtocolType::Http));
        registry.mark_inactive("gone");

        let scanner = scanner_with(
            registry,
            Arc::new(InMemoryMetricsRegistry::new()),
            vec![],
        );
        let alerts = scanner.scan().await;
        assert!(alerts.len() >= 2);
        for pair in alerts.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
        }
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
    }
}
