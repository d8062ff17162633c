//! Weighted health scoring
//!
//! Reduces registry state, external metrics, pool statistics, and SLA
//! compliance into one 0 to 100 score per adapter. Scoring never raises;
//! every missing input falls back to a documented default.

use super::registry::AdapterHealthRegistry;
use super::QUEUE_DEPTH_GAUGE;
use super::{ERRORS_COUNTER, THROUGHPUT_COUNTER};
use crate::core::traits::{MetricsRegistry, PoolManager, SlaReports};
use crate::core::types::{AdapterHealthStatus, HealthScore, ProtocolType};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

/// Neutral resource score for adapters without queue or pool backing
const NEUTRAL_RESOURCE_SCORE: f64 = 80.0;

/// Computes and caches weighted health scores
pub struct ScoringEngine {
    registry: Arc<AdapterHealthRegistry>,
    metrics: Arc<dyn MetricsRegistry>,
    sla: Arc<dyn SlaReports>,
    pools: Arc<dyn PoolManager>,
    cache: DashMap<String, HealthScore>,
}

impl ScoringEngine {
    /// Wire the engine over its inputs
    pub fn new(
        registry: Arc<AdapterHealthRegistry>,
        metrics: Arc<dyn MetricsRegistry>,
        sla: Arc<dyn SlaReports>,
        pools: Arc<dyn PoolManager>,
    ) -> Self {
        Self {
            registry,
            metrics,
            sla,
            pools,
            cache: DashMap::new(),
        }
    }

    /// Compute the adapter's current score, refreshing the cache
    ///
    /// Returns `None` only when the adapter is not monitored at all.
    pub async fn score(&self, adapter_id: &str) -> Option<HealthScore> {
        let status = self.registry.get(adapter_id)?;

        let connection = Self::connection_score(&status);
        let performance = Self::performance_score(status.mean_response_time_ms());
        let error = self.error_score(&status);
        let resource = self.resource_score(&status).await;
        let sla = self.sla_score(status.protocol).await;

        let score = HealthScore::compose(adapter_id, connection, performance, error, resource, sla);
        self.cache.insert(adapter_id.to_string(), score.clone());
        Some(score)
    }

    /// Most recently computed score, without recomputation
    pub fn cached(&self, adapter_id: &str) -> Option<HealthScore> {
        self.cache.get(adapter_id).map(|score| score.clone())
    }

    /// Recency of contact with the endpoint
    fn connection_score(status: &AdapterHealthStatus) -> f64 {
        let now = Utc::now();
        if let Some(last_check) = status.last_check {
            let age = now - last_check;
            if age < chrono::Duration::minutes(5) {
                return 100.0;
            }
            if age < chrono::Duration::minutes(15) {
                return 80.0;
            }
        }
        if let Some(last_success) = status.last_success {
            let age = now - last_success;
            if age < chrono::Duration::minutes(30) {
                return 90.0;
            }
            if age < chrono::Duration::hours(2) {
                return 70.0;
            }
            if age < chrono::Duration::hours(24) {
                return 50.0;
            }
        }
        20.0
    }

    /// Band on mean response time in milliseconds
    fn performance_score(mean_response_time_ms: f64) -> f64 {
        match mean_response_time_ms {
            t if t <= 100.0 => 100.0,
            t if t <= 500.0 => 80.0,
            t if t <= 1000.0 => 60.0,
            t if t <= 5000.0 => 40.0,
            _ => 20.0,
        }
    }

    /// Band on error-rate percentage
    ///
    /// Prefers the platform's protocol-tagged traffic counters; falls
    /// back to the registry's own check counters when they are absent.
    fn error_score(&self, status: &AdapterHealthStatus) -> f64 {
        let rate = match (
            self.metrics.counter(THROUGHPUT_COUNTER, status.protocol),
            self.metrics.counter(ERRORS_COUNTER, status.protocol),
        ) {
            (Some(total), Some(errors)) if total > 0 => {
                (errors as f64 / total as f64) * 100.0
            }
            _ => status.error_rate_percent(),
        };

        match rate {
            r if r <= 0.1 => 100.0,
            r if r <= 1.0 => 80.0,
            r if r <= 5.0 => 60.0,
            r if r <= 10.0 => 40.0,
            _ => 20.0,
        }
    }

    /// Band on queue depth or pool utilization
    async fn resource_score(&self, status: &AdapterHealthStatus) -> f64 {
        if status.protocol == ProtocolType::MessageQueue {
            return match self.metrics.gauge(QUEUE_DEPTH_GAUGE, status.protocol) {
                Some(depth) if depth < 100.0 => 100.0,
                Some(depth) if depth < 1_000.0 => 80.0,
                Some(depth) if depth < 10_000.0 => 60.0,
                Some(_) => 40.0,
                None => NEUTRAL_RESOURCE_SCORE,
            };
        }

        match self.pools.pool_statistics(&status.adapter_id).await {
            Some(stats) if stats.total_pooled > 0 => {
                let utilization = stats.utilization();
                if utilization < 0.5 {
                    100.0
                } else if utilization < 0.7 {
                    80.0
                } else if utilization < 0.9 {
                    60.0
                } else {
                    40.0
                }
            }
            _ => NEUTRAL_RESOURCE_SCORE,
        }
    }

    /// Average compliance over matching SLA reports, 100 when none match
    async fn sla_score(&self, protocol: ProtocolType) -> f64 {
        let reports = self.sla.all_compliance_reports().await;
        let matching: Vec<_> = reports
            .iter()
            .filter(|r| r.adapter_type == protocol)
            .collect();
        if matching.is_empty() {
            return 100.0;
        }

        let sum: f64 = matching
            .iter()
            .map(|r| (r.success_rate + r.response_time_compliance) / 2.0)
            .sum();
        sum / matching.len() as f64
    }
}
