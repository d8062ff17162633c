//! Collaborator seams
//!
//! The engine reaches every external subsystem through these traits:
//! the adapter store, the durable health-record sink, the metrics
//! registry, SLA compliance reporting, and the connection-pool manager.
//! In-memory implementations live in `crate::storage::memory`.

use crate::core::types::{MonitoredAdapter, ProtocolType};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Read access to the externally managed adapter configuration store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdapterStore: Send + Sync {
    /// All adapters currently flagged active
    async fn find_active_adapters(&self) -> Result<Vec<MonitoredAdapter>>;

    /// Latest snapshot of one adapter, if it still exists
    async fn find_by_id(&self, adapter_id: &str) -> Result<Option<MonitoredAdapter>>;
}

/// Durable sink for escalated health-check outcomes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthRecordSink: Send + Sync {
    /// Persist one health-check outcome
    async fn record_health_check(
        &self,
        adapter_id: &str,
        healthy: bool,
        response_time_ms: u64,
        error: Option<String>,
    ) -> Result<()>;

    /// Update the adapter's durable health flag
    async fn update_adapter_health_flag(&self, adapter_id: &str, healthy: bool) -> Result<()>;
}

/// External metrics registry
///
/// Protocol-tagged series are published by the wider platform; the
/// adapter-tagged gauges are written by the aggregate metrics tick.
pub trait MetricsRegistry: Send + Sync {
    /// Gauge reading tagged by protocol family
    fn gauge(&self, name: &str, protocol: ProtocolType) -> Option<f64>;

    /// Counter reading tagged by protocol family
    fn counter(&self, name: &str, protocol: ProtocolType) -> Option<u64>;

    /// Gauge reading tagged by adapter id
    fn adapter_gauge(&self, name: &str, adapter_id: &str) -> Option<f64>;

    /// Publish a gauge tagged by adapter id
    fn set_adapter_gauge(&self, name: &str, adapter_id: &str, value: f64);
}

/// One SLA compliance report aggregated by the external SLA subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaComplianceReport {
    /// Protocol family the report covers
    pub adapter_type: ProtocolType,
    /// Percentage of calls that succeeded, 0 to 100
    pub success_rate: f64,
    /// Percentage of calls inside the response-time target, 0 to 100
    pub response_time_compliance: f64,
}

/// Access to SLA compliance reporting
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlaReports: Send + Sync {
    /// All current compliance reports
    async fn all_compliance_reports(&self) -> Vec<SlaComplianceReport>;
}

/// Live statistics of one adapter's connection pool
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoolStatistics {
    /// Connections currently checked out
    pub total_active: u32,
    /// Total connections held by the pool
    pub total_pooled: u32,
}

impl PoolStatistics {
    /// Active connections as a fraction of the pool size
    pub fn utilization(&self) -> f64 {
        if self.total_pooled == 0 {
            0.0
        } else {
            self.total_active as f64 / self.total_pooled as f64
        }
    }
}

/// Access to the shared connection-pool manager
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoolManager: Send + Sync {
    /// Pool statistics for an adapter, or `None` when it has no pool
    async fn pool_statistics(&self, adapter_id: &str) -> Option<PoolStatistics>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_utilization() {
        let stats = PoolStatistics {
            total_active: 3,
            total_pooled: 4,
        };
        assert!((stats.utilization() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pool_utilization_empty_pool() {
        let stats = PoolStatistics {
            total_active: 0,
            total_pooled: 0,
        };
        assert_eq!(stats.utilization(), 0.0);
    }
}
