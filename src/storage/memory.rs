//! In-memory collaborator implementations

use crate::core::traits::{
    AdapterStore, HealthRecordSink, MetricsRegistry, PoolManager, PoolStatistics,
    SlaComplianceReport, SlaReports,
};
use crate::core::types::{MonitoredAdapter, ProtocolType};
use crate::utils::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

/// Adapter store backed by a concurrent map
#[derive(Default)]
pub struct InMemoryAdapterStore {
    adapters: DashMap<String, MonitoredAdapter>,
}

impl InMemoryAdapterStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an adapter
    pub fn upsert(&self, adapter: MonitoredAdapter) {
        self.adapters.insert(adapter.id.clone(), adapter);
    }

    /// Remove an adapter
    pub fn remove(&self, adapter_id: &str) {
        self.adapters.remove(adapter_id);
    }

    /// Flip an adapter's active flag
    pub fn set_active(&self, adapter_id: &str, active: bool) {
        if let Some(mut adapter) = self.adapters.get_mut(adapter_id) {
            adapter.active = active;
        }
    }
}

#[async_trait]
impl AdapterStore for InMemoryAdapterStore {
    async fn find_active_adapters(&self) -> Result<Vec<MonitoredAdapter>> {
        Ok(self
            .adapters
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.clone())
            .collect())
    }

    async fn find_by_id(&self, adapter_id: &str) -> Result<Option<MonitoredAdapter>> {
        Ok(self.adapters.get(adapter_id).map(|entry| entry.clone()))
    }
}

/// One durably recorded health-check outcome
#[derive(Debug, Clone)]
pub struct HealthCheckRecord {
    pub adapter_id: String,
    pub healthy: bool,
    pub response_time_ms: u64,
    pub error: Option<String>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Record sink keeping escalated outcomes in memory
#[derive(Default)]
pub struct InMemoryHealthRecordSink {
    records: RwLock<Vec<HealthCheckRecord>>,
    flags: DashMap<String, bool>,
}

impl InMemoryHealthRecordSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded outcomes, oldest first
    pub fn records(&self) -> Vec<HealthCheckRecord> {
        self.records.read().clone()
    }

    /// Durable health flag for an adapter
    pub fn health_flag(&self, adapter_id: &str) -> Option<bool> {
        self.flags.get(adapter_id).map(|flag| *flag)
    }
}

#[async_trait]
impl HealthRecordSink for InMemoryHealthRecordSink {
    async fn record_health_check(
        &self,
        adapter_id: &str,
        healthy: bool,
        response_time_ms: u64,
        error: Option<String>,
    ) -> Result<()> {
        self.records.write().push(HealthCheckRecord {
            adapter_id: adapter_id.to_string(),
            healthy,
            response_time_ms,
            error,
            recorded_at: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn update_adapter_health_flag(&self, adapter_id: &str, healthy: bool) -> Result<()> {
        self.flags.insert(adapter_id.to_string(), healthy);
        Ok(())
    }
}

/// Metrics registry keeping gauges and counters in concurrent maps
#[derive(Default)]
pub struct InMemoryMetricsRegistry {
    gauges: DashMap<(String, String), f64>,
    counters: DashMap<(String, String), u64>,
}

impl InMemoryMetricsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a protocol-tagged gauge
    pub fn set_gauge(&self, name: &str, protocol: ProtocolType, value: f64) {
        self.gauges
            .insert((name.to_string(), protocol.as_str().to_string()), value);
    }

    /// Publish a protocol-tagged counter
    pub fn set_counter(&self, name: &str, protocol: ProtocolType, value: u64) {
        self.counters
            .insert((name.to_string(), protocol.as_str().to_string()), value);
    }
}

impl MetricsRegistry for InMemoryMetricsRegistry {
    fn gauge(&self, name: &str, protocol: ProtocolType) -> Option<f64> {
        self.gauges
            .get(&(name.to_string(), protocol.as_str().to_string()))
            .map(|value| *value)
    }

    fn counter(&self, name: &str, protocol: ProtocolType) -> Option<u64> {
        self.counters
            .get(&(name.to_string(), protocol.as_str().to_string()))
            .map(|value| *value)
    }

    fn adapter_gauge(&self, name: &str, adapter_id: &str) -> Option<f64> {
        self.gauges
            .get(&(name.to_string(), adapter_id.to_string()))
            .map(|value| *value)
    }

    fn set_adapter_gauge(&self, name: &str, adapter_id: &str, value: f64) {
        self.gauges
            .insert((name.to_string(), adapter_id.to_string()), value);
    }
}

/// Fixed set of SLA compliance reports
#[derive(Default)]
pub struct StaticSlaReports {
    reports: RwLock<Vec<SlaComplianceReport>>,
}

impl StaticSlaReports {
    /// Create a provider with the given reports
    pub fn new(reports: Vec<SlaComplianceReport>) -> Self {
        Self {
            reports: RwLock::new(reports),
        }
    }

    /// Replace the report set
    pub fn set_reports(&self, reports: Vec<SlaComplianceReport>) {
        *self.reports.write() = reports;
    }
}

#[async_trait]
impl SlaReports for StaticSlaReports {
    async fn all_compliance_reports(&self) -> Vec<SlaComplianceReport> {
        self.reports.read().clone()
    }
}

/// Pool manager serving statistics from a concurrent map
#[derive(Default)]
pub struct InMemoryPoolManager {
    stats: DashMap<String, PoolStatistics>,
}

impl InMemoryPoolManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish pool statistics for an adapter
    pub fn set_statistics(&self, adapter_id: &str, stats: PoolStatistics) {
        self.stats.insert(adapter_id.to_string(), stats);
    }
}

#[async_trait]
impl PoolManager for InMemoryPoolManager {
    async fn pool_statistics(&self, adapter_id: &str) -> Option<PoolStatistics> {
        self.stats.get(adapter_id).map(|stats| *stats)
    }
}
