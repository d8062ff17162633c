//! Engine wiring and background tasks

use super::alerts::AlertScanner;
use super::escalation::EscalationHandler;
use super::registry::AdapterHealthRegistry;
use super::scheduler::PollScheduler;
use super::scoring::ScoringEngine;
use super::snapshots::SnapshotStore;
use crate::config::MonitoringConfig;
use crate::core::checks::CheckDispatcher;
use crate::core::traits::{AdapterStore, HealthRecordSink, MetricsRegistry, PoolManager, SlaReports};
use crate::core::types::{AdapterHealthStatus, HealthAlert, HealthCheckResult, HealthScore, HealthSnapshot};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// External collaborators the engine is wired over
#[derive(Clone)]
pub struct Collaborators {
    /// Adapter configuration store
    pub store: Arc<dyn AdapterStore>,
    /// Durable sink for escalated outcomes
    pub sink: Arc<dyn HealthRecordSink>,
    /// External metrics registry
    pub metrics: Arc<dyn MetricsRegistry>,
    /// SLA compliance reporting
    pub sla: Arc<dyn SlaReports>,
    /// Shared connection-pool manager
    pub pools: Arc<dyn PoolManager>,
}

/// The assembled health-monitoring engine
///
/// Owns the registry, scheduler, scoring engine, snapshot store, and
/// alert scanner, and drives the periodic ticks once started.
#[derive(Clone)]
pub struct MonitoringSystem {
    config: Arc<MonitoringConfig>,
    registry: Arc<AdapterHealthRegistry>,
    scheduler: Arc<PollScheduler>,
    scoring: Arc<ScoringEngine>,
    snapshots: Arc<SnapshotStore>,
    alerts: Arc<AlertScanner>,
    active: Arc<AtomicBool>,
    start_time: Instant,
}

impl MonitoringSystem {
    /// Assemble the engine over its collaborators
    pub fn new(config: MonitoringConfig, collaborators: Collaborators) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(AdapterHealthRegistry::new());
        let dispatcher = Arc::new(CheckDispatcher::with_defaults(collaborators.pools.clone()));
        let escalation = Arc::new(EscalationHandler::new(
            collaborators.sink.clone(),
            config.escalation_policy,
            config.failure_threshold,
        ));
        let scheduler = Arc::new(PollScheduler::new(
            config.clone(),
            collaborators.store.clone(),
            dispatcher,
            registry.clone(),
            escalation,
            collaborators.metrics.clone(),
            collaborators.pools.clone(),
        ));
        let scoring = Arc::new(ScoringEngine::new(
            registry.clone(),
            collaborators.metrics.clone(),
            collaborators.sla.clone(),
            collaborators.pools.clone(),
        ));
        let snapshots = Arc::new(SnapshotStore::new(config.history_retention()));
        let alerts = Arc::new(AlertScanner::new(
            registry.clone(),
            scoring.clone(),
            collaborators.metrics.clone(),
        ));

        Self {
            config,
            registry,
            scheduler,
            scoring,
            snapshots,
            alerts,
            active: Arc::new(AtomicBool::new(false)),
            start_time: Instant::now(),
        }
    }

    /// Start the periodic check, aggregate-metrics, and snapshot tasks
    pub fn start(&self) {
        if self.active.swap(true, Ordering::AcqRel) {
            return;
        }
        info!(
            check_interval_ms = self.config.check_interval_ms,
            worker_pool_size = self.config.worker_pool_size,
            "starting health monitoring"
        );

        let system = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(system.config.check_interval());
            loop {
                interval.tick().await;
                if !system.is_active() {
                    break;
                }
                system.scheduler.run_tick().await;
            }
        });

        let system = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(system.config.metrics_interval());
            loop {
                interval.tick().await;
                if !system.is_active() {
                    break;
                }
                system.scheduler.run_aggregate_tick().await;
            }
        });

        let system = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(system.config.snapshot_interval());
            loop {
                interval.tick().await;
                if !system.is_active() {
                    break;
                }
                system.capture_snapshots().await;
            }
        });
    }

    /// Stop the periodic tasks
    pub fn stop(&self) {
        info!("stopping health monitoring");
        self.active.store(false, Ordering::Release);
    }

    /// Whether the periodic tasks are running
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Time since the engine was assembled
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Current status of every monitored adapter
    pub fn statuses(&self) -> Vec<AdapterHealthStatus> {
        self.registry.all()
    }

    /// Current status of one adapter
    pub fn status(&self, adapter_id: &str) -> Option<AdapterHealthStatus> {
        self.registry.get(adapter_id)
    }

    /// Freshly computed score breakdown for one adapter
    pub async fn score(&self, adapter_id: &str) -> Option<HealthScore> {
        self.scoring.score(adapter_id).await
    }

    /// Retained score history for one adapter
    pub fn history(&self, adapter_id: &str) -> Vec<HealthSnapshot> {
        self.snapshots.history(adapter_id)
    }

    /// Current alert list, severity-sorted
    pub async fn alerts(&self) -> Vec<HealthAlert> {
        self.alerts.scan().await
    }

    /// Run one adapter's check immediately and return the raw result
    pub async fn force_check(&self, adapter_id: &str) -> Result<HealthCheckResult> {
        self.scheduler.force_check(adapter_id).await
    }

    /// Capture one snapshot per adapter right now
    pub async fn capture_snapshots(&self) {
        self.snapshots.capture_all(&self.registry, &self.scoring).await;
    }

    /// Run one scheduled tick right now
    pub async fn run_tick(&self) {
        self.scheduler.run_tick().await;
    }
}
