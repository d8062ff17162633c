//! Concurrent poll scheduler
//!
//! Each tick fans one check per active adapter onto a bounded worker
//! pool, then waits for the batch under an overall timeout. The batch
//! timeout only stops the waiting: in-flight checks are not cancelled,
//! they run to completion and apply their results through the registry's
//! recency gate.

use super::escalation::EscalationHandler;
use super::registry::AdapterHealthRegistry;
use super::POOL_UTILIZATION_GAUGE;
use crate::config::MonitoringConfig;
use crate::core::checks::CheckDispatcher;
use crate::core::traits::{AdapterStore, MetricsRegistry, PoolManager};
use crate::core::types::HealthCheckResult;
use crate::utils::error::{BridgeError, Result};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Drives the periodic fan-out of adapter health checks
#[derive(Clone)]
pub struct PollScheduler {
    config: Arc<MonitoringConfig>,
    store: Arc<dyn AdapterStore>,
    dispatcher: Arc<CheckDispatcher>,
    registry: Arc<AdapterHealthRegistry>,
    escalation: Arc<EscalationHandler>,
    metrics: Arc<dyn MetricsRegistry>,
    pools: Arc<dyn PoolManager>,
    limiter: Arc<Semaphore>,
}

impl PollScheduler {
    /// Wire the scheduler over its collaborators
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<MonitoringConfig>,
        store: Arc<dyn AdapterStore>,
        dispatcher: Arc<CheckDispatcher>,
        registry: Arc<AdapterHealthRegistry>,
        escalation: Arc<EscalationHandler>,
        metrics: Arc<dyn MetricsRegistry>,
        pools: Arc<dyn PoolManager>,
    ) -> Self {
        let limiter = Arc::new(Semaphore::new(config.worker_pool_size.max(1)));
        Self {
            config,
            store,
            dispatcher,
            registry,
            escalation,
            metrics,
            pools,
            limiter,
        }
    }

    /// Run one scheduled tick: fan out, then wait up to the batch timeout
    pub async fn run_tick(&self) {
        let adapters = match self.store.find_active_adapters().await {
            Ok(adapters) => adapters,
            Err(e) => {
                warn!("failed to load active adapters: {}", e);
                return;
            }
        };
        if adapters.is_empty() {
            return;
        }
        debug!(count = adapters.len(), "starting health check batch");

        let mut handles = Vec::with_capacity(adapters.len());
        for adapter in adapters {
            let scheduler = self.clone();
            let limiter = self.limiter.clone();
            handles.push(tokio::spawn(async move {
                let Ok(_permit) = limiter.acquire_owned().await else {
                    return;
                };
                scheduler.check_adapter(&adapter.id).await;
            }));
        }

        let batch_timeout = self.config.batch_timeout();
        if tokio::time::timeout(batch_timeout, join_all(handles))
            .await
            .is_err()
        {
            warn!(
                timeout_ms = batch_timeout.as_millis() as u64,
                "health check batch still outstanding at batch timeout; continuing"
            );
        }
    }

    /// Run one adapter's check end to end
    ///
    /// Reloads the adapter's latest configuration, dispatches the check,
    /// applies the result through the recency gate, and hands sustained
    /// failures to the escalation handler.
    async fn check_adapter(&self, adapter_id: &str) -> Option<HealthCheckResult> {
        let adapter = match self.store.find_by_id(adapter_id).await {
            Ok(Some(adapter)) => adapter,
            Ok(None) => {
                self.registry.mark_inactive(adapter_id);
                return None;
            }
            Err(e) => {
                warn!(adapter_id = %adapter_id, "failed to reload adapter: {}", e);
                return None;
            }
        };
        if !adapter.active {
            self.registry.mark_inactive(&adapter.id);
            return None;
        }

        self.registry.ensure(&adapter);
        let ticket = self.registry.begin_check(&adapter.id);
        let result = self
            .dispatcher
            .dispatch(&adapter, self.config.check_timeout())
            .await;

        if result.healthy {
            self.registry
                .apply_healthy(&adapter.id, ticket, result.response_time_ms);
        } else {
            let error = result.error.as_deref().unwrap_or("check failed");
            if let Some(consecutive) =
                self.registry.apply_unhealthy(&adapter.id, ticket, error)
            {
                self.escalation
                    .on_failure(&adapter.id, consecutive, &result)
                    .await;
            }
        }
        Some(result)
    }

    /// Run one adapter's check immediately, outside the scheduled tick
    pub async fn force_check(&self, adapter_id: &str) -> Result<HealthCheckResult> {
        match self.store.find_by_id(adapter_id).await? {
            Some(_) => {}
            None => {
                return Err(BridgeError::NotFound(format!("adapter {}", adapter_id)));
            }
        }
        match self.check_adapter(adapter_id).await {
            Some(result) => Ok(result),
            None => Ok(HealthCheckResult::unhealthy("adapter is inactive", 0)),
        }
    }

    /// Recompute light aggregate metrics for each active adapter
    pub async fn run_aggregate_tick(&self) {
        let adapters = match self.store.find_active_adapters().await {
            Ok(adapters) => adapters,
            Err(e) => {
                warn!("failed to load adapters for aggregate metrics: {}", e);
                return;
            }
        };

        for adapter in adapters {
            if let Some(stats) = self.pools.pool_statistics(&adapter.id).await {
                self.metrics.set_adapter_gauge(
                    POOL_UTILIZATION_GAUGE,
                    &adapter.id,
                    stats.utilization(),
                );
            }
        }
    }
}
