//! Fallback check for adapters without a dedicated strategy

use super::{elapsed_ms, ProtocolCheck};
use crate::core::traits::PoolManager;
use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Reports healthy when the adapter holds active pooled connections and
/// falls back to a cheap default-healthy signal otherwise.
pub struct GenericCheck {
    pools: Arc<dyn PoolManager>,
}

impl GenericCheck {
    /// Create the fallback check over the shared pool manager
    pub fn new(pools: Arc<dyn PoolManager>) -> Self {
        Self { pools }
    }
}

#[async_trait]
impl ProtocolCheck for GenericCheck {
    fn protocol(&self) -> ProtocolType {
        ProtocolType::Generic
    }

    async fn check(&self, adapter: &MonitoredAdapter, _timeout: Duration) -> HealthCheckResult {
        let start = Instant::now();
        match self.pools.pool_statistics(&adapter.id).await {
            Some(stats) if stats.total_active > 0 => HealthCheckResult::healthy(elapsed_ms(start)),
            _ => HealthCheckResult::healthy(elapsed_ms(start)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{MockPoolManager, PoolStatistics};

    #[tokio::test]
    async fn test_healthy_with_active_connections() {
        let mut pools = MockPoolManager::new();
        pools.expect_pool_statistics().returning(|_| {
            Some(PoolStatistics {
                total_active: 2,
                total_pooled: 8,
            })
        });

        let adapter = MonitoredAdapter::new("legacy", "Legacy", ProtocolType::Generic);
        let result = GenericCheck::new(Arc::new(pools))
            .check(&adapter, Duration::from_secs(1))
            .await;
        assert!(result.healthy);
    }

    #[tokio::test]
    async fn test_default_healthy_without_pool() {
        let mut pools = MockPoolManager::new();
        pools.expect_pool_statistics().returning(|_| None);

        let adapter = MonitoredAdapter::new("legacy", "Legacy", ProtocolType::Generic);
        let result = GenericCheck::new(Arc::new(pools))
            .check(&adapter, Duration::from_secs(1))
            .await;
        assert!(result.healthy);
    }
}
