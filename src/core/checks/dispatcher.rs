//! Strategy lookup and failure containment
//!
//! The dispatcher is the single point that guarantees callers never see a
//! raised error: strategy panics, hangs, and unexpected failures all come
//! back as structured unhealthy results.

use super::database::DatabaseCheck;
use super::filesystem::FilesystemCheck;
use super::ftp::{FtpCheck, SftpCheck};
use super::generic::GenericCheck;
use super::http::HttpCheck;
use super::queue::QueueCheck;
use super::soap::SoapCheck;
use super::ProtocolCheck;
use crate::core::traits::PoolManager;
use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Extra wait granted past the strategy timeout so that a well-behaved
/// strategy can report its own timeout with accurate elapsed time.
const TIMEOUT_GRACE: Duration = Duration::from_millis(250);

/// Registered-strategy table keyed by protocol type
pub struct CheckDispatcher {
    strategies: HashMap<ProtocolType, Arc<dyn ProtocolCheck>>,
    fallback: Arc<dyn ProtocolCheck>,
}

impl CheckDispatcher {
    /// Create an empty dispatcher with the given fallback strategy
    pub fn new(fallback: Arc<dyn ProtocolCheck>) -> Self {
        Self {
            strategies: HashMap::new(),
            fallback,
        }
    }

    /// Dispatcher with the full built-in strategy set registered
    pub fn with_defaults(pools: Arc<dyn PoolManager>) -> Self {
        let fallback: Arc<dyn ProtocolCheck> = Arc::new(GenericCheck::new(pools));
        let mut dispatcher = Self::new(fallback.clone());
        dispatcher.register(Arc::new(HttpCheck));
        dispatcher.register(Arc::new(DatabaseCheck));
        dispatcher.register(Arc::new(FilesystemCheck));
        dispatcher.register(Arc::new(FtpCheck));
        dispatcher.register(Arc::new(SftpCheck));
        dispatcher.register(Arc::new(QueueCheck));
        dispatcher.register(Arc::new(SoapCheck));
        dispatcher.register(fallback);
        dispatcher
    }

    /// Register a strategy under its own protocol type
    pub fn register(&mut self, strategy: Arc<dyn ProtocolCheck>) {
        self.strategies.insert(strategy.protocol(), strategy);
    }

    /// Run the strategy for the adapter's protocol under the timeout
    ///
    /// Never returns an error: unknown protocols use the fallback, a
    /// panicking strategy yields an "aborted" result, and an overrunning
    /// one yields a "timed out" result.
    pub async fn dispatch(
        &self,
        adapter: &MonitoredAdapter,
        timeout: Duration,
    ) -> HealthCheckResult {
        let strategy = self
            .strategies
            .get(&adapter.protocol)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone());

        debug!(
            adapter_id = %adapter.id,
            protocol = %adapter.protocol,
            "dispatching health check"
        );

        let start = Instant::now();
        let owned = adapter.clone();
        let handle = tokio::spawn(async move { strategy.check(&owned, timeout).await });

        match tokio::time::timeout(timeout + TIMEOUT_GRACE, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => HealthCheckResult::unhealthy(
                format!("check aborted: {}", join_error),
                start.elapsed().as_millis() as u64,
            ),
            Err(_) => HealthCheckResult::unhealthy(
                format!("check timed out after {}ms", timeout.as_millis()),
                start.elapsed().as_millis() as u64,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedCheck {
        protocol: ProtocolType,
        healthy: bool,
    }

    #[async_trait]
    impl ProtocolCheck for FixedCheck {
        fn protocol(&self) -> ProtocolType {
            self.protocol
        }

        async fn check(&self, _adapter: &MonitoredAdapter, _timeout: Duration) -> HealthCheckResult {
            if self.healthy {
                HealthCheckResult::healthy(1)
            } else {
                HealthCheckResult::unhealthy("fixed failure", 1)
            }
        }
    }

    struct HangingCheck;

    #[async_trait]
    impl ProtocolCheck for HangingCheck {
        fn protocol(&self) -> ProtocolType {
            ProtocolType::Http
        }

        async fn check(&self, _adapter: &MonitoredAdapter, _timeout: Duration) -> HealthCheckResult {
            // Deliberately ignores the timeout it was handed
            tokio::time::sleep(Duration::from_secs(3600)).await;
            HealthCheckResult::healthy(0)
        }
    }

    struct PanickingCheck;

    #[async_trait]
    impl ProtocolCheck for PanickingCheck {
        fn protocol(&self) -> ProtocolType {
            ProtocolType::Http
        }

        async fn check(&self, _adapter: &MonitoredAdapter, _timeout: Duration) -> HealthCheckResult {
            panic!("strategy bug");
        }
    }

    fn dispatcher_with(strategy: Arc<dyn ProtocolCheck>) -> CheckDispatcher {
        let mut dispatcher = CheckDispatcher::new(Arc::new(FixedCheck {
            protocol: ProtocolType::Generic,
            healthy: true,
        }));
        dispatcher.register(strategy);
        dispatcher
    }

    #[tokio::test]
    async fn test_unregistered_protocol_falls_back_to_generic() {
        let dispatcher = CheckDispatcher::new(Arc::new(FixedCheck {
            protocol: ProtocolType::Generic,
            healthy: true,
        }));

        let adapter = MonitoredAdapter::new("soap-1", "Soap", ProtocolType::Soap);
        let result = dispatcher.dispatch(&adapter, Duration::from_secs(1)).await;
        assert!(result.healthy);
    }

    #[tokio::test]
    async fn test_hanging_strategy_times_out() {
        let dispatcher = dispatcher_with(Arc::new(HangingCheck));
        let adapter = MonitoredAdapter::new("slow", "Slow", ProtocolType::Http);

        let start = Instant::now();
        let result = dispatcher
            .dispatch(&adapter, Duration::from_millis(100))
            .await;
        assert!(!result.healthy);
        assert!(result.error.as_deref().unwrap().contains("timed out"));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_panicking_strategy_is_contained() {
        let dispatcher = dispatcher_with(Arc::new(PanickingCheck));
        let adapter = MonitoredAdapter::new("buggy", "Buggy", ProtocolType::Http);

        let result = dispatcher.dispatch(&adapter, Duration::from_secs(1)).await;
        assert!(!result.healthy);
        assert!(result.error.as_deref().unwrap().contains("aborted"));
    }

    #[tokio::test]
    async fn test_registered_strategy_is_selected() {
        let dispatcher = dispatcher_with(Arc::new(FixedCheck {
            protocol: ProtocolType::Http,
            healthy: false,
        }));
        let adapter = MonitoredAdapter::new("api", "Api", ProtocolType::Http);

        let result = dispatcher.dispatch(&adapter, Duration::from_secs(1)).await;
        assert!(!result.healthy);
        assert_eq!(result.error.as_deref(), Some("fixed failure"));
    }
}
