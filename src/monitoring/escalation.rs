//! Threshold-triggered escalation of sustained failures

use crate::core::traits::HealthRecordSink;
use crate::core::types::HealthCheckResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// When escalation fires relative to the failure threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPolicy {
    /// Fire once when the count reaches the threshold, re-armed by recovery
    OnCross,
    /// Fire on every failing check at or above the threshold
    WhileAboveThreshold,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        EscalationPolicy::WhileAboveThreshold
    }
}

/// Records sustained failures to durable storage
///
/// Sink failures are logged and swallowed; escalation must never abort
/// the scheduler tick that triggered it.
pub struct EscalationHandler {
    sink: Arc<dyn HealthRecordSink>,
    policy: EscalationPolicy,
    threshold: u32,
}

impl EscalationHandler {
    /// Create a handler with the given policy and failure threshold
    pub fn new(sink: Arc<dyn HealthRecordSink>, policy: EscalationPolicy, threshold: u32) -> Self {
        Self {
            sink,
            policy,
            threshold: threshold.max(1),
        }
    }

    /// Consider a failing check for escalation
    ///
    /// Returns true when the failure was escalated.
    pub async fn on_failure(
        &self,
        adapter_id: &str,
        consecutive_failures: u32,
        result: &HealthCheckResult,
    ) -> bool {
        if consecutive_failures < self.threshold {
            return false;
        }
        if self.policy == EscalationPolicy::OnCross && consecutive_failures != self.threshold {
            return false;
        }

        info!(
            adapter_id = %adapter_id,
            consecutive_failures,
            "escalating sustained adapter failure"
        );

        if let Err(e) = self
            .sink
            .record_health_check(adapter_id, false, result.response_time_ms, result.error.clone())
            .await
        {
            warn!(adapter_id = %adapter_id, "failed to record health check: {}", e);
        }
        if let Err(e) = self.sink.update_adapter_health_flag(adapter_id, false).await {
            warn!(adapter_id = %adapter_id, "failed to update durable health flag: {}", e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockHealthRecordSink;
    use crate::utils::error::BridgeError;

    fn failing_result() -> HealthCheckResult {
        HealthCheckResult::unhealthy("connection refused", 120)
    }

    #[tokio::test]
    async fn test_below_threshold_does_nothing() {
        let mut sink = MockHealthRecordSink::new();
        sink.expect_record_health_check().times(0);
        sink.expect_update_adapter_health_flag().times(0);

        let handler = EscalationHandler::new(
            Arc::new(sink),
            EscalationPolicy::WhileAboveThreshold,
            3,
        );
        assert!(!handler.on_failure("a", 2, &failing_result()).await);
    }

    #[tokio::test]
    async fn test_while_above_threshold_refires() {
        let mut sink = MockHealthRecordSink::new();
        sink.expect_record_health_check()
            .times(3)
            .returning(|_, _, _, _| Ok(()));
        sink.expect_update_adapter_health_flag()
            .times(3)
            .returning(|_, _| Ok(()));

        let handler = EscalationHandler::new(
            Arc::new(sink),
            EscalationPolicy::WhileAboveThreshold,
            3,
        );
        for count in [3, 4, 5] {
            assert!(handler.on_failure("a", count, &failing_result()).await);
        }
    }

    #[tokio::test]
    async fn test_on_cross_fires_exactly_once() {
        let mut sink = MockHealthRecordSink::new();
        sink.expect_record_health_check()
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        sink.expect_update_adapter_health_flag()
            .times(1)
            .returning(|_, _| Ok(()));

        let handler = EscalationHandler::new(Arc::new(sink), EscalationPolicy::OnCross, 3);
        assert!(handler.on_failure("a", 3, &failing_result()).await);
        assert!(!handler.on_failure("a", 4, &failing_result()).await);
        assert!(!handler.on_failure("a", 5, &failing_result()).await);
    }

    #[tokio::test]
    async fn test_sink_failures_are_swallowed() {
        let mut sink = MockHealthRecordSink::new();
        sink.expect_record_health_check()
            .returning(|_, _, _, _| Err(BridgeError::Storage("disk full".to_string())));
        sink.expect_update_adapter_health_flag()
            .returning(|_, _| Err(BridgeError::Storage("disk full".to_string())));

        let handler = EscalationHandler::new(
            Arc::new(sink),
            EscalationPolicy::WhileAboveThreshold,
            1,
        );
        // Both sink calls fail; the handler still completes normally.
        assert!(handler.on_failure("a", 1, &failing_result()).await);
    }

    #[tokio::test]
    async fn test_record_carries_result_details() {
        let mut sink = MockHealthRecordSink::new();
        sink.expect_record_health_check()
            .withf(|id, healthy, rt, error| {
                id == "crm"
                    && !healthy
                    && *rt == 120
                    && error.as_deref() == Some("connection refused")
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        sink.expect_update_adapter_health_flag()
            .withf(|id, healthy| id == "crm" && !healthy)
            .times(1)
            .returning(|_, _| Ok(()));

        let handler = EscalationHandler::new(Arc::new(sink), EscalationPolicy::OnCross, 1);
        handler.on_failure("crm", 1, &failing_result()).await;
    }
}
