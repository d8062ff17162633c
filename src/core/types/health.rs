//! Health check results and per-adapter health state

use super::adapter::ProtocolType;
use serde::{Deserialize, Serialize};

/// Outcome of a single protocol check
///
/// Produced once per check and consumed immediately; never stored by
/// reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Whether the endpoint was reachable and responsive
    pub healthy: bool,
    /// Wall-clock time the check took, in milliseconds
    pub response_time_ms: u64,
    /// Error message if unhealthy
    pub error: Option<String>,
}

impl HealthCheckResult {
    /// Create a healthy result
    pub fn healthy(response_time_ms: u64) -> Self {
        Self {
            healthy: true,
            response_time_ms,
            error: None,
        }
    }

    /// Create an unhealthy result
    pub fn unhealthy(error: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            healthy: false,
            response_time_ms,
            error: Some(error.into()),
        }
    }
}

/// Mutable health record for one monitored adapter
///
/// Owned exclusively by the health registry and mutated only through its
/// operations. `consecutive_failures` counts failures since the last
/// success and is reset to zero by any success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterHealthStatus {
    /// Adapter identifier
    pub adapter_id: String,
    /// Adapter name at the time it was loaded into monitoring
    pub adapter_name: String,
    /// Protocol family
    pub protocol: ProtocolType,
    /// Result of the most recent applied check
    pub healthy: bool,
    /// Whether the adapter is still active in the external store
    pub active: bool,
    /// Timestamp of the most recent applied check
    pub last_check: Option<chrono::DateTime<chrono::Utc>>,
    /// Timestamp of the most recent successful check
    pub last_success: Option<chrono::DateTime<chrono::Utc>>,
    /// Error from the most recent failed check, cleared on success
    pub last_error: Option<String>,
    /// Failures since the last success
    pub consecutive_failures: u32,
    /// Total applied checks
    pub total_checks: u64,
    /// Total applied failures
    pub failed_checks: u64,
    /// Accumulated response time of successful checks, in milliseconds
    pub total_response_time_ms: u64,
    /// Highest check ticket issued for this adapter
    #[serde(skip)]
    pub issued_seq: u64,
    /// Ticket of the newest applied check result
    #[serde(skip)]
    pub applied_seq: u64,
}

impl AdapterHealthStatus {
    /// Create a fresh record for a newly loaded adapter
    pub fn new(adapter_id: &str, adapter_name: &str, protocol: ProtocolType) -> Self {
        Self {
            adapter_id: adapter_id.to_string(),
            adapter_name: adapter_name.to_string(),
            protocol,
            healthy: true,
            active: true,
            last_check: None,
            last_success: None,
            last_error: None,
            consecutive_failures: 0,
            total_checks: 0,
            failed_checks: 0,
            total_response_time_ms: 0,
            issued_seq: 0,
            applied_seq: 0,
        }
    }

    /// Mean response time over successful checks, in milliseconds
    pub fn mean_response_time_ms(&self) -> f64 {
        let successes = self.total_checks.saturating_sub(self.failed_checks);
        if successes == 0 {
            0.0
        } else {
            self.total_response_time_ms as f64 / successes as f64
        }
    }

    /// Failed checks as a percentage of all checks
    pub fn error_rate_percent(&self) -> f64 {
        if self.total_checks == 0 {
            0.0
        } else {
            (self.failed_checks as f64 / self.total_checks as f64) * 100.0
        }
    }

    pub(crate) fn record_success(&mut self, response_time_ms: u64) {
        let now = chrono::Utc::now();
        self.healthy = true;
        self.last_check = Some(now);
        self.last_success = Some(now);
        self.last_error = None;
        self.consecutive_failures = 0;
        self.total_checks += 1;
        self.total_response_time_ms += response_time_ms;
    }

    pub(crate) fn record_failure(&mut self, error: &str) {
        self.healthy = false;
        self.last_check = Some(chrono::Utc::now());
        self.last_error = Some(error.to_string());
        self.consecutive_failures += 1;
        self.total_checks += 1;
        self.failed_checks += 1;
    }

    /// Apply gate for the ticket `seq`; returns false when a newer result
    /// has already been applied.
    pub(crate) fn try_apply(&mut self, seq: u64) -> bool {
        if seq == 0 || seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        true
    }
}
