//! Alert types derived from current health state
//!
//! Alerts are computed fresh on every query and never persisted.

use serde::{Deserialize, Serialize};

/// Alert severity levels, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
    Emergency,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Info => write!(f, "INFO"),
            AlertSeverity::Warning => write!(f, "WARNING"),
            AlertSeverity::Critical => write!(f, "CRITICAL"),
            AlertSeverity::Emergency => write!(f, "EMERGENCY"),
        }
    }
}

/// Condition class that raised an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// Adapter disabled or removed in the external store
    AdapterInactive,
    /// Error rate above the alerting threshold
    HighErrorRate,
    /// Mean response time above the alerting threshold
    SlowResponse,
    /// Connection-pool or queue resources near exhaustion
    ResourceExhaustion,
    /// SLA compliance below target
    SlaViolation,
}

/// A single alert condition observed for one adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAlert {
    /// Adapter the condition was observed on
    pub adapter_id: String,
    /// Condition class
    pub alert_type: AlertType,
    /// Human-readable description
    pub message: String,
    /// Severity used for sorting and display
    pub severity: AlertSeverity,
    /// When the condition was observed
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
