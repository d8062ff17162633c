//! Weighted health scores and history snapshots

use serde::{Deserialize, Serialize};

/// Weight of the connection sub-score in the overall score
pub const WEIGHT_CONNECTION: f64 = 0.30;
/// Weight of the performance sub-score
pub const WEIGHT_PERFORMANCE: f64 = 0.25;
/// Weight of the error-rate sub-score
pub const WEIGHT_ERROR: f64 = 0.25;
/// Weight of the resource sub-score
pub const WEIGHT_RESOURCE: f64 = 0.10;
/// Weight of the SLA sub-score
pub const WEIGHT_SLA: f64 = 0.10;

/// Status band derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthBand {
    /// Overall score of 80 or above
    Healthy,
    /// Overall score of 60 up to 80
    Warning,
    /// Overall score below 60
    Critical,
}

impl HealthBand {
    /// Classify an overall score into its band
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            HealthBand::Healthy
        } else if score >= 60.0 {
            HealthBand::Warning
        } else {
            HealthBand::Critical
        }
    }
}

impl std::fmt::Display for HealthBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthBand::Healthy => write!(f, "HEALTHY"),
            HealthBand::Warning => write!(f, "WARNING"),
            HealthBand::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Weighted composite health score for one adapter
///
/// Recomputed as a whole on every evaluation; never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthScore {
    /// Adapter identifier
    pub adapter_id: String,
    /// Recency of contact with the endpoint, 0 to 100
    pub connection: f64,
    /// Mean response time band, 0 to 100
    pub performance: f64,
    /// Error-rate band, 0 to 100
    pub error: f64,
    /// Queue-depth or pool-utilization band, 0 to 100
    pub resource: f64,
    /// SLA compliance, 0 to 100
    pub sla: f64,
    /// Weighted overall score, clamped to 0 to 100
    pub overall: f64,
    /// Band classification of the overall score
    pub status: HealthBand,
    /// When this score was computed
    pub calculated_at: chrono::DateTime<chrono::Utc>,
}

impl HealthScore {
    /// Combine sub-scores into the weighted overall score
    pub fn compose(
        adapter_id: &str,
        connection: f64,
        performance: f64,
        error: f64,
        resource: f64,
        sla: f64,
    ) -> Self {
        let overall = (WEIGHT_CONNECTION * connection
            + WEIGHT_PERFORMANCE * performance
            + WEIGHT_ERROR * error
            + WEIGHT_RESOURCE * resource
            + WEIGHT_SLA * sla)
            .clamp(0.0, 100.0);

        Self {
            adapter_id: adapter_id.to_string(),
            connection,
            performance,
            error,
            resource,
            sla,
            overall,
            status: HealthBand::from_score(overall),
            calculated_at: chrono::Utc::now(),
        }
    }
}

/// One retained point of an adapter's score history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Capture time
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Overall score at capture time, rounded to an integer
    pub score: u32,
    /// Band at capture time
    pub status: HealthBand,
}
