//! Adapter health-monitoring engine
//!
//! The poll scheduler fans checks out onto a bounded worker pool, the
//! registry keeps per-adapter failure history, the escalation handler
//! records sustained failures durably, and the scoring engine reduces the
//! raw signals into weighted 0 to 100 health scores with banded status.

pub mod alerts;
pub mod escalation;
pub mod registry;
pub mod scheduler;
pub mod scoring;
pub mod snapshots;
pub mod system;


pub use alerts::AlertScanner;
pub use escalation::{EscalationHandler, EscalationPolicy};
pub use registry::AdapterHealthRegistry;
pub use scheduler::PollScheduler;
pub use scoring::ScoringEngine;
pub use snapshots::SnapshotStore;
pub use system::{Collaborators, MonitoringSystem};

/// Gauge name for broker queue depth, tagged by protocol family
pub const QUEUE_DEPTH_GAUGE: &str = "queue.depth";
/// Gauge name for connection-pool utilization, tagged by adapter id
pub const POOL_UTILIZATION_GAUGE: &str = "pool.utilization";
/// Counter name for total outbound calls, tagged by protocol family
pub const THROUGHPUT_COUNTER: &str = "requests.total";
/// Counter name for failed outbound calls, tagged by protocol family
pub const ERRORS_COUNTER: &str = "requests.errors";
