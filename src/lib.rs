//! # BridgeHub
//!
//! Integration-platform backend whose adapters bridge to external systems
//! over HTTP/REST, relational databases, filesystem drops, FTP/SFTP,
//! message queues, and SOAP. This crate is the adapter health-monitoring
//! engine: it continuously and concurrently determines whether each
//! configured adapter can reach its endpoint, tracks per-adapter failure
//! history, escalates sustained failures to durable storage, and reduces
//! the raw signals into weighted 0 to 100 health scores for dashboards
//! and alerting.
//!
//! ## Embedding the engine
//!
//! ```rust,no_run
//! use bridgehub::config::MonitoringConfig;
//! use bridgehub::monitoring::{Collaborators, MonitoringSystem};
//! use bridgehub::storage::memory::{
//!     InMemoryAdapterStore, InMemoryHealthRecordSink, InMemoryMetricsRegistry,
//!     InMemoryPoolManager, StaticSlaReports,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let system = MonitoringSystem::new(
//!         MonitoringConfig::default(),
//!         Collaborators {
//!             store: Arc::new(InMemoryAdapterStore::new()),
//!             sink: Arc::new(InMemoryHealthRecordSink::new()),
//!             metrics: Arc::new(InMemoryMetricsRegistry::new()),
//!             sla: Arc::new(StaticSlaReports::default()),
//!             pools: Arc::new(InMemoryPoolManager::new()),
//!         },
//!     );
//!     system.start();
//! }
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod monitoring;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use crate::config::Config;
pub use crate::core::checks::{CheckDispatcher, ProtocolCheck};
pub use crate::core::types::{
    AdapterHealthStatus, AlertSeverity, AlertType, HealthAlert, HealthBand, HealthCheckResult,
    HealthScore, HealthSnapshot, MonitoredAdapter, ProtocolType,
};
pub use crate::monitoring::{Collaborators, MonitoringSystem};
pub use crate::utils::error::{BridgeError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
