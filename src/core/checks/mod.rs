//! Protocol check strategies
//!
//! One stateless check per protocol family. Every strategy records its
//! wall-clock elapsed time, honors the supplied timeout for its own I/O,
//! and converts any failure into an unhealthy result instead of raising.

pub mod database;
pub mod dispatcher;
pub mod filesystem;
pub mod ftp;
pub mod generic;
pub mod http;
pub mod queue;
pub mod soap;

pub use dispatcher::CheckDispatcher;

use crate::core::types::{HealthCheckResult, MonitoredAdapter, ProtocolType};
use async_trait::async_trait;
use std::time::Duration;

/// A health check strategy for one protocol family
#[async_trait]
pub trait ProtocolCheck: Send + Sync {
    /// Protocol family this strategy handles
    fn protocol(&self) -> ProtocolType;

    /// Probe the adapter's endpoint within `timeout`
    ///
    /// Implementations never return an error and never panic on bad
    /// configuration; both become unhealthy results.
    async fn check(&self, adapter: &MonitoredAdapter, timeout: Duration) -> HealthCheckResult;
}

/// Elapsed milliseconds since `start`, saturating into u64
pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
