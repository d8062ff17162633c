//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::monitoring::MonitoringSystem;
use std::sync::Arc;

/// Shared resources available to every request handler
#[derive(Clone)]
pub struct AppState {
    /// Platform configuration (shared read-only)
    pub config: Arc<Config>,
    /// The health-monitoring engine
    pub system: Arc<MonitoringSystem>,
}

impl AppState {
    /// Create the shared state
    pub fn new(config: Arc<Config>, system: Arc<MonitoringSystem>) -> Self {
        Self { config, system }
    }
}
