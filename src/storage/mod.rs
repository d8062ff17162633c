//! Collaborator implementations
//!
//! The engine only ever sees the trait seams in `core::traits`; the
//! in-memory implementations here back the standalone binary and tests.
//! Deployments embedding the engine provide their own.

pub mod memory;

pub use memory::{
    HealthCheckRecord, InMemoryAdapterStore, InMemoryHealthRecordSink, InMemoryMetricsRegistry,
    InMemoryPoolManager, StaticSlaReports,
};
