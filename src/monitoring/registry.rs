//! Concurrent per-adapter health state
//!
//! One entry per monitored adapter, keyed by adapter id. Entries are
//! locked individually, so workers updating different adapters and
//! dashboard reads never contend with each other.

use crate::core::types::{AdapterHealthStatus, MonitoredAdapter};
use dashmap::DashMap;

/// Registry of mutable health records, one per monitored adapter
#[derive(Default)]
pub struct AdapterHealthRegistry {
    entries: DashMap<String, AdapterHealthStatus>,
}

impl AdapterHealthRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Create the adapter's record if missing and refresh its identity
    pub fn ensure(&self, adapter: &MonitoredAdapter) {
        let mut entry = self.entries.entry(adapter.id.clone()).or_insert_with(|| {
            AdapterHealthStatus::new(&adapter.id, &adapter.name, adapter.protocol)
        });
        entry.adapter_name = adapter.name.clone();
        entry.protocol = adapter.protocol;
        entry.active = true;
    }

    /// Record a successful check; resets the consecutive-failure count
    pub fn mark_healthy(&self, adapter_id: &str, response_time_ms: u64) {
        if let Some(mut entry) = self.entries.get_mut(adapter_id) {
            entry.record_success(response_time_ms);
        }
    }

    /// Record a failed check; returns the new consecutive-failure count
    pub fn mark_unhealthy(&self, adapter_id: &str, error: &str) -> u32 {
        match self.entries.get_mut(adapter_id) {
            Some(mut entry) => {
                entry.record_failure(error);
                entry.consecutive_failures
            }
            None => 0,
        }
    }

    /// Flag the adapter as disabled in the external store
    ///
    /// Does not touch the check counters.
    pub fn mark_inactive(&self, adapter_id: &str) {
        if let Some(mut entry) = self.entries.get_mut(adapter_id) {
            entry.active = false;
            entry.healthy = false;
        }
    }

    /// Issue a check ticket for the recency gate
    ///
    /// A result applied with an older ticket than the newest applied one
    /// is discarded, so a straggler from an abandoned batch can never
    /// overwrite fresher state.
    pub fn begin_check(&self, adapter_id: &str) -> u64 {
        match self.entries.get_mut(adapter_id) {
            Some(mut entry) => {
                entry.issued_seq += 1;
                entry.issued_seq
            }
            None => 0,
        }
    }

    /// Apply a successful check under ticket `seq`
    ///
    /// Returns false when the result was stale and discarded.
    pub fn apply_healthy(&self, adapter_id: &str, seq: u64, response_time_ms: u64) -> bool {
        match self.entries.get_mut(adapter_id) {
            Some(mut entry) => {
                if entry.try_apply(seq) {
                    entry.record_success(response_time_ms);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Apply a failed check under ticket `seq`
    ///
    /// Returns the new consecutive-failure count, or `None` when the
    /// result was stale and discarded.
    pub fn apply_unhealthy(&self, adapter_id: &str, seq: u64, error: &str) -> Option<u32> {
        match self.entries.get_mut(adapter_id) {
            Some(mut entry) => {
                if entry.try_apply(seq) {
                    entry.record_failure(error);
                    Some(entry.consecutive_failures)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Snapshot of one adapter's record
    pub fn get(&self, adapter_id: &str) -> Option<AdapterHealthStatus> {
        self.entries.get(adapter_id).map(|entry| entry.clone())
    }

    /// Snapshot of every record
    pub fn all(&self) -> Vec<AdapterHealthStatus> {
        self.entries.iter().map(|entry| entry.clone()).collect()
    }

    /// Drop an adapter's record when it is unloaded from monitoring
    pub fn remove(&self, adapter_id: &str) -> Option<AdapterHealthStatus> {
        self.entries.remove(adapter_id).map(|(_, status)| status)
    }

    /// Number of monitored adapters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any adapters are monitored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
