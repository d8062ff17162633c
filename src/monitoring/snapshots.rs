//! Bounded score history per adapter
//!
//! Appends one snapshot per capture cycle and prunes entries older than
//! the retention window at the same cycle. Histories are per adapter, so
//! captures and dashboard reads never contend across adapters.

use super::registry::AdapterHealthRegistry;
use super::scoring::ScoringEngine;
use crate::core::types::HealthSnapshot;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::Duration;

/// Retained (timestamp, score, status) history per adapter
pub struct SnapshotStore {
    history: DashMap<String, VecDeque<HealthSnapshot>>,
    retention: Duration,
}

impl SnapshotStore {
    /// Create a store with the given retention window
    pub fn new(retention: Duration) -> Self {
        Self {
            history: DashMap::new(),
            retention,
        }
    }

    /// Append one snapshot and prune the adapter's history
    pub fn record(&self, adapter_id: &str, snapshot: HealthSnapshot) {
        let now = snapshot.timestamp;
        let mut list = self.history.entry(adapter_id.to_string()).or_default();
        list.push_back(snapshot);
        Self::prune_list(&mut list, now, self.retention);
    }

    /// Drop entries older than the retention window as of `now`
    ///
    /// Idempotent: pruning twice with no new appends retains the same set.
    pub fn prune(&self, adapter_id: &str, now: DateTime<Utc>) {
        if let Some(mut list) = self.history.get_mut(adapter_id) {
            Self::prune_list(&mut list, now, self.retention);
        }
    }

    fn prune_list(list: &mut VecDeque<HealthSnapshot>, now: DateTime<Utc>, retention: Duration) {
        let cutoff = now - chrono::Duration::from_std(retention).unwrap_or(chrono::Duration::hours(24));
        list.retain(|snapshot| snapshot.timestamp >= cutoff);
    }

    /// Retained history for one adapter, oldest first
    pub fn history(&self, adapter_id: &str) -> Vec<HealthSnapshot> {
        self.history
            .get(adapter_id)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Capture one snapshot per monitored adapter
    pub async fn capture_all(&self, registry: &AdapterHealthRegistry, scoring: &ScoringEngine) {
        let now = Utc::now();
        for status in registry.all() {
            if let Some(score) = scoring.score(&status.adapter_id).await {
                self.record(
                    &status.adapter_id,
                    HealthSnapshot {
                        timestamp: now,
                        score: score.overall.round() as u32,
                        status: score.status,
                    },
                );
            }
        }
    }

    /// Drop an adapter's history when it is unloaded
    pub fn remove(&self, adapter_id: &str) {
        self.history.remove(adapter_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::HealthBand;

    fn snapshot_at(timestamp: DateTime<Utc>, score: u32) -> HealthSnapshot {
        HealthSnapshot {
            timestamp,
            score,
            status: HealthBand::from_score(score as f64),
        }
    }

    #[test]
    fn test_record_keeps_recent_entries() {
        let store = SnapshotStore::new(Duration::from_secs(24 * 3600));
        let now = Utc::now();

        store.record("a", snapshot_at(now - chrono::Duration::hours(1), 90));
        store.record("a", snapshot_at(now, 85));

        assert_eq!(store.history("a").len(), 2);
    }

    #[test]
    fn test_record_prunes_expired_entries() {
        let store = SnapshotStore::new(Duration::from_secs(24 * 3600));
        let now = Utc::now();

        store.record("a", snapshot_at(now - chrono::Duration::hours(30), 90));
        store.record("a", snapshot_at(now - chrono::Duration::hours(25), 70));
        store.record("a", snapshot_at(now, 85));

        let history = store.history("a");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].score, 85);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let store = SnapshotStore::new(Duration::from_secs(24 * 3600));
        let now = Utc::now();

        store.record("a", snapshot_at(now - chrono::Duration::hours(23), 90));
        store.record("a", snapshot_at(now - chrono::Duration::hours(12), 80));
        store.record("a", snapshot_at(now, 85));

        store.prune("a", now);
        let after_first = store.history("a");
        store.prune("a", now);
        let after_second = store.history("a");

        assert_eq!(after_first.len(), 3);
        assert_eq!(after_first.len(), after_second.len());
        for (a, b) in after_first.iter().zip(after_second.iter()) {
            assert_eq!(a.timestamp, b.timestamp);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_history_of_unknown_adapter_is_empty() {
        let store = SnapshotStore::new(Duration::from_secs(3600));
        assert!(store.history("ghost").is_empty());
    }

    #[test]
    fn test_remove_drops_history() {
        let store = SnapshotStore::new(Duration::from_secs(3600));
        store.record("a", snapshot_at(Utc::now(), 90));
        store.remove("a");
        assert!(store.history("a").is_empty());
    }
}
