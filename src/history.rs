//! 🗂️ Bounded in-memory history of scored transactions.
//!
//! Backed by a ring of the most recent entries. When the store is full the
//! oldest entry is evicted on insert. Retrieval walks newest to oldest in
//! insertion order, so a backdated timestamp does not reorder results.

use log::debug;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::scoring::ScoringResult;
use crate::types::{Decision, Transaction};

/// Default number of entries retained
pub const DEFAULT_CAPACITY: usize = 100;

/// Flattened record of one scored transaction.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub transaction_id: String,
    pub user_id: u64,
    pub amount: f64,
    pub merchant_id: String,
    pub score: f64,
    pub decision: Decision,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub country: Option<String>,
}

impl HistoryEntry {
    pub fn from_scored(transaction: &Transaction, result: &ScoringResult) -> Self {
        Self {
            transaction_id: result.transaction_id.clone(),
            user_id: transaction.user_id,
            amount: transaction.amount,
            merchant_id: transaction.merchant_id.clone(),
            score: result.score,
            decision: result.decision,
            timestamp: result.timestamp,
            country: transaction.country.clone(),
        }
    }
}

/// Per-decision counts for the stats endpoint.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DecisionCounts {
    #[serde(rename = "ALLOW")]
    pub allow: usize,
    #[serde(rename = "FLAG")]
    pub flag: usize,
    #[serde(rename = "DECLINE")]
    pub decline: usize,
}

impl DecisionCounts {
    pub fn total(&self) -> usize {
        self.allow + self.flag + self.decline
    }
}

/// Thread-safe bounded store of recent scoring results.
pub struct HistoryStore {
    entries: Mutex<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when at capacity.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() == self.capacity {
            if let Some(evicted) = entries.pop_front() {
                debug!("Evicted history entry {}", evicted.transaction_id);
            }
        }
        entries.push_back(entry);
    }

    /// Most recent entries first, optionally filtered by decision,
    /// truncated to `limit` after filtering.
    pub fn list(&self, limit: usize, filter: Option<Decision>) -> Vec<HistoryEntry> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .rev()
            .filter(|e| filter.map_or(true, |d| e.decision == d))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn decision_counts(&self) -> DecisionCounts {
        let entries = self.entries.lock().unwrap();
        let mut counts = DecisionCounts::default();
        for entry in entries.iter() {
            match entry.decision {
                Decision::Allow => counts.allow += 1,
                Decision::Flag => counts.flag += 1,
                Decision::Decline => counts.decline += 1,
            }
        }
        counts
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn entry(n: u64, decision: Decision) -> HistoryEntry {
        HistoryEntry {
            transaction_id: format!("txn_{:012}", n),
            user_id: n,
            amount: 100.0 + n as f64,
            merchant_id: "MERCHANT_001".to_string(),
            score: 0.5,
            decision,
            timestamp: Utc::now(),
            country: None,
        }
    }

    #[test]
    fn test_empty_store() {
        let store = HistoryStore::default();

        assert_eq!(store.count(), 0);
        assert!(store.list(20, None).is_empty());
        assert_eq!(store.decision_counts().total(), 0);
        assert_eq!(store.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_capacity_eviction() {
        let store = HistoryStore::new(100);
        for n in 1..=150 {
            store.record(entry(n, Decision::Allow));
        }

        assert_eq!(store.count(), 100);

        let all = store.list(100, None);
        assert_eq!(all.len(), 100);
        // Newest first; entries 1..=50 were evicted
        assert_eq!(all.first().unwrap().user_id, 150);
        assert_eq!(all.last().unwrap().user_id, 51);
    }

    #[test]
    fn test_most_recent_first() {
        let store = HistoryStore::new(10);
        for n in 1..=5 {
            store.record(entry(n, Decision::Allow));
        }

        let ids: Vec<u64> = store.list(10, None).iter().map(|e| e.user_id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_limit_truncation() {
        let store = HistoryStore::new(10);
        for n in 1..=8 {
            store.record(entry(n, Decision::Allow));
        }

        let page = store.list(3, None);
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].user_id, 8);
        assert_eq!(page[2].user_id, 6);
    }

    #[test]
    fn test_decision_filter() {
        let store = HistoryStore::new(10);
        store.record(entry(1, Decision::Allow));
        store.record(entry(2, Decision::Flag));
        store.record(entry(3, Decision::Decline));
        store.record(entry(4, Decision::Flag));

        let flagged = store.list(10, Some(Decision::Flag));
        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].user_id, 4);
        assert_eq!(flagged[1].user_id, 2);

        // Limit applies after filtering
        let first_flag = store.list(1, Some(Decision::Flag));
        assert_eq!(first_flag.len(), 1);
        assert_eq!(first_flag[0].user_id, 4);
    }

    #[test]
    fn test_decision_counts() {
        let store = HistoryStore::new(10);
        store.record(entry(1, Decision::Allow));
        store.record(entry(2, Decision::Allow));
        store.record(entry(3, Decision::Flag));
        store.record(entry(4, Decision::Decline));

        let counts = store.decision_counts();
        assert_eq!(counts.allow, 2);
        assert_eq!(counts.flag, 1);
        assert_eq!(counts.decline, 1);
        assert_eq!(counts.total(), store.count());
    }

    #[test]
    fn test_insertion_order_ignores_timestamps() {
        let store = HistoryStore::new(10);
        store.record(entry(1, Decision::Allow));

        // Backdated entry recorded last still comes back first
        let mut backdated = entry(2, Decision::Allow);
        backdated.timestamp = Utc::now() - Duration::hours(6);
        store.record(backdated);

        let listed = store.list(10, None);
        assert_eq!(listed[0].user_id, 2);
        assert_eq!(listed[1].user_id, 1);
    }

    #[test]
    fn test_clear() {
        let store = HistoryStore::new(10);
        for n in 1..=5 {
            store.record(entry(n, Decision::Flag));
        }
        assert_eq!(store.count(), 5);

        store.clear();
        assert_eq!(store.count(), 0);
        assert!(store.list(10, None).is_empty());
    }

    #[test]
    fn test_counts_serialize_uppercase() {
        let counts = DecisionCounts {
            allow: 3,
            flag: 2,
            decline: 1,
        };
        let value = serde_json::to_value(counts).unwrap();

        assert_eq!(value["ALLOW"], 3);
        assert_eq!(value["FLAG"], 2);
        assert_eq!(value["DECLINE"], 1);
    }
}
