use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::AppResult;

pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_CAPACITY: usize = 20;

/// How long and how many suggested items are remembered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyPolicy {
    pub window: Duration,
    pub capacity: usize,
}

impl Default for RecencyPolicy {
    fn default() -> Self {
        Self {
            window: Duration::days(DEFAULT_WINDOW_DAYS),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl RecencyPolicy {
    pub fn new(window_days: i64, capacity: usize) -> Self {
        Self {
            window: Duration::days(window_days),
            capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentEntry {
    pub item_id: String,
    pub shown_at: DateTime<Utc>,
}

/// Recently suggested items, oldest insertion first
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecencyRecord {
    entries: Vec<RecentEntry>,
}

impl RecencyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.iter().any(|e| e.item_id == item_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RecentEntry] {
        &self.entries
    }

    /// Inserts or refreshes an item; a refreshed item moves to the newest position
    pub fn insert(&mut self, item_id: &str, at: DateTime<Utc>) {
        self.entries.retain(|e| e.item_id != item_id);
        self.entries.push(RecentEntry {
            item_id: item_id.to_string(),
            shown_at: at,
        });
    }

    /// Drops entries older than the window, then keeps the newest `capacity` insertions
    pub fn prune(&mut self, now: DateTime<Utc>, policy: RecencyPolicy) {
        let cutoff = now - policy.window;
        self.entries.retain(|e| e.shown_at > cutoff);

        if self.entries.len() > policy.capacity {
            let excess = self.entries.len() - policy.capacity;
            self.entries.drain(..excess);
        }
    }

    /// Inserts every id and prunes, as one step
    pub fn record_all(&mut self, item_ids: &[String], at: DateTime<Utc>, policy: RecencyPolicy) {
        for id in item_ids {
            self.insert(id, at);
        }
        self.prune(at, policy);
    }
}

/// Storage for the recency record of recently suggested items
#[async_trait::async_trait]
pub trait RecencyStore: Send + Sync {
    /// Current record, without entries that have aged out
    async fn load(&self) -> AppResult<RecencyRecord>;

    /// Records the ids as shown at `at`, pruning in the same write
    async fn record(&self, item_ids: &[String], at: DateTime<Utc>) -> AppResult<()>;

    /// Prunes entries relative to `now`
    async fn prune(&self, now: DateTime<Utc>) -> AppResult<()>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Process-local recency store
#[derive(Debug, Default)]
pub struct InMemoryRecencyStore {
    record: Mutex<RecencyRecord>,
    policy: RecencyPolicy,
}

impl InMemoryRecencyStore {
    pub fn new(policy: RecencyPolicy) -> Self {
        Self {
            record: Mutex::new(RecencyRecord::new()),
            policy,
        }
    }
}

#[async_trait::async_trait]
impl RecencyStore for InMemoryRecencyStore {
    async fn load(&self) -> AppResult<RecencyRecord> {
        let mut record = self.record.lock().await.clone();
        record.prune(Utc::now(), self.policy);
        Ok(record)
    }

    async fn record(&self, item_ids: &[String], at: DateTime<Utc>) -> AppResult<()> {
        // Insert and prune under one lock so concurrent writers never lose entries
        let mut record = self.record.lock().await;
        record.record_all(item_ids, at, self.policy);
        tracing::debug!(remembered = record.len(), "Recorded suggested items");
        Ok(())
    }

    async fn prune(&self, now: DateTime<Utc>) -> AppResult<()> {
        self.record.lock().await.prune(now, self.policy);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|i| format!("item-{}", i)).collect()
    }

    #[test]
    fn test_insert_refreshes_position() {
        let now = Utc::now();
        let mut record = RecencyRecord::new();
        record.insert("a", now);
        record.insert("b", now);
        record.insert("a", now);
        assert_eq!(record.len(), 2);
        assert_eq!(record.entries()[1].item_id, "a");
    }

    #[test]
    fn test_prune_drops_entries_older_than_window() {
        let now = Utc::now();
        let mut record = RecencyRecord::new();
        record.insert("old", now - Duration::days(8));
        record.insert("fresh", now - Duration::days(2));
        record.prune(now, RecencyPolicy::default());
        assert!(!record.contains("old"));
        assert!(record.contains("fresh"));
    }

    #[test]
    fn test_prune_caps_to_most_recent_insertions() {
        let now = Utc::now();
        let mut record = RecencyRecord::new();
        record.record_all(&ids(0..25), now, RecencyPolicy::default());
        assert_eq!(record.len(), DEFAULT_CAPACITY);
        assert!(!record.contains("item-4"));
        assert!(record.contains("item-5"));
        assert!(record.contains("item-24"));
    }

    #[tokio::test]
    async fn test_in_memory_store_round_trip() {
        let store = InMemoryRecencyStore::new(RecencyPolicy::default());
        assert!(store.load().await.unwrap().is_empty());

        store.record(&ids(0..3), Utc::now()).await.unwrap();
        let record = store.load().await.unwrap();
        assert_eq!(record.len(), 3);
        assert!(record.contains("item-1"));
    }

    #[tokio::test]
    async fn test_in_memory_store_hides_aged_out_entries() {
        let store = InMemoryRecencyStore::new(RecencyPolicy::default());
        store
            .record(&ids(0..2), Utc::now() - Duration::days(10))
            .await
            .unwrap();
        assert!(store.load().await.unwrap().is_empty());

        store.prune(Utc::now()).await.unwrap();
        assert!(store.record.lock().await.is_empty());
    }
}
