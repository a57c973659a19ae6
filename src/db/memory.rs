use moka::sync::Cache;
use std::time::{Duration, Instant};

use crate::{
    db::{CacheKey, SuggestionCache},
    error::AppResult,
    models::Suggestion,
};

/// Upper bound on cached suggestions held in process
const MAX_ENTRIES: u64 = 10_000;

#[derive(Clone)]
struct Entry {
    value: Suggestion,
    expires_at: Instant,
}

/// Process-local suggestion cache, used when no Redis is configured
///
/// Bounded in size; entries past their own TTL read as misses even before
/// eviction catches up with them.
pub struct InMemoryCache {
    entries: Cache<String, Entry>,
}

impl InMemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, MAX_ENTRIES)
    }

    pub fn with_capacity(ttl: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl.max(Duration::from_secs(1)))
            .build();
        Self { entries }
    }

    /// Approximate number of live entries
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl SuggestionCache for InMemoryCache {
    async fn get_from_cache(&self, key: &CacheKey) -> AppResult<Option<Suggestion>> {
        let key = key.to_string();

        let Some(entry) = self.entries.get(&key) else {
            return Ok(None);
        };
        if Instant::now() < entry.expires_at {
            return Ok(Some(entry.value));
        }

        self.entries.invalidate(&key);
        Ok(None)
    }

    fn set_in_background(&self, key: &CacheKey, value: &Suggestion, ttl: u64) {
        let entry = Entry {
            value: value.clone(),
            expires_at: Instant::now() + Duration::from_secs(ttl),
        };
        self.entries.insert(key.to_string(), entry);
    }

    async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        self.entries.invalidate(&key.to_string());
        Ok(())
    }
}
