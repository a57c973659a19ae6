use std::fmt::Display;

use crate::{
    error::AppResult,
    models::{InventoryItem, Suggestion, UserPreferences, WeatherSnapshot},
};

mod macros;
pub mod memory;
pub mod redis;

pub use memory::InMemoryCache;
pub use self::redis::{create_redis_client, RedisCache, RedisRecencyStore};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Suggestion for (temperature, condition, preferences, closet, outfit size)
    Suggestion {
        temperature: String,
        condition: String,
        preferences: String,
        inventory: String,
        max_items: usize,
    },
    /// Recency record for one user namespace
    Recency(String),
}

impl CacheKey {
    pub fn suggestion(
        weather: &WeatherSnapshot,
        preferences: &UserPreferences,
        inventory: &[InventoryItem],
        max_items: usize,
    ) -> Self {
        CacheKey::Suggestion {
            temperature: format!("{:.1}", weather.temperature),
            condition: weather.condition.trim().to_lowercase(),
            preferences: preferences.fingerprint(),
            inventory: InventoryItem::fingerprint(inventory),
            max_items,
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Suggestion {
                temperature,
                condition,
                preferences,
                inventory,
                max_items,
            } => write!(
                f,
                "suggest:{}:{}:{}:{}:{}",
                temperature, condition, preferences, inventory, max_items
            ),
            CacheKey::Recency(namespace) => write!(f, "recent:{}", namespace),
        }
    }
}

/// Storage for computed suggestions
#[async_trait::async_trait]
pub trait SuggestionCache: Send + Sync {
    /// Retrieves a cached suggestion, `None` when missing or expired
    async fn get_from_cache(&self, key: &CacheKey) -> AppResult<Option<Suggestion>>;

    /// Stores a suggestion without waiting for the write to complete
    fn set_in_background(&self, key: &CacheKey, value: &Suggestion, ttl: u64);

    /// Removes a cached suggestion
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;
}
