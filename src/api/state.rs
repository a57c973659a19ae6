use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::{
    config::Config,
    db::{
        create_redis_client, redis::CacheWriterHandle, InMemoryCache, RedisCache,
        RedisRecencyStore, SuggestionCache,
    },
    services::{
        providers::{stylist::HttpStylistProvider, StylistProvider},
        recency::{InMemoryRecencyStore, RecencyPolicy, RecencyStore},
        suggestions::{SuggestionService, SuggestionSettings},
    },
};

/// Namespace of the recency record
///
/// One deployment serves one closet. Suggestions are keyed per inventory, but
/// recency memory is shared by every request.
const RECENCY_NAMESPACE: &str = "default";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub suggestions: Arc<SuggestionService>,
}

impl AppState {
    pub fn new(suggestions: SuggestionService) -> Self {
        Self {
            suggestions: Arc::new(suggestions),
        }
    }

    /// State with in-process stores and no remote stylist
    pub fn local(settings: SuggestionSettings) -> Self {
        Self::new(SuggestionService::new(
            None,
            Arc::new(InMemoryCache::new(Duration::from_secs(settings.cache_ttl_secs))),
            Arc::new(InMemoryRecencyStore::new(RecencyPolicy::default())),
            settings,
        ))
    }

    /// Wires stores and the stylist provider from configuration
    ///
    /// Returns the cache writer handle when Redis is in use so the caller can
    /// flush pending writes on shutdown.
    pub fn from_config(config: &Config) -> anyhow::Result<(Self, Option<CacheWriterHandle>)> {
        let policy = RecencyPolicy::new(config.recency_window_days, config.recency_capacity);

        let (cache, recency, writer): (
            Arc<dyn SuggestionCache>,
            Arc<dyn RecencyStore>,
            Option<CacheWriterHandle>,
        ) = match &config.redis_url {
            Some(url) => {
                let client = create_redis_client(url).context("Invalid REDIS_URL")?;
                let (cache, writer) = RedisCache::new(client.clone());
                let cache: Arc<dyn SuggestionCache> = Arc::new(cache);
                let recency: Arc<dyn RecencyStore> =
                    Arc::new(RedisRecencyStore::new(client, RECENCY_NAMESPACE, policy));
                tracing::info!("Using Redis for suggestion cache and recency memory");
                (cache, recency, Some(writer))
            }
            None => {
                let cache: Arc<dyn SuggestionCache> =
                    Arc::new(InMemoryCache::new(Duration::from_secs(config.cache_ttl_secs)));
                let recency: Arc<dyn RecencyStore> = Arc::new(InMemoryRecencyStore::new(policy));
                tracing::info!("REDIS_URL not set, using in-memory stores");
                (cache, recency, None)
            }
        };

        let provider: Option<Arc<dyn StylistProvider>> = match &config.stylist_api_url {
            Some(url) => {
                let provider: Arc<dyn StylistProvider> = Arc::new(
                    HttpStylistProvider::new(
                        url.clone(),
                        config.stylist_api_key.clone(),
                        config.remote_timeout(),
                    )
                    .context("Failed to build stylist client")?,
                );
                tracing::info!(stylist_api_url = %url, "Remote stylist enabled");
                Some(provider)
            }
            None => {
                tracing::info!("STYLIST_API_URL not set, suggestions are computed locally");
                None
            }
        };

        let service = SuggestionService::new(
            provider,
            cache,
            recency,
            SuggestionSettings::from_config(config),
        );

        Ok((Self::new(service), writer))
    }
}
