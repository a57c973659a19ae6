pub mod cache;
pub mod recency;

pub use cache::create_redis_client;
pub use cache::CacheWriterHandle;
pub use cache::RedisCache;
pub use recency::RedisRecencyStore;
