/// A macro to simplify get-or-compute caching of suggestions.
///
/// This macro checks if a value is present in the cache.
/// If found, it returns the cached value.
/// If not found, it executes the provided future to compute the value,
/// stores it in the cache, and then returns the computed value.
/// Errors from the future are returned as-is and nothing is cached.
///
/// # Arguments
/// * `$cache`: Anything implementing [`crate::db::SuggestionCache`].
/// * `$key`: The [`crate::db::CacheKey`] to use.
/// * `$ttl`: The time-to-live (TTL) for the cached value in seconds.
/// * `$block`: The future to await if the value is not found in cache.
///
/// # Example
/// ```rust,ignore
/// let suggestion = cached!(self.cache, key, CACHE_TTL, async {
///     compute_suggestion().await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            tracing::debug!(key = %$key, "Suggestion cache hit");
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
