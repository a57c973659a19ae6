use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Redis connection URL. Without it the cache and recency memory live in process.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Base URL of the remote stylist service. Without it every request is answered locally.
    #[serde(default)]
    pub stylist_api_url: Option<String>,

    /// Bearer token for the stylist service
    #[serde(default)]
    pub stylist_api_key: Option<String>,

    /// Per-call timeout for the stylist service
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,

    /// Retries after a stylist timeout
    #[serde(default = "default_remote_max_retries")]
    pub remote_max_retries: u32,

    /// Fixed pause between retries
    #[serde(default = "default_remote_retry_delay_ms")]
    pub remote_retry_delay_ms: u64,

    /// How long a computed suggestion stays cached
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Outfit size used when the request does not specify one
    #[serde(default = "default_max_recommendations")]
    pub default_max_recommendations: usize,

    /// Age after which a recently suggested item may be suggested again
    #[serde(default = "default_recency_window_days")]
    pub recency_window_days: i64,

    /// Number of recently suggested items remembered
    #[serde(default = "default_recency_capacity")]
    pub recency_capacity: usize,

    /// Fixed seed for selection randomness (tests and reproducible demos)
    #[serde(default)]
    pub selection_seed: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_remote_timeout_secs() -> u64 {
    10
}

fn default_remote_max_retries() -> u32 {
    3
}

fn default_remote_retry_delay_ms() -> u64 {
    2000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_max_recommendations() -> usize {
    4
}

fn default_recency_window_days() -> i64 {
    7
}

fn default_recency_capacity() -> usize {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            redis_url: None,
            stylist_api_url: None,
            stylist_api_key: None,
            remote_timeout_secs: default_remote_timeout_secs(),
            remote_max_retries: default_remote_max_retries(),
            remote_retry_delay_ms: default_remote_retry_delay_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            default_max_recommendations: default_max_recommendations(),
            recency_window_days: default_recency_window_days(),
            recency_capacity: default_recency_capacity(),
            selection_seed: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.remote_retry_delay_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_env() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.remote_max_retries, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(2));
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.recency_window_days, 7);
        assert_eq!(config.recency_capacity, 20);
        assert!(config.redis_url.is_none());
        assert!(config.stylist_api_url.is_none());
    }

    #[test]
    fn test_overrides_from_env() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("STYLIST_API_URL".to_string(), "http://stylist.local".to_string()),
            ("SELECTION_SEED".to_string(), "42".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.stylist_api_url.as_deref(), Some("http://stylist.local"));
        assert_eq!(config.selection_seed, Some(42));
    }
}
