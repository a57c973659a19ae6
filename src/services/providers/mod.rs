use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{InventoryItem, UserPreferences, WeatherSnapshot},
};

pub mod stylist;

/// Payload sent to the stylist service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StylistRequest {
    pub inventory: Vec<InventoryItem>,
    pub weather: WeatherSnapshot,
    pub preferences: UserPreferences,
    pub max_recommendations: usize,
}

/// Outfit returned by the stylist service, as item ids from the submitted inventory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StylistResponse {
    pub items: Vec<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub confidence: f64,
}

/// Trait for remote outfit recommendation backends
///
/// Implementations must report transient transport failures as
/// `AppError::RemoteTimeout` and definitive rejections (validation, feasibility,
/// expired session) with their dedicated variants; anything else is
/// `AppError::RemoteError` and sends the orchestrator to its local fallback.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StylistProvider: Send + Sync {
    /// Asks the backend for an outfit
    async fn recommend(&self, request: &StylistRequest) -> AppResult<StylistResponse>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
