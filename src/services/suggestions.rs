use chrono::{Datelike, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{
    cached,
    config::Config,
    db::{CacheKey, SuggestionCache},
    error::{AppError, AppResult},
    models::{
        FeedbackEvent, FeedbackKind, InventoryItem, Suggestion, SuggestionRequest,
        SuggestionSource,
    },
    services::{
        feasibility::check_feasibility,
        local::{self, LocalStylist},
        providers::{StylistProvider, StylistRequest, StylistResponse},
        recency::{RecencyRecord, RecencyStore},
        selection::{self, MAX_CONFIDENCE},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    RequestingRemote,
    Retrying,
    LocalFallback,
    Done,
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::Idle => "idle",
            State::RequestingRemote => "requesting_remote",
            State::Retrying => "retrying",
            State::LocalFallback => "local_fallback",
            State::Done => "done",
        };
        write!(f, "{}", name)
    }
}

fn transition(from: State, to: State) -> State {
    tracing::debug!(from = %from, to = %to, "Suggestion state transition");
    to
}

/// Tunables for the orchestrator
#[derive(Debug, Clone)]
pub struct SuggestionSettings {
    pub cache_ttl_secs: u64,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub default_max_recommendations: usize,
    pub selection_seed: Option<u64>,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SuggestionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cache_ttl_secs: config.cache_ttl_secs,
            max_retries: config.remote_max_retries,
            retry_delay: config.retry_delay(),
            default_max_recommendations: config.default_max_recommendations,
            selection_seed: config.selection_seed,
        }
    }
}

/// Result of handling a feedback event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedbackOutcome {
    pub kind: FeedbackKind,
    pub acknowledged: bool,
    /// Fresh suggestion, present only for feedback that asks for one
    pub refreshed: Option<Suggestion>,
}

/// Runs one request through the cache, the remote stylist and the local fallback
///
/// ```text
/// Idle -> RequestingRemote -> Retrying -> LocalFallback -> Done
/// ```
pub struct SuggestionService {
    provider: Option<Arc<dyn StylistProvider>>,
    cache: Arc<dyn SuggestionCache>,
    recency: Arc<dyn RecencyStore>,
    rng: Mutex<StdRng>,
    settings: SuggestionSettings,
}

impl SuggestionService {
    /// Creates the orchestrator. Without a provider every request is answered locally.
    pub fn new(
        provider: Option<Arc<dyn StylistProvider>>,
        cache: Arc<dyn SuggestionCache>,
        recency: Arc<dyn RecencyStore>,
        settings: SuggestionSettings,
    ) -> Self {
        let rng = match settings.selection_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            provider,
            cache,
            recency,
            rng: Mutex::new(rng),
            settings,
        }
    }

    /// Produces an outfit for the request
    ///
    /// Feasibility is checked before anything else. Suggestions are cached per
    /// (temperature, condition, preferences, outfit size); errors are never cached.
    #[tracing::instrument(skip_all, fields(items = request.inventory.len()))]
    pub async fn suggest(&self, request: &SuggestionRequest) -> AppResult<Suggestion> {
        let max_items = self.max_items(request)?;
        let month = month_of(request)?;

        check_feasibility(&request.inventory)?;

        let key = CacheKey::suggestion(
            &request.weather,
            &request.preferences,
            &request.inventory,
            max_items,
        );
        cached!(
            self.cache,
            key,
            self.settings.cache_ttl_secs,
            self.compute(request, max_items, month)
        )
    }

    /// Handles feedback on a shown suggestion
    ///
    /// Positive feedback drops the cached suggestion and computes a new one.
    #[tracing::instrument(skip_all, fields(kind = ?event.kind))]
    pub async fn handle_feedback(
        &self,
        event: &FeedbackEvent,
        request: &SuggestionRequest,
    ) -> AppResult<FeedbackOutcome> {
        tracing::info!(
            kind = ?event.kind,
            items = event.item_ids.len(),
            at = %event.at,
            "Feedback received"
        );

        if !event.kind.triggers_refresh() {
            return Ok(FeedbackOutcome {
                kind: event.kind,
                acknowledged: true,
                refreshed: None,
            });
        }

        let max_items = self.max_items(request)?;
        let key = CacheKey::suggestion(
            &request.weather,
            &request.preferences,
            &request.inventory,
            max_items,
        );
        self.cache.invalidate(&key).await?;

        let refreshed = self.suggest(request).await?;

        Ok(FeedbackOutcome {
            kind: event.kind,
            acknowledged: true,
            refreshed: Some(refreshed),
        })
    }

    fn max_items(&self, request: &SuggestionRequest) -> AppResult<usize> {
        match request.max_recommendations {
            Some(0) => Err(AppError::InvalidInput(
                "max_recommendations must be at least 1".to_string(),
            )),
            Some(n) => Ok(n),
            None => Ok(self.settings.default_max_recommendations),
        }
    }

    async fn compute(
        &self,
        request: &SuggestionRequest,
        max_items: usize,
        month: u32,
    ) -> AppResult<Suggestion> {
        let mut state = State::Idle;

        let suggestion = match &self.provider {
            Some(provider) => {
                state = transition(state, State::RequestingRemote);
                let remote = self
                    .request_remote(provider.as_ref(), request, max_items, &mut state)
                    .await;
                match remote {
                    Ok(suggestion) => suggestion,
                    Err(e) if e.is_definitive() || e.is_transient() => {
                        transition(state, State::Done);
                        return Err(e);
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            provider = provider.name(),
                            "Stylist failed, falling back to local suggestion"
                        );
                        state = transition(state, State::LocalFallback);
                        self.local_fallback(request, max_items, month).await?
                    }
                }
            }
            None => {
                state = transition(state, State::LocalFallback);
                self.local_fallback(request, max_items, month).await?
            }
        };

        transition(state, State::Done);

        let ids = suggestion.item_ids();
        if let Err(e) = selection::remember(self.recency.as_ref(), &ids, Utc::now()).await {
            tracing::warn!(error = %e, store = self.recency.name(), "Failed to record shown items");
        }

        tracing::info!(
            items = suggestion.items.len(),
            confidence = suggestion.confidence,
            source = ?suggestion.source,
            "Suggestion ready"
        );

        Ok(suggestion)
    }

    /// Calls the stylist, retrying timeouts with a fixed pause
    async fn request_remote(
        &self,
        provider: &dyn StylistProvider,
        request: &SuggestionRequest,
        max_items: usize,
        state: &mut State,
    ) -> AppResult<Suggestion> {
        let stylist_request = StylistRequest {
            inventory: request.inventory.clone(),
            weather: request.weather.clone(),
            preferences: request.preferences.clone(),
            max_recommendations: max_items,
        };

        let mut attempt = 0u32;
        loop {
            match provider.recommend(&stylist_request).await {
                Ok(response) => return from_remote(response, request, max_items),
                Err(e) if e.is_transient() && attempt < self.settings.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_retries = self.settings.max_retries,
                        provider = provider.name(),
                        "Stylist timed out, retrying"
                    );
                    *state = transition(*state, State::Retrying);
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn local_fallback(
        &self,
        request: &SuggestionRequest,
        max_items: usize,
        month: u32,
    ) -> AppResult<Suggestion> {
        let recent = match self.recency.load().await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    store = self.recency.name(),
                    "Failed to load recency memory, selecting without it"
                );
                RecencyRecord::new()
            }
        };
        let stylist = LocalStylist::new(&request.weather, month, max_items, &recent);

        let (preferred, weather_only) = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let preferred = stylist.suggest(&request.inventory, &request.preferences, &mut *rng);
            let weather_only = stylist.weather_only(&request.inventory, &mut *rng);
            (preferred, weather_only)
        };

        Ok(local::merge(preferred, weather_only, max_items))
    }
}

fn month_of(request: &SuggestionRequest) -> AppResult<u32> {
    match request.month {
        Some(month) if (1..=12).contains(&month) => Ok(month),
        Some(month) => Err(AppError::InvalidInput(format!(
            "month must be between 1 and 12, got {}",
            month
        ))),
        None => Ok(Utc::now().month()),
    }
}

/// Resolves the stylist's item ids against the submitted inventory
///
/// Unknown and repeated ids are dropped and the list is trimmed to `max_items`.
/// An outfit with no usable item counts as a remote failure.
fn from_remote(
    response: StylistResponse,
    request: &SuggestionRequest,
    max_items: usize,
) -> AppResult<Suggestion> {
    let mut seen: HashSet<&str> = HashSet::new();
    let items: Vec<InventoryItem> = response
        .items
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| request.inventory.iter().find(|item| item.id == id.as_str()))
        .take(max_items)
        .cloned()
        .collect();

    if items.is_empty() {
        return Err(AppError::RemoteError(
            "Stylist returned no items from the inventory".to_string(),
        ));
    }

    if items.len() < response.items.len() {
        tracing::debug!(
            returned = response.items.len(),
            kept = items.len(),
            "Trimmed stylist outfit"
        );
    }

    Ok(Suggestion {
        items,
        message: response.message,
        reason: response.reason,
        weather: request.weather.clone(),
        confidence: response.confidence.clamp(0.0, MAX_CONFIDENCE),
        source: SuggestionSource::Remote,
        generated_at: Utc::now(),
    })
}
