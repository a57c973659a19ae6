use chrono::Utc;
use rand::Rng;
use std::collections::HashSet;

use crate::{
    models::{
        CategoryGroup, InventoryItem, ScoredCandidate, Suggestion, SuggestionSource,
        UserPreferences, WeatherProfile, WeatherSnapshot,
    },
    services::{
        recency::RecencyRecord,
        scoring::ScoreCalculator,
        selection::{self, MAX_CONFIDENCE},
        weather_profile::profile_for,
    },
};

/// Computes suggestions for one weather snapshot and outfit size
///
/// Runs weather profile, scoring and selection in process, then writes the
/// message and reason.
pub struct LocalStylist<'a> {
    weather: &'a WeatherSnapshot,
    profile: WeatherProfile,
    max_items: usize,
    recent: &'a RecencyRecord,
}

impl<'a> LocalStylist<'a> {
    pub fn new(
        weather: &'a WeatherSnapshot,
        month: u32,
        max_items: usize,
        recent: &'a RecencyRecord,
    ) -> Self {
        Self {
            weather,
            profile: profile_for(weather, month),
            max_items,
            recent,
        }
    }

    pub fn profile(&self) -> &WeatherProfile {
        &self.profile
    }

    /// Preference-aware suggestion
    pub fn suggest<R: Rng + ?Sized>(
        &self,
        inventory: &[InventoryItem],
        preferences: &UserPreferences,
        rng: &mut R,
    ) -> Suggestion {
        let calculator = ScoreCalculator::new(preferences, &self.profile);
        let candidates = calculator.score_all(inventory);
        let selected = selection::select(&candidates, self.max_items, self.recent, rng);

        let personalised = *preferences != UserPreferences::default();
        self.build(&selected, personalised)
    }

    /// Suggestion driven by the weather alone
    pub fn weather_only<R: Rng + ?Sized>(
        &self,
        inventory: &[InventoryItem],
        rng: &mut R,
    ) -> Suggestion {
        self.suggest(inventory, &UserPreferences::default(), rng)
    }

    fn build(&self, selected: &[ScoredCandidate], personalised: bool) -> Suggestion {
        Suggestion {
            items: selected.iter().map(|c| c.item.clone()).collect(),
            message: self.message(selected),
            reason: self.reason(selected, personalised),
            weather: self.weather.clone(),
            confidence: selection::confidence(selected),
            source: SuggestionSource::LocalFallback,
            generated_at: Utc::now(),
        }
    }

    fn message(&self, selected: &[ScoredCandidate]) -> String {
        if selected.is_empty() {
            return format!(
                "{} today, but nothing in your closet suits it right now.",
                self.profile.label
            );
        }

        let names: Vec<&str> = selected.iter().map(|c| c.item.name.as_str()).collect();
        format!("{} today: try your {}.", self.profile.label, join_names(&names))
    }

    fn reason(&self, selected: &[ScoredCandidate], personalised: bool) -> String {
        let mut parts = vec![format!(
            "Picked for {:.0}°C and {} conditions",
            self.weather.temperature,
            self.weather.condition.trim().to_lowercase()
        )];

        let groups: Vec<&str> = CategoryGroup::SELECTION_ORDER
            .iter()
            .filter(|g| selected.iter().any(|c| c.group == **g))
            .map(|g| g.as_str())
            .collect();
        if !groups.is_empty() {
            parts.push(format!("covering {}", groups.join(", ")));
        }

        if personalised {
            let colors = selected.iter().filter(|c| c.matches.preferred_color).count();
            let categories = selected
                .iter()
                .filter(|c| c.matches.preferred_category)
                .count();
            if colors > 0 {
                parts.push(format!("{} in your favourite colours", colors));
            }
            if categories > 0 {
                parts.push(format!("{} from categories you like", categories));
            }
        }

        format!("{}.", parts.join("; "))
    }
}

/// Combines a preference-aware suggestion with a weather-only one
///
/// Items are the union of both, preference-aware items first, without duplicate
/// ids and capped at `max_items`. The higher confidence wins.
pub fn merge(preferred: Suggestion, weather_only: Suggestion, max_items: usize) -> Suggestion {
    let mut seen: HashSet<String> = HashSet::new();
    let items: Vec<InventoryItem> = preferred
        .items
        .iter()
        .chain(weather_only.items.iter())
        .filter(|item| seen.insert(item.id.clone()))
        .take(max_items)
        .cloned()
        .collect();

    let confidence = preferred
        .confidence
        .max(weather_only.confidence)
        .clamp(0.0, MAX_CONFIDENCE);

    tracing::debug!(
        preferred = preferred.items.len(),
        weather_only = weather_only.items.len(),
        merged = items.len(),
        confidence,
        "Merged local suggestions"
    );

    // An empty preference-aware pick carries no useful text
    let text_source = if preferred.items.is_empty() {
        &weather_only
    } else {
        &preferred
    };

    Suggestion {
        items,
        message: text_source.message.clone(),
        reason: text_source.reason.clone(),
        weather: preferred.weather,
        confidence,
        source: SuggestionSource::LocalFallback,
        generated_at: Utc::now(),
    }
}

fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
