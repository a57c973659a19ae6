use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod feedback;
mod inventory;
mod user_preferences;
mod weather;

pub use feedback::{FeedbackEvent, FeedbackKind};
pub use inventory::InventoryItem;
pub use user_preferences::UserPreferences;
pub use weather::{ProfileKind, Season, TemperatureRange, WeatherProfile, WeatherSnapshot};

/// Functional group an item category maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroup {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Footwear,
    Accessories,
    Other,
}

impl CategoryGroup {
    /// Order in which the selection engine fills an outfit
    pub const SELECTION_ORDER: [CategoryGroup; 6] = [
        CategoryGroup::Tops,
        CategoryGroup::Bottoms,
        CategoryGroup::Dresses,
        CategoryGroup::Outerwear,
        CategoryGroup::Footwear,
        CategoryGroup::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryGroup::Tops => "tops",
            CategoryGroup::Bottoms => "bottoms",
            CategoryGroup::Dresses => "dresses",
            CategoryGroup::Outerwear => "outerwear",
            CategoryGroup::Footwear => "footwear",
            CategoryGroup::Accessories => "accessories",
            CategoryGroup::Other => "other",
        }
    }
}

impl Display for CategoryGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which preference dimensions an item satisfied during scoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFlags {
    pub preferred_color: bool,
    pub preferred_category: bool,
    pub preferred_brand: bool,
    pub weather_aligned: bool,
}

/// An item with its score for one scoring pass
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub item: InventoryItem,
    pub group: CategoryGroup,
    pub score: f64,
    pub matches: MatchFlags,
}

/// Where a suggestion was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Remote,
    LocalFallback,
}

/// An outfit proposal returned to the UI layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suggestion {
    pub items: Vec<InventoryItem>,
    pub message: String,
    pub reason: String,
    pub weather: WeatherSnapshot,
    /// Preference and weather alignment in [0, 0.85]
    pub confidence: f64,
    pub source: SuggestionSource,
    pub generated_at: DateTime<Utc>,
}

impl Suggestion {
    pub fn item_ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }
}

/// Everything needed to compute one suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionRequest {
    pub inventory: Vec<InventoryItem>,
    pub weather: WeatherSnapshot,
    #[serde(default)]
    pub preferences: UserPreferences,
    /// Maximum number of items in the outfit
    #[serde(default)]
    pub max_recommendations: Option<usize>,
    /// Current month (1-12), used to derive the season. Defaults to today.
    #[serde(default)]
    pub month: Option<u32>,
}

impl SuggestionRequest {
    pub fn new(inventory: Vec<InventoryItem>, weather: WeatherSnapshot) -> Self {
        Self {
            inventory,
            weather,
            preferences: UserPreferences::default(),
            max_recommendations: None,
            month: None,
        }
    }

    pub fn with_preferences(mut self, preferences: UserPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = Some(max);
        self
    }

    pub fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }
}
