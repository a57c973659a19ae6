use crate::models::{
    InventoryItem, MatchFlags, ScoredCandidate, TemperatureRange, UserPreferences, WeatherProfile,
};
use crate::services::classifier::classify;

pub const BASE_SCORE: f64 = 1.0;

const PREFERRED_COLOR: f64 = 4.0;
const AVOIDED_COLOR: f64 = -6.0;
const PREFERRED_CATEGORY: f64 = 4.0;
const AVOIDED_CATEGORY: f64 = -6.0;
const PREFERRED_BRAND: f64 = 2.0;
const WEATHER_KEYWORD: f64 = 3.0;
const WEATHER_AVOIDED_KEYWORD: f64 = -4.0;
const LIGHT_OUTERWEAR_WARM: f64 = 1.0;
const HEAVY_OUTERWEAR_MILD: f64 = -0.5;
const WEATHER_COLOR: f64 = 2.0;
const DARK_COLOR_IN_HEAT: f64 = -3.0;
const FABRIC_MATCH: f64 = 2.5;
const HEAVY_FABRIC_IN_HEAT: f64 = -3.0;
const RAIN_FABRIC: f64 = 2.0;
const RAIN_GEAR: f64 = 2.0;
const OPEN_TOE_IN_RAIN: f64 = -3.0;
const WIND_GEAR: f64 = 1.5;
const STYLE_NOTE: f64 = 1.5;

/// Wind speed above which scarves and jackets earn a bonus
pub const WINDY_SPEED: f64 = 10.0;

const OUTERWEAR_TERMS: &[&str] = &[
    "jacket",
    "coat",
    "hoodie",
    "blazer",
    "parka",
    "windbreaker",
    "cardigan",
];
const HEAVY_FABRICS: &[&str] = &["denim", "wool", "fleece", "cashmere", "leather"];
const HEAVY_TERMS: &[&str] = &["coat", "heavy", "winter", "parka", "puffer"];
const LIGHT_TERMS: &[&str] = &["windbreaker", "cardigan", "cotton", "linen"];
const DARK_COLORS: &[&str] = &["black", "dark", "navy", "brown"];
const BREATHABLE_FABRICS: &[&str] = &["cotton", "linen", "bamboo", "modal"];
const WARM_FABRICS: &[&str] = &["wool", "fleece", "cashmere"];
const RAIN_FABRICS: &[&str] = &["waterproof", "synthetic", "polyester", "nylon", "gore-tex"];
const RAIN_GEAR_TERMS: &[&str] = &["jacket", "coat", "rain", "poncho", "umbrella", "waterproof"];
const OPEN_TOE_TERMS: &[&str] = &["sandal", "open-toe", "open toe", "flip-flop", "flip flop", "slide"];
const WIND_GEAR_TERMS: &[&str] = &["scarf", "jacket"];

fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

fn contains_any_owned(text: &str, terms: &[String]) -> bool {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .any(|t| !t.is_empty() && text.contains(&t))
}

/// Outerwear weight, as far as name, category and fabric reveal it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OuterwearWeight {
    pub heavy: bool,
    pub light: bool,
}

/// Returns `None` for anything that is not outerwear
pub fn outerwear_weight(item: &InventoryItem) -> Option<OuterwearWeight> {
    let text = item.search_text();
    if !contains_any(&text, OUTERWEAR_TERMS) {
        return None;
    }

    let fabric = item.fabric_text();
    Some(OuterwearWeight {
        heavy: contains_any(&fabric, HEAVY_FABRICS) || contains_any(&text, HEAVY_TERMS),
        light: contains_any(&text, LIGHT_TERMS) || contains_any(&fabric, LIGHT_TERMS),
    })
}

/// Outerwear delta for the profile's temperature range
fn outerwear_delta(weight: OuterwearWeight, profile: &WeatherProfile) -> f64 {
    let bonus = profile.outerwear_bonus;
    match profile.temperature_range {
        TemperatureRange::Warm => {
            if weight.heavy && !weight.light {
                bonus
            } else if weight.light {
                LIGHT_OUTERWEAR_WARM
            } else {
                0.0
            }
        }
        TemperatureRange::Hot => bonus,
        TemperatureRange::Cool => {
            if weight.heavy {
                bonus
            } else {
                bonus / 2.0
            }
        }
        TemperatureRange::Mild => {
            if !profile.prefers_light_outerwear {
                bonus
            } else if weight.light {
                bonus
            } else if weight.heavy {
                HEAVY_OUTERWEAR_MILD
            } else {
                0.0
            }
        }
        TemperatureRange::Rainy | TemperatureRange::Neutral => bonus,
    }
}

/// Scores items against one set of preferences and one weather profile
///
/// Every item starts at [`BASE_SCORE`] and collects additive deltas; no rule
/// short-circuits another.
#[derive(Debug, Clone)]
pub struct ScoreCalculator<'a> {
    preferences: &'a UserPreferences,
    profile: &'a WeatherProfile,
    style_tokens: Vec<String>,
}

impl<'a> ScoreCalculator<'a> {
    pub fn new(preferences: &'a UserPreferences, profile: &'a WeatherProfile) -> Self {
        Self {
            preferences,
            profile,
            style_tokens: preferences.style_tokens(),
        }
    }

    /// Scores a single item
    pub fn score(&self, item: &InventoryItem) -> ScoredCandidate {
        let group = classify(&item.category);
        let text = item.search_text();
        let color = item.color.trim().to_lowercase();
        let fabric = item.fabric_text();
        let profile = self.profile;

        let mut score = BASE_SCORE;
        let mut matches = MatchFlags::default();

        // User preferences
        if self.preferences.prefers_color(&color) {
            score += PREFERRED_COLOR;
            matches.preferred_color = true;
        }
        if self.preferences.avoids_color(&color) {
            score += AVOIDED_COLOR;
        }
        if self.preferences.prefers_category(&item.category)
            || self.preferences.prefers_category(group.as_str())
        {
            score += PREFERRED_CATEGORY;
            matches.preferred_category = true;
        }
        if self.preferences.avoids_category(&item.category)
            || self.preferences.avoids_category(group.as_str())
        {
            score += AVOIDED_CATEGORY;
        }
        if self.preferences.prefers_brand(&item.brand) {
            score += PREFERRED_BRAND;
            matches.preferred_brand = true;
        }

        // Weather keywords
        if contains_any_owned(&text, &profile.preferred_keywords) {
            score += WEATHER_KEYWORD;
            matches.weather_aligned = true;
        }
        if contains_any_owned(&text, &profile.avoided_keywords) {
            score += WEATHER_AVOIDED_KEYWORD;
        }

        if let Some(weight) = outerwear_weight(item) {
            score += outerwear_delta(weight, profile);
        }

        // Weather colors
        if !color.is_empty() && contains_any_owned(&color, &profile.preferred_colors) {
            score += WEATHER_COLOR;
        }
        if profile.temperature_range == TemperatureRange::Hot && contains_any(&color, DARK_COLORS) {
            score += DARK_COLOR_IN_HEAT;
        }

        // Fabric
        match profile.temperature_range {
            TemperatureRange::Hot => {
                if contains_any(&fabric, BREATHABLE_FABRICS) {
                    score += FABRIC_MATCH;
                }
                if contains_any(&fabric, WARM_FABRICS) {
                    score += HEAVY_FABRIC_IN_HEAT;
                }
            }
            TemperatureRange::Cool => {
                if contains_any(&fabric, WARM_FABRICS) {
                    score += FABRIC_MATCH;
                }
            }
            TemperatureRange::Rainy => {
                if contains_any(&fabric, RAIN_FABRICS) {
                    score += RAIN_FABRIC;
                }
            }
            _ => {}
        }

        // Rain gear
        if profile.is_rainy() {
            if contains_any(&text, RAIN_GEAR_TERMS) {
                score += RAIN_GEAR;
                matches.weather_aligned = true;
            }
            if contains_any(&text, OPEN_TOE_TERMS) {
                score += OPEN_TOE_IN_RAIN;
            }
        }

        if profile.wind_speed > WINDY_SPEED && contains_any(&text, WIND_GEAR_TERMS) {
            score += WIND_GEAR;
        }

        if !self.style_tokens.is_empty() {
            let haystack = format!(
                "{} {} {}",
                item.name,
                item.description.as_deref().unwrap_or_default(),
                item.category
            )
            .to_lowercase();
            if self.style_tokens.iter().any(|t| haystack.contains(t.as_str())) {
                score += STYLE_NOTE;
            }
        }

        ScoredCandidate {
            item: item.clone(),
            group,
            score,
            matches,
        }
    }

    /// Scores every item of an inventory, preserving order
    pub fn score_all(&self, items: &[InventoryItem]) -> Vec<ScoredCandidate> {
        let scored: Vec<ScoredCandidate> = items.iter().map(|i| self.score(i)).collect();

        tracing::debug!(
            item_count = scored.len(),
            profile = %self.profile.label,
            top_score = scored.iter().map(|c| c.score).fold(f64::NEG_INFINITY, f64::max),
            "Scored inventory"
        );

        scored
    }
}

/// Scores one item; convenience wrapper around [`ScoreCalculator`]
pub fn score_item(
    item: &InventoryItem,
    preferences: &UserPreferences,
    profile: &WeatherProfile,
) -> ScoredCandidate {
    ScoreCalculator::new(preferences, profile).score(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProfileKind, WeatherSnapshot};
    use crate::services::weather_profile::profile_for;

    const JANUARY: u32 = 1;

    fn profile(temperature: f64, condition: &str) -> WeatherProfile {
        profile_for(&WeatherSnapshot::manual(temperature, condition), JANUARY)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_plain_item_in_neutral_weather_scores_base() {
        let neutral = profile_for(&WeatherSnapshot::manual(35.0, "Clear"), 7);
        assert_eq!(neutral.kind, ProfileKind::Neutral);
        let item = InventoryItem::new("1", "Plain Top", "Top", "Green");
        let scored = score_item(&item, &UserPreferences::default(), &neutral);
        assert!(approx(scored.score, BASE_SCORE));
        assert_eq!(scored.matches, MatchFlags::default());
    }

    #[test]
    fn test_preference_deltas_accumulate() {
        let neutral = profile_for(&WeatherSnapshot::manual(35.0, "Clear"), 7);
        let prefs = UserPreferences {
            preferred_colors: vec!["green".to_string()],
            preferred_categories: vec!["tops".to_string()],
            preferred_brands: vec!["Acme".to_string()],
            ..Default::default()
        };
        let item = InventoryItem::new("1", "Plain Top", "Top", "Green").with_brand("ACME");
        let scored = score_item(&item, &prefs, &neutral);
        assert!(approx(scored.score, 1.0 + 4.0 + 4.0 + 2.0));
        assert!(scored.matches.preferred_color);
        assert!(scored.matches.preferred_category);
        assert!(scored.matches.preferred_brand);
        assert!(!scored.matches.weather_aligned);
    }

    #[test]
    fn test_avoided_color_and_category() {
        let neutral = profile_for(&WeatherSnapshot::manual(35.0, "Clear"), 7);
        let prefs = UserPreferences {
            avoided_colors: vec!["orange".to_string()],
            avoided_categories: vec!["shorts".to_string()],
            ..Default::default()
        };
        let item = InventoryItem::new("1", "Cargo", "Shorts", "Orange");
        let scored = score_item(&item, &prefs, &neutral);
        assert!(approx(scored.score, 1.0 - 6.0 - 6.0));
    }

    #[test]
    fn test_tshirt_scores_higher_when_hot_than_cool() {
        let tee = InventoryItem::new("1", "Basic Tee", "T-shirt", "White");
        let prefs = UserPreferences::default();
        let hot = score_item(&tee, &prefs, &profile(31.0, "Clear"));
        let cool = score_item(&tee, &prefs, &profile(15.0, "Clear"));
        assert!(hot.score > cool.score);
        assert!(hot.matches.weather_aligned);
    }

    #[test]
    fn test_wool_jacket_cool_versus_hot() {
        let jacket = InventoryItem::new("1", "Wool Jacket", "Jacket", "Black").with_fabric("Wool");
        let prefs = UserPreferences::default();

        let cool_profile = profile(15.0, "Clear");
        let hot_profile = profile(31.0, "Clear");

        let weight = outerwear_weight(&jacket).unwrap();
        assert!(weight.heavy);
        assert!(outerwear_delta(weight, &cool_profile) > 0.0);
        assert!(outerwear_delta(weight, &hot_profile) < 0.0);

        let cool = score_item(&jacket, &prefs, &cool_profile);
        let hot = score_item(&jacket, &prefs, &hot_profile);
        // keyword +3, outerwear +3, color +2, wool +2.5
        assert!(approx(cool.score, 1.0 + 3.0 + 3.0 + 2.0 + 2.5));
        // avoided keyword -4, outerwear -4, dark color -3, wool -3
        assert!(approx(hot.score, 1.0 - 4.0 - 4.0 - 3.0 - 3.0));
    }

    #[test]
    fn test_outerwear_weight_detection() {
        let windbreaker = InventoryItem::new("1", "Windbreaker", "Jacket", "Blue");
        assert_eq!(
            outerwear_weight(&windbreaker),
            Some(OuterwearWeight { heavy: false, light: true })
        );

        let parka = InventoryItem::new("2", "Winter Parka", "Coat", "Black");
        assert_eq!(
            outerwear_weight(&parka),
            Some(OuterwearWeight { heavy: true, light: false })
        );

        let tee = InventoryItem::new("3", "Tee", "T-shirt", "White");
        assert_eq!(outerwear_weight(&tee), None);
    }

    #[test]
    fn test_warm_profile_penalizes_heavy_and_rewards_light() {
        let warm = profile(26.0, "Clouds");
        assert_eq!(warm.temperature_range, TemperatureRange::Warm);
        let heavy = OuterwearWeight { heavy: true, light: false };
        let light = OuterwearWeight { heavy: false, light: true };
        assert!(approx(outerwear_delta(heavy, &warm), warm.outerwear_bonus));
        assert!(approx(outerwear_delta(light, &warm), LIGHT_OUTERWEAR_WARM));
    }

    #[test]
    fn test_mild_profile_outerwear() {
        let mild = profile(21.0, "Clouds");
        let heavy = OuterwearWeight { heavy: true, light: false };
        let light = OuterwearWeight { heavy: false, light: true };
        assert!(approx(outerwear_delta(light, &mild), mild.outerwear_bonus));
        assert!(approx(outerwear_delta(heavy, &mild), HEAVY_OUTERWEAR_MILD));
    }

    #[test]
    fn test_rain_gear_and_open_toe() {
        let rain = profile_for(&WeatherSnapshot::manual(27.0, "Rain"), 7);
        assert!(rain.is_rainy());
        let prefs = UserPreferences::default();

        let raincoat = InventoryItem::new("1", "Raincoat", "Coat", "Navy").with_fabric("Nylon");
        let scored = score_item(&raincoat, &prefs, &rain);
        assert!(scored.matches.weather_aligned);
        // keyword +3, outerwear +3, color +2, fabric +2, rain gear +2
        assert!(approx(scored.score, 1.0 + 3.0 + 3.0 + 2.0 + 2.0 + 2.0));

        let sandals = InventoryItem::new("2", "Sandals", "Sandals", "Tan");
        let scored = score_item(&sandals, &prefs, &rain);
        // avoided keyword -4, open toe -3
        assert!(approx(scored.score, 1.0 - 4.0 - 3.0));
    }

    #[test]
    fn test_wind_bonus_for_scarf() {
        let neutral = profile_for(&WeatherSnapshot::new(35.0, "Clear", 15.0), 7);
        let scarf = InventoryItem::new("1", "Silk Scarf", "Scarf", "Red");
        let scored = score_item(&scarf, &UserPreferences::default(), &neutral);
        assert!(approx(scored.score, 1.0 + 1.5));

        let calm = profile_for(&WeatherSnapshot::new(35.0, "Clear", 5.0), 7);
        let scored = score_item(&scarf, &UserPreferences::default(), &calm);
        assert!(approx(scored.score, 1.0));
    }

    #[test]
    fn test_style_notes_match_description() {
        let neutral = profile_for(&WeatherSnapshot::manual(35.0, "Clear"), 7);
        let prefs = UserPreferences {
            style_notes: "boho, vintage".to_string(),
            ..Default::default()
        };
        let item = InventoryItem::new("1", "Flowy Top", "Top", "Green")
            .with_description("A vintage find");
        let scored = score_item(&item, &prefs, &neutral);
        assert!(approx(scored.score, 1.0 + 1.5));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let prefs = UserPreferences {
            preferred_colors: vec!["white".to_string()],
            style_notes: "linen".to_string(),
            ..Default::default()
        };
        let hot = profile(31.0, "Clear");
        let item = InventoryItem::new("1", "Linen Shirt", "Shirt", "White").with_fabric("Linen");
        let first = score_item(&item, &prefs, &hot);
        let second = score_item(&item, &prefs, &hot);
        assert_eq!(first, second);
    }
}
