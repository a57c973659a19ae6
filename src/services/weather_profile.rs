use crate::models::{ProfileKind, Season, TemperatureRange, WeatherProfile, WeatherSnapshot};

const PRECIPITATION_TERMS: &[&str] = &["rain", "drizzle", "shower", "thunder", "storm"];
const HEAT_TERMS: &[&str] = &["clear", "sunny", "hot", "heat"];
const WIND_TERMS: &[&str] = &["wind", "gust", "breez", "squall"];

/// Dry-season heat under any sky
const HOT_MIN: f64 = 30.0;
/// Dry-season heat under a clear or sunny sky
const CLEAR_SKY_HEAT_MIN: f64 = 28.0;

/// Inputs the rule predicates look at
#[derive(Debug, Clone, Copy)]
pub struct WeatherConditions<'a> {
    pub temperature: f64,
    pub condition: &'a str,
    pub season: Season,
}

impl WeatherConditions<'_> {
    fn condition_has(&self, terms: &[&str]) -> bool {
        let condition = self.condition.to_lowercase();
        terms.iter().any(|t| condition.contains(t))
    }

    pub fn is_precipitating(&self) -> bool {
        self.condition_has(PRECIPITATION_TERMS)
    }

    pub fn is_hot_or_clear(&self) -> bool {
        self.condition_has(HEAT_TERMS)
    }

    pub fn is_windy(&self) -> bool {
        self.condition_has(WIND_TERMS)
    }

    fn in_range(&self, low: f64, high: f64) -> bool {
        self.temperature >= low && self.temperature < high
    }
}

type Predicate = fn(&WeatherConditions<'_>) -> bool;
type Builder = fn(&WeatherConditions<'_>) -> WeatherProfile;

/// Ordered profile rules; the first match wins
///
/// Rain comes before every temperature rule. Rain below 24 °C falls through to
/// the temperature rules.
const PROFILE_RULES: &[(Predicate, Builder)] = &[
    (is_rain, rain_profile),
    (is_hot, hot_profile),
    (is_warm_dry, warm_dry_profile),
    (is_warm, warm_fallback_profile),
    (is_mild, mild_profile),
    (is_cool, cool_profile),
];

fn is_rain(w: &WeatherConditions<'_>) -> bool {
    (w.season == Season::Wet || w.is_precipitating())
        && w.temperature >= 24.0
        && w.temperature <= 32.0
}

fn is_hot(w: &WeatherConditions<'_>) -> bool {
    w.season == Season::Dry
        && (w.temperature >= HOT_MIN
            || (w.is_hot_or_clear() && w.temperature >= CLEAR_SKY_HEAT_MIN))
}

fn is_warm_dry(w: &WeatherConditions<'_>) -> bool {
    w.season == Season::Dry && w.in_range(24.0, 30.0)
}

fn is_warm(w: &WeatherConditions<'_>) -> bool {
    w.in_range(24.0, 30.0)
}

fn is_mild(w: &WeatherConditions<'_>) -> bool {
    w.in_range(20.0, 24.0)
}

fn is_cool(w: &WeatherConditions<'_>) -> bool {
    w.temperature < 20.0
}

/// Derives the weather profile for a snapshot in the given month (1-12)
pub fn profile_for(weather: &WeatherSnapshot, month: u32) -> WeatherProfile {
    let conditions = WeatherConditions {
        temperature: weather.temperature,
        condition: &weather.condition,
        season: Season::from_month(month),
    };

    let mut profile = PROFILE_RULES
        .iter()
        .find(|(applies, _)| applies(&conditions))
        .map(|(_, build)| build(&conditions))
        .unwrap_or_else(neutral_profile);

    profile.wind_speed = weather.wind_speed;

    tracing::debug!(
        temperature = weather.temperature,
        condition = %weather.condition,
        season = ?conditions.season,
        profile = ?profile.kind,
        "Selected weather profile"
    );

    profile
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn rain_profile(_: &WeatherConditions<'_>) -> WeatherProfile {
    WeatherProfile {
        kind: ProfileKind::Rain,
        label: "Rainy".to_string(),
        preferred_keywords: words(&[
            "jacket",
            "long sleeve",
            "boot",
            "waterproof",
            "raincoat",
            "windbreaker",
        ]),
        avoided_keywords: words(&["sandal", "shorts", "skirt", "dress", "white", "beige", "cream"]),
        preferred_colors: words(&["black", "navy", "gray", "charcoal", "dark green", "brown"]),
        temperature_range: TemperatureRange::Rainy,
        outerwear_bonus: 3.0,
        prefers_light_outerwear: false,
        wind_speed: 0.0,
    }
}

fn hot_profile(_: &WeatherConditions<'_>) -> WeatherProfile {
    WeatherProfile {
        kind: ProfileKind::Hot,
        label: "Hot & Sunny".to_string(),
        preferred_keywords: words(&[
            "t-shirt",
            "tank",
            "shorts",
            "linen",
            "sandal",
            "skirt",
            "sleeveless",
            "dress",
        ]),
        avoided_keywords: words(&[
            "sweater",
            "hoodie",
            "coat",
            "jacket",
            "wool",
            "fleece",
            "boot",
            "turtleneck",
        ]),
        preferred_colors: words(&["white", "beige", "cream", "light blue", "pastel", "yellow"]),
        temperature_range: TemperatureRange::Hot,
        outerwear_bonus: -4.0,
        prefers_light_outerwear: true,
        wind_speed: 0.0,
    }
}

fn warm_dry_profile(_: &WeatherConditions<'_>) -> WeatherProfile {
    warm_profile(ProfileKind::WarmDry, "Warm & Dry")
}

fn warm_fallback_profile(_: &WeatherConditions<'_>) -> WeatherProfile {
    warm_profile(ProfileKind::Warm, "Warm")
}

fn warm_profile(kind: ProfileKind, label: &str) -> WeatherProfile {
    WeatherProfile {
        kind,
        label: label.to_string(),
        preferred_keywords: words(&["t-shirt", "shorts", "linen", "polo", "skirt", "sneaker", "dress"]),
        avoided_keywords: words(&["sweater", "coat", "wool", "fleece", "turtleneck"]),
        preferred_colors: words(&["white", "beige", "light blue", "khaki", "pastel"]),
        temperature_range: TemperatureRange::Warm,
        outerwear_bonus: -2.0,
        prefers_light_outerwear: true,
        wind_speed: 0.0,
    }
}

fn mild_profile(w: &WeatherConditions<'_>) -> WeatherProfile {
    let mut profile = WeatherProfile {
        kind: ProfileKind::Mild,
        label: "Mild".to_string(),
        preferred_keywords: words(&["long sleeve", "chino", "jean", "cardigan", "sneaker"]),
        avoided_keywords: Vec::new(),
        preferred_colors: words(&["beige", "gray", "navy", "white", "olive"]),
        temperature_range: TemperatureRange::Mild,
        outerwear_bonus: 1.0,
        prefers_light_outerwear: true,
        wind_speed: 0.0,
    };

    if w.is_windy() {
        profile.label = "Mild & Breezy".to_string();
        profile
            .preferred_keywords
            .extend(words(&["jacket", "windbreaker"]));
        profile.outerwear_bonus = 2.0;
    }

    profile
}

fn cool_profile(_: &WeatherConditions<'_>) -> WeatherProfile {
    WeatherProfile {
        kind: ProfileKind::Cool,
        label: "Cool".to_string(),
        preferred_keywords: words(&[
            "jacket",
            "coat",
            "sweater",
            "hoodie",
            "boot",
            "long sleeve",
            "jean",
        ]),
        avoided_keywords: words(&["sandal", "tank", "shorts", "sleeveless"]),
        preferred_colors: words(&["black", "navy", "brown", "burgundy", "gray", "dark green"]),
        temperature_range: TemperatureRange::Cool,
        outerwear_bonus: 3.0,
        prefers_light_outerwear: false,
        wind_speed: 0.0,
    }
}

fn neutral_profile() -> WeatherProfile {
    WeatherProfile {
        kind: ProfileKind::Neutral,
        label: "Comfortable".to_string(),
        preferred_keywords: Vec::new(),
        avoided_keywords: Vec::new(),
        preferred_colors: Vec::new(),
        temperature_range: TemperatureRange::Neutral,
        outerwear_bonus: 0.0,
        prefers_light_outerwear: false,
        wind_speed: 0.0,
    }
}
