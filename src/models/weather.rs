use serde::{Deserialize, Serialize};

/// Current weather as reported by the weather collaborator or entered manually
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in °C
    pub temperature: f64,
    /// Primary condition label (e.g. "Clear", "Rain")
    pub condition: String,
    #[serde(default)]
    pub wind_speed: f64,
}

impl WeatherSnapshot {
    pub fn new(temperature: f64, condition: impl Into<String>, wind_speed: f64) -> Self {
        Self {
            temperature,
            condition: condition.into(),
            wind_speed,
        }
    }

    /// Weather entered through the manual override form, which has no wind reading
    pub fn manual(temperature: f64, condition: impl Into<String>) -> Self {
        Self::new(temperature, condition, 0.0)
    }
}

/// Two-season tropical calendar
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Dry,
    Wet,
}

impl Season {
    /// Months 11 through 4 are dry, the rest wet
    pub fn from_month(month: u32) -> Self {
        match month {
            11 | 12 | 1..=4 => Season::Dry,
            _ => Season::Wet,
        }
    }
}

/// Tag selecting the outerwear scoring rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureRange {
    Hot,
    Warm,
    Mild,
    Cool,
    Rainy,
    Neutral,
}

/// Which rule of the profile table produced a profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Rain,
    Hot,
    WarmDry,
    Warm,
    Mild,
    Cool,
    Neutral,
}

/// Derived clothing guidance for a weather snapshot; never persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherProfile {
    pub kind: ProfileKind,
    pub label: String,
    pub preferred_keywords: Vec<String>,
    pub avoided_keywords: Vec<String>,
    pub preferred_colors: Vec<String>,
    pub temperature_range: TemperatureRange,
    /// Score adjustment applied to outerwear (negative in hot weather)
    pub outerwear_bonus: f64,
    pub prefers_light_outerwear: bool,
    pub wind_speed: f64,
}

impl WeatherProfile {
    pub fn is_rainy(&self) -> bool {
        self.temperature_range == TemperatureRange::Rainy
    }
}
