use serde::{Deserialize, Serialize};

/// User style preferences, saved explicitly by the user through the preferences collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserPreferences {
    #[serde(default)]
    pub preferred_colors: Vec<String>,
    #[serde(default)]
    pub preferred_categories: Vec<String>,
    #[serde(default)]
    pub preferred_brands: Vec<String>,
    #[serde(default)]
    pub avoided_colors: Vec<String>,
    #[serde(default)]
    pub avoided_categories: Vec<String>,
    /// Free-text notes such as "minimal, linen, earth tones"
    #[serde(default)]
    pub style_notes: String,
    #[serde(default)]
    pub preferred_occasions: Vec<String>,
}

fn contains_ignore_case(values: &[String], needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && values.iter().any(|v| v.trim().eq_ignore_ascii_case(needle))
}

fn normalized(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

impl UserPreferences {
    /// Creates empty user preferences
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefers_color(&self, color: &str) -> bool {
        contains_ignore_case(&self.preferred_colors, color)
    }

    pub fn avoids_color(&self, color: &str) -> bool {
        contains_ignore_case(&self.avoided_colors, color)
    }

    pub fn prefers_category(&self, category: &str) -> bool {
        contains_ignore_case(&self.preferred_categories, category)
    }

    pub fn avoids_category(&self, category: &str) -> bool {
        contains_ignore_case(&self.avoided_categories, category)
    }

    pub fn prefers_brand(&self, brand: &str) -> bool {
        contains_ignore_case(&self.preferred_brands, brand)
    }

    /// Lower-cased style-note tokens, split on whitespace and commas
    ///
    /// Tokens shorter than three characters ("a", "of") are dropped since they
    /// would match nearly every item.
    pub fn style_tokens(&self) -> Vec<String> {
        self.style_notes
            .split(|c: char| c.is_whitespace() || c == ',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| t.chars().count() >= 3)
            .collect()
    }

    /// Stable hash of the preferences, independent of list order and letter case
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::json!({
            "preferred_colors": normalized(&self.preferred_colors),
            "preferred_categories": normalized(&self.preferred_categories),
            "preferred_brands": normalized(&self.preferred_brands),
            "avoided_colors": normalized(&self.avoided_colors),
            "avoided_categories": normalized(&self.avoided_categories),
            "style_notes": self.style_notes.trim().to_lowercase(),
            "preferred_occasions": normalized(&self.preferred_occasions),
        });
        let hash = blake3::hash(canonical.to_string().as_bytes());
        hash.to_hex()[..16].to_string()
    }
}
