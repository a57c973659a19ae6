use serde::{Deserialize, Serialize};

/// A single piece of clothing from the user's closet
///
/// Items are owned and edited by the inventory collaborator; the engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    /// Free-text category as entered by the user (e.g. "T-shirt", "Rain jacket")
    pub category: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub fabric: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl InventoryItem {
    /// Creates an item with the fields the engine actually scores on
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: String::new(),
            category: category.into(),
            color: color.into(),
            size: None,
            fabric: None,
            description: None,
            images: Vec::new(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_fabric(mut self, fabric: impl Into<String>) -> Self {
        self.fabric = Some(fabric.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Lower-cased "category name" text used for keyword matching
    pub fn search_text(&self) -> String {
        format!("{} {}", self.category, self.name).to_lowercase()
    }

    /// Lower-cased fabric, empty when unknown
    pub fn fabric_text(&self) -> String {
        self.fabric.as_deref().unwrap_or_default().to_lowercase()
    }

    /// Stable hash of a closet, independent of item order
    ///
    /// Covers every field, so editing or removing an item changes it.
    pub fn fingerprint(items: &[InventoryItem]) -> String {
        let mut sorted: Vec<&InventoryItem> = items.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut hasher = blake3::Hasher::new();
        for item in sorted {
            // Items always serialize; an empty string still separates entries
            let json = serde_json::to_string(item).unwrap_or_default();
            hasher.update(json.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex()[..16].to_string()
    }
}
