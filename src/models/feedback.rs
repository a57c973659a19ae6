use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reaction a user can give to a suggested outfit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Liked,
    WoreThis,
    NotForMe,
    Saved,
    Shared,
}

impl FeedbackKind {
    /// Positive reactions ask for a fresh suggestion
    pub fn triggers_refresh(&self) -> bool {
        matches!(self, FeedbackKind::Liked | FeedbackKind::WoreThis)
    }
}

/// Feedback forwarded to the analytics collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackEvent {
    pub kind: FeedbackKind,
    #[serde(default)]
    pub item_ids: Vec<String>,
    #[serde(default = "Utc::now")]
    pub at: DateTime<Utc>,
}

impl FeedbackEvent {
    pub fn new(kind: FeedbackKind, item_ids: Vec<String>) -> Self {
        Self {
            kind,
            item_ids,
            at: Utc::now(),
        }
    }
}
