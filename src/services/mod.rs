pub mod classifier;
pub mod feasibility;
pub mod local;
pub mod providers;
pub mod recency;
pub mod scoring;
pub mod selection;
pub mod suggestions;
pub mod weather_profile;

pub use local::LocalStylist;
pub use suggestions::{FeedbackOutcome, SuggestionService, SuggestionSettings};
