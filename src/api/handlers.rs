use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{FeedbackEvent, Suggestion, SuggestionRequest},
    services::suggestions::FeedbackOutcome,
};

use super::AppState;

/// Body of the feedback endpoint: the event plus the request it refers to
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub event: FeedbackEvent,
    pub request: SuggestionRequest,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Computes an outfit suggestion
pub async fn suggest(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SuggestionRequest>,
) -> AppResult<Json<Suggestion>> {
    tracing::info!(
        request_id = %request_id,
        inventory = request.inventory.len(),
        temperature = request.weather.temperature,
        condition = %request.weather.condition,
        "Processing suggestion request"
    );

    let suggestion = state.suggestions.suggest(&request).await?;

    tracing::info!(
        request_id = %request_id,
        items = suggestion.items.len(),
        source = ?suggestion.source,
        "Suggestion completed"
    );

    Ok(Json(suggestion))
}

/// Records feedback on a suggestion, refreshing it on positive feedback
pub async fn feedback(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(body): Json<FeedbackRequest>,
) -> AppResult<Json<FeedbackOutcome>> {
    tracing::info!(
        request_id = %request_id,
        kind = ?body.event.kind,
        "Processing feedback"
    );

    let outcome = state
        .suggestions
        .handle_feedback(&body.event, &body.request)
        .await?;

    Ok(Json(outcome))
}
