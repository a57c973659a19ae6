use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Inventory has fewer than 2 items")]
    InsufficientItems,

    #[error("Inventory cannot form an outfit (needs a dress or a top and a bottom)")]
    NoValidCombination,

    #[error("Stylist service timed out: {0}")]
    RemoteTimeout(String),

    #[error("Stylist service error: {0}")]
    RemoteError(String),

    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable reason string reported alongside every error
    pub fn reason(&self) -> &'static str {
        match self {
            AppError::InsufficientItems => "insufficient_items",
            AppError::NoValidCombination => "no_valid_combination",
            AppError::RemoteTimeout(_) => "remote_timeout",
            AppError::RemoteError(_) => "remote_error",
            AppError::SessionExpired => "session_expired",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Cache(_) => "cache_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Message suitable for showing to the end user
    pub fn user_message(&self) -> String {
        match self {
            AppError::InsufficientItems => {
                "Add at least two items to your closet to get outfit suggestions.".to_string()
            }
            AppError::NoValidCombination => {
                "Your closet needs a dress, or a top and a bottom, to build an outfit."
                    .to_string()
            }
            AppError::RemoteTimeout(_) => {
                "Still waiting for the stylist. Please hang tight and try again shortly."
                    .to_string()
            }
            AppError::RemoteError(_) => {
                "The stylist is unavailable right now, showing a local suggestion.".to_string()
            }
            AppError::SessionExpired => "Your session has expired. Please sign in again.".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Cache(_) | AppError::Internal(_) => {
                "Something went wrong while building your outfit.".to_string()
            }
        }
    }

    /// Transient failures that are worth another attempt against the stylist service
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::RemoteTimeout(_))
    }

    /// Errors from the stylist service that must reach the caller unchanged
    pub fn is_definitive(&self) -> bool {
        matches!(
            self,
            AppError::InsufficientItems
                | AppError::NoValidCombination
                | AppError::SessionExpired
                | AppError::InvalidInput(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InsufficientItems | AppError::NoValidCombination => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::SessionExpired => StatusCode::UNAUTHORIZED,
            AppError::RemoteTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::RemoteError(_) => StatusCode::BAD_GATEWAY,
            AppError::Cache(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, reason = self.reason(), "Request failed");
        }

        let body = Json(json!({
            "error": self.user_message(),
            "reason": self.reason(),
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(AppError::InsufficientItems.reason(), "insufficient_items");
        assert_eq!(AppError::NoValidCombination.reason(), "no_valid_combination");
        assert_eq!(AppError::RemoteTimeout("slow".into()).reason(), "remote_timeout");
        assert_eq!(AppError::RemoteError("boom".into()).reason(), "remote_error");
        assert_eq!(AppError::SessionExpired.reason(), "session_expired");
    }

    #[test]
    fn test_error_classification() {
        assert!(AppError::RemoteTimeout("slow".into()).is_transient());
        assert!(!AppError::RemoteError("boom".into()).is_transient());
        assert!(AppError::NoValidCombination.is_definitive());
        assert!(AppError::SessionExpired.is_definitive());
        assert!(!AppError::RemoteError("boom".into()).is_definitive());
        assert!(!AppError::RemoteTimeout("slow".into()).is_definitive());
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::InsufficientItems.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = AppError::SessionExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AppError::RemoteTimeout("slow".into()).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
