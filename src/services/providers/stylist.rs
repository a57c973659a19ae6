use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    services::providers::{StylistProvider, StylistRequest, StylistResponse},
};

#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for `POST {api_url}/v1/outfits/recommend`
#[derive(Clone)]
pub struct HttpStylistProvider {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
}

impl HttpStylistProvider {
    /// Creates a provider whose calls give up after `timeout`
    pub fn new(api_url: String, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/outfits/recommend", self.api_url)
    }
}

/// Maps a transport failure to the error taxonomy
fn transport_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() || error.is_connect() {
        AppError::RemoteTimeout(error.to_string())
    } else {
        AppError::RemoteError(error.to_string())
    }
}

/// Maps a non-success response to the error taxonomy
fn status_error(status: StatusCode, body: &str) -> AppError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let detail = parsed.error.unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::SessionExpired,
        StatusCode::BAD_REQUEST => AppError::InvalidInput(detail),
        StatusCode::UNPROCESSABLE_ENTITY => match parsed.reason.as_deref() {
            Some("insufficient_items") => AppError::InsufficientItems,
            Some("no_valid_combination") => AppError::NoValidCombination,
            _ => AppError::InvalidInput(detail),
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            AppError::RemoteTimeout(format!("Stylist returned status {}", status))
        }
        _ => AppError::RemoteError(format!("Stylist returned status {}: {}", status, detail)),
    }
}

#[async_trait::async_trait]
impl StylistProvider for HttpStylistProvider {
    async fn recommend(&self, request: &StylistRequest) -> AppResult<StylistResponse> {
        let mut builder = self.http_client.post(self.endpoint()).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                body = %body,
                provider = self.name(),
                "Stylist request failed"
            );
            return Err(status_error(status, &body));
        }

        let response_text = response.text().await.map_err(transport_error)?;
        let outfit: StylistResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize stylist response"
            );
            AppError::RemoteError(format!("Failed to parse stylist response: {}", e))
        })?;

        tracing::info!(
            items = outfit.items.len(),
            confidence = outfit.confidence,
            provider = self.name(),
            "Stylist outfit received"
        );

        Ok(outfit)
    }

    fn name(&self) -> &'static str {
        "stylist-http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = HttpStylistProvider::new(
            "http://stylist.local/".to_string(),
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "http://stylist.local/v1/outfits/recommend");
    }

    #[test]
    fn test_status_error_session() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            AppError::SessionExpired
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "nope"),
            AppError::SessionExpired
        ));
    }

    #[test]
    fn test_status_error_feasibility_reasons() {
        assert!(matches!(
            status_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                r#"{"reason": "insufficient_items"}"#
            ),
            AppError::InsufficientItems
        ));
        assert!(matches!(
            status_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                r#"{"reason": "no_valid_combination", "error": "need a bottom"}"#
            ),
            AppError::NoValidCombination
        ));
    }

    #[test]
    fn test_status_error_validation_keeps_message() {
        match status_error(StatusCode::BAD_REQUEST, r#"{"error": "weather missing"}"#) {
            AppError::InvalidInput(msg) => assert_eq!(msg, "weather missing"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_error_gateway_timeout_is_transient() {
        assert!(status_error(StatusCode::GATEWAY_TIMEOUT, "").is_transient());
    }

    #[test]
    fn test_status_error_server_error_falls_back() {
        let error = status_error(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert!(matches!(error, AppError::RemoteError(_)));
        assert!(!error.is_definitive());
    }

    #[tokio::test]
    async fn test_unreachable_stylist_is_a_timeout() {
        // Port 9 (discard) on localhost is closed in test environments
        let provider = HttpStylistProvider::new(
            "http://127.0.0.1:9".to_string(),
            None,
            Duration::from_millis(500),
        )
        .unwrap();
        let request = StylistRequest {
            inventory: vec![],
            weather: crate::models::WeatherSnapshot::manual(20.0, "Clear"),
            preferences: Default::default(),
            max_recommendations: 4,
        };
        let error = provider.recommend(&request).await.unwrap_err();
        assert!(error.is_transient(), "unexpected error: {:?}", error);
    }
}
