// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP implementation of [`AnalysisService`]
//!
//! Talks to the review analysis backend (`/api/products`, `/api/stats`,
//! `/api/analyze`, `/api/detect-fake` and the `/` liveness route). Requests
//! are never retried; every failure is reported once through [`ApiError`].

use std::time::{Duration, Instant};

use api_client::{
    AnalysisResult, AnalysisService, ApiError, DashboardStats, DetectionResult, HealthStatus,
};
use reqwest::{
    Client, RequestBuilder, StatusCode,
    header::{ACCEPT, HeaderName},
};
use serde::de::DeserializeOwned;
use shared_types::NonEmptyString;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{Span, debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::wire::{
    AnalyzePayload, AnalyzeRequest, DetectPayload, DetectRequest, Envelope, ErrorBody, Liveness,
    ProductsPayload, StatsPayload,
};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Backend address used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Longest slice of a non-JSON error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://localhost:5000`
    pub base_url: Url,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            // Static URL, verified by the `client_creation_success` test
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default backend URL is valid"),
            timeout_seconds: 30,
            health_check_timeout_seconds: 5,
            user_agent: concat!("review-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Errors specific to the backend client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum BackendError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered with a non-2xx status
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Backend answered 2xx with `success: false`
    #[error("Backend rejected the request: {message}")]
    Rejected { message: String },

    /// Client configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request did not complete in time
    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },
}

impl From<BackendError> for ApiError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Http(error) if error.is_decode() => ApiError::decode(error),
            BackendError::Http(error) => ApiError::transport(error),
            BackendError::Json(error) => ApiError::decode(error),
            BackendError::Status { status, message } => ApiError::server(Some(status), message),
            BackendError::Rejected { message } => ApiError::server(None, message),
            BackendError::Config(message) => ApiError::transport(message),
            BackendError::Timeout { seconds } => ApiError::Timeout {
                timeout_seconds: seconds,
            },
        }
    }
}

/// Review analysis backend reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    client: Client,
    base_url: Url,
    config: BackendConfig,
}

impl HttpAnalysisService {
    /// Create a new backend client
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s), a timeout is zero, or
    /// the HTTP client cannot be built
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        if !matches!(config.base_url.scheme(), "http" | "https") {
            return Err(BackendError::Config(format!(
                "Base URL must be http or https, got '{}'",
                config.base_url
            )));
        }

        if config.timeout_seconds == 0 || config.health_check_timeout_seconds == 0 {
            return Err(BackendError::Config(
                "Timeouts must be at least one second".to_string(),
            ));
        }

        // Joining relative paths replaces the last segment unless the base ends with '/'
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(BackendError::Http)?;

        info!(
            base_url = %base_url,
            timeout_seconds = config.timeout_seconds,
            "created review backend client"
        );

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Configuration this client was built with
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::Config(format!("Invalid endpoint '{path}': {e}")))
    }

    /// Send a request and decode the enveloped payload
    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &'static str,
    ) -> Result<T, BackendError> {
        let request_id = Uuid::new_v4();
        Span::current().record("request_id", request_id.to_string());

        let request = request
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());

        let start_time = Instant::now();
        let response = timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| BackendError::Timeout {
            seconds: self.config.timeout_seconds,
        })?
        .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        debug!(
            %request_id,
            endpoint,
            status = status.as_u16(),
            duration_ms = start_time.elapsed().as_millis(),
            "backend request completed"
        );

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(
                %request_id,
                endpoint,
                status = status.as_u16(),
                error = %message,
                "backend returned an error status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if envelope.success == Some(false) {
            let message = envelope
                .error
                .unwrap_or_else(|| "request was not successful".to_string());
            warn!(%request_id, endpoint, error = %message, "backend reported failure");
            return Err(BackendError::Rejected { message });
        }

        Ok(envelope.payload)
    }

    fn request_error(&self, error: reqwest::Error) -> BackendError {
        if error.is_timeout() {
            BackendError::Timeout {
                seconds: self.config.timeout_seconds,
            }
        } else {
            BackendError::Http(error)
        }
    }
}

/// Extract a message from a non-2xx body, preferring its `error` field
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody { error: Some(error) }) = serde_json::from_str::<ErrorBody>(body)
        && !error.trim().is_empty()
    {
        return error;
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

impl AnalysisService for HttpAnalysisService {
    #[instrument(skip(self), fields(service = "review-backend"))]
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint("")?;
        debug!(%url, "performing health check on review backend");

        let request = self.client.get(url).header(ACCEPT, "application/json");

        let start_time = Instant::now();
        let response = timeout(
            Duration::from_secs(self.config.health_check_timeout_seconds),
            request.send(),
        )
        .await
        .map_err(|_| BackendError::Timeout {
            seconds: self.config.health_check_timeout_seconds,
        })?
        .map_err(|e| self.request_error(e))?;

        let response_time = start_time.elapsed();
        let status = response.status();

        if !status.is_success() {
            warn!("review backend health check failed with status: {}", status);
            return Ok(HealthStatus::Down {
                reason: format!("API returned status {}", status.as_u16()),
            });
        }

        let liveness: Liveness = response.json().await.unwrap_or_default();
        let health = HealthStatus::from_liveness(liveness.status.as_deref());
        info!(
            "review backend health check answered in {:?}: {}",
            response_time,
            health.description()
        );
        Ok(health)
    }

    #[instrument(skip(self), fields(request_id))]
    async fn list_products(&self) -> Result<Vec<String>, ApiError> {
        let request = self.client.get(self.endpoint("api/products")?);
        let payload: ProductsPayload = self.call(request, "products").await?;
        payload.into_products()
    }

    #[instrument(skip(self), fields(request_id))]
    async fn get_stats(&self) -> Result<DashboardStats, ApiError> {
        let request = self.client.get(self.endpoint("api/stats")?);
        let payload: StatsPayload = self.call(request, "stats").await?;
        payload.into_stats()
    }

    #[instrument(skip(self), fields(product = %product_name, request_id))]
    async fn analyze_product(
        &self,
        product_name: &NonEmptyString,
    ) -> Result<AnalysisResult, ApiError> {
        let request = self
            .client
            .post(self.endpoint("api/analyze")?)
            .json(&AnalyzeRequest {
                product_name: product_name.as_str(),
            });
        let payload: AnalyzePayload = self.call(request, "analyze").await?;
        payload.into_result(product_name.as_str())
    }

    #[instrument(skip(self, review_text), fields(text_length = review_text.as_str().len(), request_id))]
    async fn detect_fake(&self, review_text: &NonEmptyString) -> Result<DetectionResult, ApiError> {
        let request = self
            .client
            .post(self.endpoint("api/detect-fake")?)
            .json(&DetectRequest {
                review_text: review_text.as_str(),
            });
        let payload: DetectPayload = self.call(request, "detect-fake").await?;
        payload.into_result(review_text.as_str())
    }

    fn name(&self) -> &'static str {
        "review-backend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation_success() {
        let client = HttpAnalysisService::new(BackendConfig::default()).unwrap();
        assert_eq!(client.base_url.as_str(), "http://localhost:5000/");
        assert_eq!(client.name(), "review-backend");
    }

    #[test]
    fn client_rejects_non_http_scheme() {
        let config = BackendConfig {
            base_url: Url::parse("ftp://localhost/").unwrap(),
            ..Default::default()
        };
        assert!(matches!(
            HttpAnalysisService::new(config),
            Err(BackendError::Config(_))
        ));
    }

    #[test]
    fn client_rejects_zero_timeout() {
        let config = BackendConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(matches!(
            HttpAnalysisService::new(config),
            Err(BackendError::Config(_))
        ));
    }

    #[test]
    fn endpoints_keep_base_path() {
        let config = BackendConfig {
            base_url: Url::parse("http://reviews.internal/backend").unwrap(),
            ..Default::default()
        };
        let client = HttpAnalysisService::new(config).unwrap();
        assert_eq!(
            client.endpoint("api/stats").unwrap().as_str(),
            "http://reviews.internal/backend/api/stats"
        );
    }

    #[test]
    fn error_message_prefers_error_field() {
        assert_eq!(
            error_message(
                StatusCode::NOT_FOUND,
                r#"{"success": false, "error": "No reviews found for this product"}"#
            ),
            "No reviews found for this product"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, ""),
            "Internal Server Error"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
    }

    #[test]
    fn backend_errors_map_onto_taxonomy() {
        let error: ApiError = BackendError::Status {
            status: 500,
            message: "boom".to_string(),
        }
        .into();
        assert_eq!(error, ApiError::server(Some(500), "boom"));

        let error: ApiError = BackendError::Rejected {
            message: "Invalid product or no data".to_string(),
        }
        .into();
        assert_eq!(error, ApiError::server(None, "Invalid product or no data"));

        let error: ApiError = BackendError::Timeout { seconds: 3 }.into();
        assert_eq!(error, ApiError::Timeout { timeout_seconds: 3 });
    }
}
