// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Analysis service abstraction for the review dashboard
//!
//! This crate defines the contract between the dashboard's request controllers
//! and whatever computes review statistics and fake/genuine classifications.
//! The production implementation talks HTTP (see the `backend-client` crate);
//! tests use the scripted [`FakeAnalysisService`] behind the `test-util` feature.
//!
//! # Core Abstractions
//!
//! - **`AnalysisService` Trait**: async capability for product analysis, fake review
//!   detection, aggregate statistics, the product catalogue and liveness
//! - **Error Taxonomy**: [`ApiError`] separates validation, transport, timeout,
//!   server and decode failures, each with a short user-facing message
//! - **Result Types**: [`AnalysisResult`], [`DetectionResult`] and [`DashboardStats`]
//!   enforce their invariants at construction (counts add up, percentages stay
//!   in range, nothing divides by zero)
//! - **Review Features**: [`ReviewFeatures`] extracts the linguistic signals shown
//!   next to a detection verdict

use shared_types::{EmptyStringError, NonEmptyString};
use thiserror::Error;

pub mod features;
pub mod health;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

#[cfg(any(test, feature = "test-util"))]
pub use fake::FakeAnalysisService;
pub use features::ReviewFeatures;
pub use health::*;
pub use types::*;

/// Longest backend-provided error text that is shown to users verbatim
const MAX_USER_MESSAGE_CHARS: usize = 120;

/// Capability that computes review analyses for the dashboard
///
/// Controllers treat implementations as opaque: they only see typed,
/// already-normalized results or an [`ApiError`]. A placeholder or demo
/// classifier must be provided through this trait so it can be swapped for a
/// real one without touching any controller.
pub trait AnalysisService: Send + Sync {
    /// Check whether the service is reachable and healthy
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached at all
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, ApiError>> + Send;

    /// List the products that have reviews available for analysis
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed
    fn list_products(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// Get aggregate statistics over every review known to the service
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed
    fn get_stats(&self) -> impl Future<Output = Result<DashboardStats, ApiError>> + Send;

    /// Analyze all reviews of a single product
    ///
    /// # Errors
    ///
    /// Returns an error if the product is unknown, the request fails, or the
    /// payload cannot be normalized into an [`AnalysisResult`]
    fn analyze_product(
        &self,
        product_name: &NonEmptyString,
    ) -> impl Future<Output = Result<AnalysisResult, ApiError>> + Send;

    /// Classify a single free-text review as fake or genuine
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload cannot be
    /// normalized into a [`DetectionResult`]
    fn detect_fake(
        &self,
        review_text: &NonEmptyString,
    ) -> impl Future<Output = Result<DetectionResult, ApiError>> + Send;

    /// Get the name/identifier of this service implementation
    fn name(&self) -> &'static str;
}

/// Coarse classification of an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input rejected locally, nothing was sent
    Validation,
    /// Service unreachable
    Transport,
    /// Service did not answer in time
    Timeout,
    /// Non-2xx status or `success: false` payload
    Server,
    /// Malformed JSON or missing fields
    Decode,
}

/// Errors that can occur when working with an analysis service
#[derive(Debug, Clone, PartialEq, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    /// Input was empty or otherwise invalid; never sent over the wire
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Network unreachable or connection dropped
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Request did not complete in time
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },

    /// Service answered with a non-2xx status or `success: false`
    #[error("Server error{}: {message}", status_suffix(.status))]
    Server { status: Option<u16>, message: String },

    /// Payload could not be decoded or normalized
    #[error("Invalid response: {message}")]
    Decode { message: String },
}

impl ApiError {
    /// Create a validation error
    pub fn validation<T: ToString>(message: T) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    /// Create a transport error
    pub fn transport<T: ToString>(message: T) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }

    /// Create a server error
    pub fn server<T: ToString>(status: Option<u16>, message: T) -> Self {
        Self::Server {
            status,
            message: message.to_string(),
        }
    }

    /// Create a decode error
    pub fn decode<T: ToString>(message: T) -> Self {
        Self::Decode {
            message: message.to_string(),
        }
    }

    /// Coarse kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Transport { .. } => ErrorKind::Transport,
            ApiError::Timeout { .. } => ErrorKind::Timeout,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Check if this error was raised locally before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation { .. })
    }

    /// Short message suitable for a banner or toast
    ///
    /// Backend error text is passed through only when it is a single short
    /// line; anything longer is treated as a raw exception dump and replaced.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation { message } => message.clone(),
            ApiError::Transport { .. } => "Unable to reach the analysis service".to_string(),
            ApiError::Timeout { .. } => {
                "The analysis service did not respond in time".to_string()
            }
            ApiError::Server { status, message } => {
                let first_line = message.lines().next().unwrap_or_default().trim();
                if !first_line.is_empty() && first_line.chars().count() <= MAX_USER_MESSAGE_CHARS
                {
                    first_line.to_string()
                } else if let Some(status) = status {
                    format!("The analysis service reported an error (HTTP {status})")
                } else {
                    "The analysis service reported an error".to_string()
                }
            }
            ApiError::Decode { .. } => {
                "Received an unexpected response from the analysis service".to_string()
            }
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl From<EmptyStringError> for ApiError {
    fn from(value: EmptyStringError) -> Self {
        ApiError::validation(value)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::decode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds() {
        assert_eq!(ApiError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(ApiError::transport("x").kind(), ErrorKind::Transport);
        assert_eq!(
            ApiError::Timeout { timeout_seconds: 3 }.kind(),
            ErrorKind::Timeout
        );
        assert_eq!(ApiError::server(Some(500), "x").kind(), ErrorKind::Server);
        assert_eq!(ApiError::decode("x").kind(), ErrorKind::Decode);
        assert!(ApiError::validation("x").is_validation());
        assert!(!ApiError::decode("x").is_validation());
    }

    #[test]
    fn server_display_includes_status() {
        let error = ApiError::server(Some(404), "No reviews found for this product");
        assert_eq!(
            error.to_string(),
            "Server error (HTTP 404): No reviews found for this product"
        );

        let error = ApiError::server(None, "Invalid product or no data");
        assert_eq!(error.to_string(), "Server error: Invalid product or no data");
    }

    #[test]
    fn user_message_passes_short_backend_text() {
        let error = ApiError::server(Some(404), "No reviews found for this product");
        assert_eq!(error.user_message(), "No reviews found for this product");
    }

    #[test]
    fn user_message_hides_exception_dumps() {
        let dump = format!("Traceback (most recent call last):{}", "x".repeat(200));
        let error = ApiError::server(Some(500), dump);
        assert_eq!(
            error.user_message(),
            "The analysis service reported an error (HTTP 500)"
        );

        let empty = ApiError::server(Some(500), "");
        assert_eq!(
            empty.user_message(),
            "The analysis service reported an error (HTTP 500)"
        );
    }

    #[test]
    fn user_message_never_leaks_transport_details() {
        let error = ApiError::transport("error sending request for url (http://localhost:5000/api/stats): tcp connect error");
        assert_eq!(error.user_message(), "Unable to reach the analysis service");
        assert!(!ApiError::decode("missing field `is_fake`").user_message().contains("is_fake"));
    }

    #[test]
    fn empty_string_converts_to_validation() {
        let error: ApiError = EmptyStringError.into();
        assert!(error.is_validation());
    }
}
