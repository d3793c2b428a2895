// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Health check types for analysis services

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status string the backend liveness endpoint reports when it is running
const LIVENESS_OK: &str = "ok";

/// Health status of an analysis service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum HealthStatus {
    /// Service is healthy and operational
    Up,
    /// Service answers but reports something other than healthy
    Degraded { reason: String },
    /// Service is down and not functional
    Down { reason: String },
}

impl HealthStatus {
    /// Interpret the `status` field of a liveness payload
    pub fn from_liveness(status: Option<&str>) -> Self {
        match status {
            Some(status) if status.eq_ignore_ascii_case(LIVENESS_OK) => HealthStatus::Up,
            Some(status) => HealthStatus::Degraded {
                reason: format!("service reported status '{status}'"),
            },
            None => HealthStatus::Degraded {
                reason: "service did not report a status".to_string(),
            },
        }
    }

    /// Check if this health status indicates the service is available
    pub fn is_available(&self) -> bool {
        matches!(self, HealthStatus::Up | HealthStatus::Degraded { .. })
    }

    /// Check if this health status indicates the service is completely down
    pub fn is_down(&self) -> bool {
        matches!(self, HealthStatus::Down { .. })
    }

    /// Get a human-readable description of the status
    pub fn description(&self) -> &str {
        match self {
            HealthStatus::Up => "Service is healthy",
            HealthStatus::Degraded { reason } | HealthStatus::Down { reason } => reason,
        }
    }
}

/// Health check outcome with timing, as shown by the `health` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Name of the service that was checked
    pub service: String,
    /// The health status
    pub status: HealthStatus,
    /// Round-trip time of the check
    pub response_time: Duration,
    /// When the check was performed
    pub timestamp: DateTime<Utc>,
}

impl HealthCheckResult {
    /// Record a health check outcome taken now
    pub fn new(service: impl Into<String>, status: HealthStatus, response_time: Duration) -> Self {
        Self {
            service: service.into(),
            status,
            response_time,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liveness_status_mapping() {
        assert_eq!(HealthStatus::from_liveness(Some("ok")), HealthStatus::Up);
        assert_eq!(HealthStatus::from_liveness(Some("OK")), HealthStatus::Up);
        assert!(matches!(
            HealthStatus::from_liveness(Some("loading")),
            HealthStatus::Degraded { .. }
        ));
        assert!(matches!(
            HealthStatus::from_liveness(None),
            HealthStatus::Degraded { .. }
        ));
    }

    #[test]
    fn health_status_availability() {
        assert!(HealthStatus::Up.is_available());
        assert!(
            HealthStatus::Degraded {
                reason: "slow".to_string()
            }
            .is_available()
        );
        assert!(
            !HealthStatus::Down {
                reason: "offline".to_string()
            }
            .is_available()
        );
        assert!(
            HealthStatus::Down {
                reason: "offline".to_string()
            }
            .is_down()
        );
    }

    #[test]
    fn health_check_result_records_service() {
        let result = HealthCheckResult::new(
            "review-backend",
            HealthStatus::Up,
            Duration::from_millis(12),
        );
        assert_eq!(result.service, "review-backend");
        assert_eq!(result.status.description(), "Service is healthy");
        assert!(result.timestamp <= Utc::now());
    }
}
