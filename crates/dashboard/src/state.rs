// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Request lifecycle states

use std::fmt;

use api_client::DashboardStats;
use serde::Serialize;

/// Monotonic identifier of a submission within one controller
///
/// Identifiers only grow. A settling request whose id is no longer the
/// controller's latest has been superseded and must not touch its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Identifier before any submission
    pub const INITIAL: RequestId = RequestId(0);

    /// Identifier following this one
    #[must_use]
    pub fn next(self) -> Self {
        RequestId(self.0.wrapping_add(1))
    }

    /// Raw sequence number
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of the latest request issued by a controller
#[derive(Debug, Clone, PartialEq, Default)]
#[allow(missing_docs)]
pub enum RequestState<T> {
    /// Nothing submitted, or the last submission was rejected or reset
    #[default]
    Idle,
    /// A request is in flight
    Pending { request: RequestId },
    /// The latest request completed with a result
    Succeeded(T),
    /// The latest request failed; the message is safe to show to users
    Failed { message: String },
}

impl<T> RequestState<T> {
    /// Check if no request is active or settled
    pub fn is_idle(&self) -> bool {
        matches!(self, RequestState::Idle)
    }

    /// Check if a request is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending { .. })
    }

    /// Result of the latest request, if it succeeded
    pub fn result(&self) -> Option<&T> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Failure message of the latest request, if it failed
    pub fn failure(&self) -> Option<&str> {
        match self {
            RequestState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Short lowercase name of the state
    pub fn label(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Pending { .. } => "pending",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed { .. } => "failed",
        }
    }
}

/// How a submission ended, from the submitter's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request succeeded and its result is now the controller state
    Succeeded,
    /// The request failed and the controller state is `Failed`
    Failed,
    /// A later submission or a reset took over; the state was left alone
    Superseded,
}

/// Data shown on the dashboard overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Aggregate review statistics
    pub stats: DashboardStats,
    /// Products available for analysis; empty when the catalogue failed to load
    pub products: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_increase() {
        let first = RequestId::INITIAL.next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.value(), 2);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn state_accessors() {
        let idle: RequestState<u32> = RequestState::default();
        assert!(idle.is_idle());
        assert_eq!(idle.result(), None);

        let pending: RequestState<u32> = RequestState::Pending {
            request: RequestId::INITIAL.next(),
        };
        assert!(pending.is_pending());
        assert_eq!(pending.label(), "pending");

        assert_eq!(RequestState::Succeeded(7).result(), Some(&7));

        let failed: RequestState<u32> = RequestState::Failed {
            message: "Unable to reach the analysis service".to_string(),
        };
        assert_eq!(failed.failure(), Some("Unable to reach the analysis service"));
    }
}
