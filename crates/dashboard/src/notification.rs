// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Toast notifications emitted by request controllers
//!
//! Every accepted submission produces exactly one [`NotificationKind::InProgress`]
//! notification followed by at most one terminal notification
//! ([`NotificationKind::Success`] or [`NotificationKind::Failure`]). A
//! superseded submission gets no terminal notification; the newer submission's
//! in-progress toast replaces it. Rejected input produces a single
//! [`NotificationKind::Warning`].

use std::fmt;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::RequestId;

/// Notifications buffered per subscriber before the oldest are dropped
pub const NOTIFICATION_CAPACITY: usize = 64;

/// Operation a notification refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Loading dashboard statistics and the product catalogue
    Overview,
    /// Analyzing all reviews of one product
    ProductAnalysis,
    /// Classifying a single review
    FakeDetection,
}

impl Operation {
    /// Human-readable operation name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Overview => "overview",
            Operation::ProductAnalysis => "product analysis",
            Operation::FakeDetection => "fake review detection",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A request was dispatched
    InProgress,
    /// The request succeeded
    Success,
    /// The request failed
    Failure,
    /// Input was rejected before dispatch
    Warning,
}

/// Message for the toast collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Operation the notification refers to
    pub operation: Operation,
    /// Submission the notification refers to
    pub request: RequestId,
    /// Severity
    pub kind: NotificationKind,
    /// Text to show
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            NotificationKind::InProgress => "...",
            NotificationKind::Success => "ok",
            NotificationKind::Failure => "error",
            NotificationKind::Warning => "warning",
        };
        write!(f, "[{marker}] {}", self.message)
    }
}

/// Broadcasts notifications to any number of subscribers
///
/// Sending never blocks and never fails: with no subscribers the
/// notification is simply dropped.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Create a notifier with [`NOTIFICATION_CAPACITY`] buffered messages
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self { sender }
    }

    /// Subscribe to notifications sent from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub(crate) fn emit(
        &self,
        operation: Operation,
        request: RequestId,
        kind: NotificationKind,
        message: impl Into<String>,
    ) {
        // No subscribers is not an error
        let _ = self.sender.send(Notification {
            operation,
            request,
            kind,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_notifications() {
        let notifier = Notifier::new();
        let mut receiver = notifier.subscribe();

        notifier.emit(
            Operation::FakeDetection,
            RequestId::INITIAL.next(),
            NotificationKind::InProgress,
            "Analyzing review...",
        );

        let notification = receiver.recv().await.unwrap();
        assert_eq!(notification.kind, NotificationKind::InProgress);
        assert_eq!(notification.to_string(), "[...] Analyzing review...");
    }

    #[test]
    fn emitting_without_subscribers_is_silent() {
        let notifier = Notifier::new();
        notifier.emit(
            Operation::Overview,
            RequestId::INITIAL,
            NotificationKind::Warning,
            "nobody listens",
        );
    }
}
