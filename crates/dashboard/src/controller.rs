// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Request lifecycle controller
//!
//! A [`RequestController`] owns the lifecycle of one kind of asynchronous
//! request for one screen. It validates input, dispatches the call through an
//! [`AnalysisService`], and publishes `Idle -> Pending -> Succeeded | Failed`
//! through a `watch` channel that renderers subscribe to.
//!
//! # Concurrency
//!
//! At most one request is pending per controller. A new submission cancels
//! the one in flight (cancel-and-replace): the superseded call's future is
//! dropped through its [`CancellationToken`], and if its result still races
//! in, the sequence check at settlement discards it. The internal mutex is
//! never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use api_client::{AnalysisResult, AnalysisService, ApiError, DetectionResult};
use shared_types::NonEmptyString;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    NotificationKind, Notifier, Operation, Outcome, Overview, RequestId, RequestState,
};

/// Toast texts for one operation
#[derive(Debug, Clone, Copy)]
struct Messages {
    operation: Operation,
    in_progress: &'static str,
    success: &'static str,
    failure: &'static str,
    empty_input: &'static str,
}

const PRODUCT_ANALYSIS: Messages = Messages {
    operation: Operation::ProductAnalysis,
    in_progress: "Analyzing reviews...",
    success: "Analysis complete!",
    failure: "Analysis failed",
    empty_input: "Please select a product",
};

const FAKE_DETECTION: Messages = Messages {
    operation: Operation::FakeDetection,
    in_progress: "Analyzing review...",
    success: "Analysis complete!",
    failure: "Detection failed",
    empty_input: "Please enter a review text",
};

const OVERVIEW: Messages = Messages {
    operation: Operation::Overview,
    in_progress: "Loading dashboard...",
    success: "Dashboard loaded",
    failure: "Failed to load dashboard",
    empty_input: "",
};

#[derive(Debug, Default)]
struct Inner {
    latest: RequestId,
    in_flight: Option<CancellationToken>,
}

/// Lifecycle controller for requests producing a `T`
#[derive(Debug)]
pub struct RequestController<S, T> {
    service: Arc<S>,
    notifier: Notifier,
    state: watch::Sender<RequestState<T>>,
    inner: Mutex<Inner>,
}

/// Controller for the product analysis panel
pub type ProductAnalysisController<S> = RequestController<S, AnalysisResult>;

/// Controller for the fake review detection screen
pub type FakeDetectionController<S> = RequestController<S, DetectionResult>;

/// Controller for the dashboard overview (statistics and product catalogue)
pub type OverviewController<S> = RequestController<S, Overview>;

impl<S, T> RequestController<S, T> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop a request that never settled, if it is still the latest
    fn abandon(&self, request: RequestId) {
        let mut inner = self.lock();
        if inner.latest != request {
            return;
        }
        inner.in_flight = None;
        self.state.send_replace(RequestState::Idle);
        debug!(%request, "request dropped before it settled");
    }
}

/// Returns the controller to `Idle` when a dispatch is dropped mid-flight
struct PendingGuard<'a, S, T> {
    controller: &'a RequestController<S, T>,
    request: RequestId,
    armed: bool,
}

impl<S, T> PendingGuard<'_, S, T> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S, T> Drop for PendingGuard<'_, S, T> {
    fn drop(&mut self) {
        if self.armed {
            self.controller.abandon(self.request);
        }
    }
}

impl<S, T> RequestController<S, T>
where
    S: AnalysisService,
    T: Clone + Send + Sync,
{
    /// Create an idle controller
    pub fn new(service: Arc<S>, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self {
            service,
            notifier,
            state,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> RequestState<T> {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.state.subscribe()
    }

    /// Identifier of the latest submission or reset
    pub fn latest_request(&self) -> RequestId {
        self.lock().latest
    }

    /// Return to `Idle`, abandoning any request in flight
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.latest = inner.latest.next();
        if let Some(token) = inner.in_flight.take() {
            debug!(request = %inner.latest, "reset cancels the request in flight");
            token.cancel();
        }
        self.state.send_replace(RequestState::Idle);
    }

    /// Reject input locally; any request in flight is abandoned
    fn reject(&self, messages: &Messages) -> ApiError {
        let mut inner = self.lock();
        inner.latest = inner.latest.next();
        if let Some(token) = inner.in_flight.take() {
            token.cancel();
        }
        self.state.send_replace(RequestState::Idle);
        self.notifier.emit(
            messages.operation,
            inner.latest,
            NotificationKind::Warning,
            messages.empty_input,
        );
        warn!(operation = %messages.operation, "rejected empty input");
        ApiError::validation(messages.empty_input)
    }

    /// Start a new request, cancelling the previous one
    fn begin(&self, messages: &Messages) -> (RequestId, CancellationToken) {
        let mut inner = self.lock();
        let request = inner.latest.next();
        inner.latest = request;

        if let Some(previous) = inner.in_flight.take() {
            debug!(%request, "superseding the request in flight");
            previous.cancel();
        }
        let token = CancellationToken::new();
        inner.in_flight = Some(token.clone());

        self.state.send_replace(RequestState::Pending { request });
        self.notifier.emit(
            messages.operation,
            request,
            NotificationKind::InProgress,
            messages.in_progress,
        );
        (request, token)
    }

    /// Apply a result if `request` is still the latest submission
    fn settle(
        &self,
        messages: &Messages,
        request: RequestId,
        result: Result<T, ApiError>,
    ) -> Outcome {
        let mut inner = self.lock();
        if inner.latest != request {
            debug!(%request, latest = %inner.latest, "discarding result of a superseded request");
            return Outcome::Superseded;
        }
        inner.in_flight = None;

        match result {
            Ok(value) => {
                self.state.send_replace(RequestState::Succeeded(value));
                self.notifier.emit(
                    messages.operation,
                    request,
                    NotificationKind::Success,
                    messages.success,
                );
                info!(operation = %messages.operation, %request, "request succeeded");
                Outcome::Succeeded
            }
            Err(error) => {
                let message = error.user_message();
                warn!(operation = %messages.operation, %request, %error, "request failed");
                self.notifier.emit(
                    messages.operation,
                    request,
                    NotificationKind::Failure,
                    format!("{}: {message}", messages.failure),
                );
                self.state.send_replace(RequestState::Failed { message });
                Outcome::Failed
            }
        }
    }

    /// Run `call` as the controller's new latest request
    async fn dispatch<F>(&self, messages: &Messages, call: F) -> Outcome
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let (request, token) = self.begin(messages);
        let guard = PendingGuard {
            controller: self,
            request,
            armed: true,
        };

        let result = tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!(%request, "request cancelled before it settled");
                return Outcome::Superseded;
            }
            result = call => result,
        };

        guard.disarm();
        self.settle(messages, request, result)
    }
}

impl<S: AnalysisService> RequestController<S, AnalysisResult> {
    /// Analyze all reviews of a product
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty or whitespace-only name;
    /// nothing is sent and the state returns to `Idle`. Every other failure is
    /// reported through the `Failed` state and [`Outcome::Failed`].
    #[instrument(skip(self), fields(controller = "product_analysis"))]
    pub async fn submit_product_analysis(&self, product_name: &str) -> Result<Outcome, ApiError> {
        let Ok(product_name) = NonEmptyString::trimmed(product_name) else {
            return Err(self.reject(&PRODUCT_ANALYSIS));
        };

        let service = Arc::clone(&self.service);
        Ok(self
            .dispatch(&PRODUCT_ANALYSIS, async move {
                service.analyze_product(&product_name).await
            })
            .await)
    }
}

impl<S: AnalysisService> RequestController<S, DetectionResult> {
    /// Classify a single review as fake or genuine
    ///
    /// The text is trimmed before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for an empty or whitespace-only text;
    /// nothing is sent and the state returns to `Idle`. Every other failure is
    /// reported through the `Failed` state and [`Outcome::Failed`].
    #[instrument(skip(self, review_text), fields(controller = "fake_detection"))]
    pub async fn submit_fake_detection(&self, review_text: &str) -> Result<Outcome, ApiError> {
        let Ok(review_text) = NonEmptyString::trimmed(review_text) else {
            return Err(self.reject(&FAKE_DETECTION));
        };

        let service = Arc::clone(&self.service);
        Ok(self
            .dispatch(&FAKE_DETECTION, async move {
                service.detect_fake(&review_text).await
            })
            .await)
    }
}

impl<S: AnalysisService> RequestController<S, Overview> {
    /// Load aggregate statistics and the product catalogue concurrently
    ///
    /// A statistics failure fails the request. A catalogue failure is logged
    /// and leaves the product list empty.
    #[instrument(skip(self), fields(controller = "overview"))]
    pub async fn load_overview(&self) -> Outcome {
        let service = Arc::clone(&self.service);
        self.dispatch(&OVERVIEW, async move {
            let (stats, products) = tokio::join!(service.get_stats(), service.list_products());
            let products = products.unwrap_or_else(|error| {
                warn!(%error, "failed to load the product catalogue, continuing without it");
                Vec::new()
            });
            Ok::<_, ApiError>(Overview {
                stats: stats?,
                products,
            })
        })
        .await
    }
}
