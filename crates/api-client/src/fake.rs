// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Scripted in-memory analysis service
//!
//! [`FakeAnalysisService`] answers from queues of scripted responses and
//! records every call it receives. A response can be *gated*: the call stays
//! pending until the test releases it through the returned sender, which is
//! how ordering properties (late responses, cancel-and-replace) are exercised.
//!
//! It carries no detection logic of its own. Verdicts are whatever the test
//! scripts.

use std::{
    collections::VecDeque,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use shared_types::{NonEmptyString, Sentiment};
use tokio::sync::{Notify, oneshot};

use crate::{
    AnalysisResult, AnalysisService, ApiError, Confidence, DashboardStats, DetectionResult,
    HealthStatus, Ratings, ReviewCounts, ReviewFeatures, ReviewSummary, SentimentBreakdown,
};

type Reply<T> = Result<T, ApiError>;

/// Sender used to release a gated call
pub type Gate<T> = oneshot::Sender<Reply<T>>;

#[derive(Debug)]
enum Scripted<T> {
    Ready(Reply<T>),
    Gated(oneshot::Receiver<Reply<T>>),
}

#[derive(Debug)]
struct Script<T> {
    queue: Mutex<VecDeque<Scripted<T>>>,
    calls: Mutex<Vec<String>>,
    called: Notify,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            called: Notify::new(),
        }
    }
}

impl<T> Script<T> {
    fn push(&self, scripted: Scripted<T>) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(scripted);
    }

    fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn wait_for_calls(&self, count: usize) {
        loop {
            let notified = self.called.notified();
            if self.calls.lock().unwrap_or_else(PoisonError::into_inner).len() >= count {
                return;
            }
            notified.await;
        }
    }

    async fn answer(&self, operation: &str, input: &str) -> Reply<T> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input.to_string());
        self.called.notify_waiters();

        let next = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(ApiError::transport("gated response was dropped"))),
            None => Err(ApiError::server(
                None,
                format!("no scripted {operation} response"),
            )),
        }
    }
}

/// In-memory [`AnalysisService`] answering from scripted responses
#[derive(Debug)]
pub struct FakeAnalysisService {
    health: Mutex<Reply<HealthStatus>>,
    products: Mutex<Reply<Vec<String>>>,
    product_calls: AtomicUsize,
    stats: Script<DashboardStats>,
    analyses: Script<AnalysisResult>,
    detections: Script<DetectionResult>,
}

impl Default for FakeAnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeAnalysisService {
    /// Create a healthy service with an empty catalogue and no scripted replies
    pub fn new() -> Self {
        Self {
            health: Mutex::new(Ok(HealthStatus::Up)),
            products: Mutex::new(Ok(Vec::new())),
            product_calls: AtomicUsize::new(0),
            stats: Script::default(),
            analyses: Script::default(),
            detections: Script::default(),
        }
    }

    /// Set the product catalogue returned by every `list_products` call
    #[must_use]
    pub fn with_products<I, S>(self, products: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_products(Ok(products.into_iter().map(Into::into).collect()));
        self
    }

    /// Set the reply returned by every `list_products` call
    pub fn set_products(&self, reply: Reply<Vec<String>>) {
        *self.products.lock().unwrap_or_else(PoisonError::into_inner) = reply;
    }

    /// Set the reply returned by every `health_check` call
    pub fn set_health(&self, reply: Reply<HealthStatus>) {
        *self.health.lock().unwrap_or_else(PoisonError::into_inner) = reply;
    }

    /// Queue a reply for the next `get_stats` call
    pub fn push_stats(&self, reply: Reply<DashboardStats>) {
        self.stats.push(Scripted::Ready(reply));
    }

    /// Queue a reply for the next `analyze_product` call
    pub fn push_analysis(&self, reply: Reply<AnalysisResult>) {
        self.analyses.push(Scripted::Ready(reply));
    }

    /// Queue a gated reply for the next `analyze_product` call
    pub fn gate_analysis(&self) -> Gate<AnalysisResult> {
        let (sender, receiver) = oneshot::channel();
        self.analyses.push(Scripted::Gated(receiver));
        sender
    }

    /// Queue a reply for the next `detect_fake` call
    pub fn push_detection(&self, reply: Reply<DetectionResult>) {
        self.detections.push(Scripted::Ready(reply));
    }

    /// Queue a gated reply for the next `detect_fake` call
    pub fn gate_detection(&self) -> Gate<DetectionResult> {
        let (sender, receiver) = oneshot::channel();
        self.detections.push(Scripted::Gated(receiver));
        sender
    }

    /// Queue a gated reply for the next `get_stats` call
    pub fn gate_stats(&self) -> Gate<DashboardStats> {
        let (sender, receiver) = oneshot::channel();
        self.stats.push(Scripted::Gated(receiver));
        sender
    }

    /// Product names received by `analyze_product`, in call order
    pub fn analyze_calls(&self) -> Vec<String> {
        self.analyses.calls()
    }

    /// Review texts received by `detect_fake`, in call order
    pub fn detect_calls(&self) -> Vec<String> {
        self.detections.calls()
    }

    /// Number of `list_products` calls received
    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    /// Number of `get_stats` calls received
    pub fn stats_calls(&self) -> usize {
        self.stats.calls().len()
    }

    /// Wait until `analyze_product` has been called at least `count` times
    pub async fn wait_for_analyze_calls(&self, count: usize) {
        self.analyses.wait_for_calls(count).await;
    }

    /// Wait until `detect_fake` has been called at least `count` times
    pub async fn wait_for_detect_calls(&self, count: usize) {
        self.detections.wait_for_calls(count).await;
    }

    /// Wait until `get_stats` has been called at least `count` times
    pub async fn wait_for_stats_calls(&self, count: usize) {
        self.stats.wait_for_calls(count).await;
    }
}

impl AnalysisService for FakeAnalysisService {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        self.health
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn list_products(&self) -> Result<Vec<String>, ApiError> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.products
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn get_stats(&self) -> Result<DashboardStats, ApiError> {
        self.stats.answer("stats", "").await
    }

    async fn analyze_product(
        &self,
        product_name: &NonEmptyString,
    ) -> Result<AnalysisResult, ApiError> {
        self.analyses
            .answer("analysis", product_name.as_str())
            .await
    }

    async fn detect_fake(&self, review_text: &NonEmptyString) -> Result<DetectionResult, ApiError> {
        self.detections
            .answer("detection", review_text.as_str())
            .await
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Analysis of `product_name` with the given genuine/fake split
///
/// # Panics
///
/// Panics if `genuine + fake` overflows a `u64`.
pub fn sample_analysis(product_name: &str, genuine: u64, fake: u64) -> AnalysisResult {
    let sentiment = SentimentBreakdown::new(None, genuine, 0, 0);
    AnalysisResult::new(
        product_name,
        ReviewCounts::new(genuine, fake).expect("sample review counts fit in a u64"),
        Ratings::new(4.2, Some(4.4)),
        ReviewSummary::new(
            ReviewSummary::default_text(genuine, Sentiment::Positive),
            vec!["Good quality".to_string(), "Fast shipping".to_string()],
            vec!["Price could be better".to_string()],
            sentiment.positive_percentage(),
            sentiment.negative_percentage(),
        ),
        sentiment,
    )
}

/// Detection result for `text` with the given flag and confidence fraction
pub fn sample_detection(text: &str, is_fake: bool, confidence: f64) -> DetectionResult {
    DetectionResult::new(
        is_fake,
        Confidence::from_raw(confidence).unwrap_or_default(),
        ReviewFeatures::extract(text),
    )
}

/// Aggregate statistics with the given genuine/fake split
///
/// # Panics
///
/// Panics if `genuine + fake` overflows a `u64`.
pub fn sample_stats(genuine: u64, fake: u64, total_products: u64) -> DashboardStats {
    let counts = ReviewCounts::new(genuine, fake).expect("sample review counts fit in a u64");
    DashboardStats::new(counts, total_products, 3.9)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_test::{assert_err, assert_ok};

    use super::*;

    fn name(s: &str) -> NonEmptyString {
        NonEmptyString::new(s).unwrap()
    }

    #[tokio::test]
    async fn replies_in_script_order_and_records_calls() {
        let service = FakeAnalysisService::new();
        service.push_analysis(Ok(sample_analysis("Laptop", 8, 2)));
        service.push_analysis(Err(ApiError::server(Some(404), "No reviews found")));

        let first = assert_ok!(service.analyze_product(&name("Laptop")).await);
        assert_eq!(first.product_name(), "Laptop");
        assert_err!(service.analyze_product(&name("Phone")).await);

        assert_eq!(service.analyze_calls(), vec!["Laptop", "Phone"]);
    }

    #[tokio::test]
    async fn unscripted_call_is_a_server_error() {
        let service = FakeAnalysisService::new();
        let error = service.detect_fake(&name("hello")).await.unwrap_err();
        assert!(matches!(error, ApiError::Server { .. }));
    }

    #[tokio::test]
    async fn gated_reply_waits_for_release() {
        let service = Arc::new(FakeAnalysisService::new());
        let gate = service.gate_detection();

        let pending = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.detect_fake(&name("WOW!!!")).await }
        });

        service.wait_for_detect_calls(1).await;
        assert!(!pending.is_finished());

        gate.send(Ok(sample_detection("WOW!!!", true, 0.85))).unwrap();
        let result = pending.await.unwrap().unwrap();
        assert!(result.is_fake());
    }

    #[tokio::test]
    async fn catalogue_and_health_are_repeatable() {
        let service = FakeAnalysisService::new().with_products(["Laptop", "T-Shirt"]);
        assert_eq!(service.list_products().await.unwrap().len(), 2);
        assert_eq!(service.list_products().await.unwrap().len(), 2);

        service.set_health(Ok(HealthStatus::Down {
            reason: "offline".to_string(),
        }));
        assert!(service.health_check().await.unwrap().is_down());
    }
}
