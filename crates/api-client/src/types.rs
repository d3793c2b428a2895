// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Normalized result types for review analysis
//!
//! Backends are inconsistent about which derived fields they send. Every type
//! here is built through a constructor that recomputes or clamps derived
//! values, so a value that exists always satisfies its invariants:
//!
//! - `genuine + fake == total` for review counts
//! - percentages lie in `[0, 100]`, ratings in `[0, 5]`, confidence in `[0, 1]`
//! - a zero denominator yields `0`, never `NaN`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shared_types::{Sentiment, Verdict};
use tracing::warn;

use crate::{ApiError, ReviewFeatures};

/// Highest star rating a review can carry
pub const MAX_RATING: f64 = 5.0;

/// Percentage of `part` in `whole`, or `0` when `whole` is zero
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    clamp_percentage(100.0 * part as f64 / whole as f64)
}

/// Clamp a percentage into `[0, 100]`, mapping non-finite values to `0`
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Clamp a star rating into `[0, 5]`, mapping non-finite values to `0`
pub fn clamp_rating(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, MAX_RATING)
    } else {
        0.0
    }
}

/// Genuine/fake split of a set of reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReviewCounts {
    total: u64,
    genuine: u64,
    fake: u64,
}

impl ReviewCounts {
    /// Counts from the genuine and fake sides; the total is their sum
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the sum does not fit in a `u64`.
    pub fn new(genuine: u64, fake: u64) -> Result<Self, ApiError> {
        let total = genuine
            .checked_add(fake)
            .ok_or_else(|| ApiError::decode("review counts overflow"))?;
        Ok(Self {
            total,
            genuine,
            fake,
        })
    }

    /// Resolve counts from whichever fields a backend reported
    ///
    /// - genuine and fake present: the total is their sum; a disagreeing
    ///   reported total is logged and ignored
    /// - total and one side present: the other side is derived
    /// - only a total present: all reviews are treated as genuine
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when no counts are present, one side
    /// exceeds the reported total, or the sides overflow when summed.
    pub fn resolve(
        total: Option<u64>,
        genuine: Option<u64>,
        fake: Option<u64>,
    ) -> Result<Self, ApiError> {
        match (total, genuine, fake) {
            (reported, Some(genuine), Some(fake)) => {
                let counts = Self::new(genuine, fake)?;
                if let Some(reported) = reported
                    && reported != counts.total
                {
                    warn!(
                        reported,
                        genuine, fake, "backend total disagrees with genuine + fake, using the sum"
                    );
                }
                Ok(counts)
            }
            (Some(total), Some(genuine), None) => {
                let fake = total.checked_sub(genuine).ok_or_else(|| {
                    ApiError::decode(format!(
                        "genuine review count {genuine} exceeds total {total}"
                    ))
                })?;
                Self::new(genuine, fake)
            }
            (Some(total), None, Some(fake)) => {
                let genuine = total.checked_sub(fake).ok_or_else(|| {
                    ApiError::decode(format!("fake review count {fake} exceeds total {total}"))
                })?;
                Self::new(genuine, fake)
            }
            (Some(total), None, None) => Self::new(total, 0),
            (None, _, _) => Err(ApiError::decode("response is missing review counts")),
        }
    }

    /// Total number of reviews
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of genuine reviews
    pub fn genuine(&self) -> u64 {
        self.genuine
    }

    /// Number of fake reviews
    pub fn fake(&self) -> u64 {
        self.fake
    }

    /// Share of fake reviews in `[0, 100]`, `0` when there are no reviews
    pub fn fake_percentage(&self) -> f64 {
        percentage(self.fake, self.total)
    }
}

/// Sentiment distribution over a product's genuine reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SentimentBreakdown {
    overall: Sentiment,
    positive_count: u64,
    negative_count: u64,
    neutral_count: u64,
}

impl SentimentBreakdown {
    /// Create a breakdown; a missing overall label is derived from the counts
    pub fn new(
        overall: Option<Sentiment>,
        positive_count: u64,
        negative_count: u64,
        neutral_count: u64,
    ) -> Self {
        Self {
            overall: overall
                .unwrap_or_else(|| Sentiment::from_counts(positive_count, negative_count)),
            positive_count,
            negative_count,
            neutral_count,
        }
    }

    /// Overall sentiment label
    pub fn overall(&self) -> Sentiment {
        self.overall
    }

    /// Number of positive reviews
    pub fn positive_count(&self) -> u64 {
        self.positive_count
    }

    /// Number of negative reviews
    pub fn negative_count(&self) -> u64 {
        self.negative_count
    }

    /// Number of neutral reviews
    pub fn neutral_count(&self) -> u64 {
        self.neutral_count
    }

    /// Number of reviews with any sentiment label
    pub fn labelled_count(&self) -> u64 {
        self.positive_count
            .saturating_add(self.negative_count)
            .saturating_add(self.neutral_count)
    }

    /// Share of positive reviews among labelled reviews
    pub fn positive_percentage(&self) -> f64 {
        percentage(self.positive_count, self.labelled_count())
    }

    /// Share of negative reviews among labelled reviews
    pub fn negative_percentage(&self) -> f64 {
        percentage(self.negative_count, self.labelled_count())
    }
}

/// Written summary of a product's genuine reviews
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReviewSummary {
    text: String,
    pros: Vec<String>,
    cons: Vec<String>,
    positive_percentage: f64,
    negative_percentage: f64,
}

impl ReviewSummary {
    /// Create a summary, clamping both percentages into `[0, 100]`
    pub fn new(
        text: impl Into<String>,
        pros: Vec<String>,
        cons: Vec<String>,
        positive_percentage: f64,
        negative_percentage: f64,
    ) -> Self {
        Self {
            text: text.into(),
            pros,
            cons,
            positive_percentage: clamp_percentage(positive_percentage),
            negative_percentage: clamp_percentage(negative_percentage),
        }
    }

    /// Summary sentence used when the backend does not provide one
    pub fn default_text(review_count: u64, overall: Sentiment) -> String {
        if review_count == 0 {
            "No reviews available for this product.".to_string()
        } else {
            format!(
                "Based on {review_count} genuine reviews, {}.",
                overall.feedback_phrase()
            )
        }
    }

    /// Summary text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Highlights from positive reviews, in backend order
    pub fn pros(&self) -> &[String] {
        &self.pros
    }

    /// Highlights from negative reviews, in backend order
    pub fn cons(&self) -> &[String] {
        &self.cons
    }

    /// Share of satisfied customers
    pub fn positive_percentage(&self) -> f64 {
        self.positive_percentage
    }

    /// Share of customers reporting issues
    pub fn negative_percentage(&self) -> f64 {
        self.negative_percentage
    }
}

/// Average star ratings of a product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Ratings {
    average: f64,
    genuine_average: f64,
}

impl Ratings {
    /// Create ratings; a missing genuine average falls back to the overall one
    pub fn new(average: f64, genuine_average: Option<f64>) -> Self {
        let average = clamp_rating(average);
        Self {
            average,
            genuine_average: genuine_average.map_or(average, clamp_rating),
        }
    }

    /// Average rating over all reviews
    pub fn average(&self) -> f64 {
        self.average
    }

    /// Average rating over genuine reviews only
    pub fn genuine_average(&self) -> f64 {
        self.genuine_average
    }
}

/// Product-level analysis of reviews
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    product_name: String,
    total_reviews: u64,
    genuine_reviews: u64,
    fake_reviews: u64,
    fake_percentage: f64,
    average_rating: f64,
    genuine_average_rating: f64,
    summary: ReviewSummary,
    sentiment: SentimentBreakdown,
}

impl AnalysisResult {
    /// Assemble a result; the fake percentage is always derived from `counts`
    pub fn new(
        product_name: impl Into<String>,
        counts: ReviewCounts,
        ratings: Ratings,
        summary: ReviewSummary,
        sentiment: SentimentBreakdown,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            total_reviews: counts.total(),
            genuine_reviews: counts.genuine(),
            fake_reviews: counts.fake(),
            fake_percentage: counts.fake_percentage(),
            average_rating: ratings.average(),
            genuine_average_rating: ratings.genuine_average(),
            summary,
            sentiment,
        }
    }

    /// Product the reviews belong to
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Genuine/fake split
    pub fn counts(&self) -> ReviewCounts {
        ReviewCounts {
            total: self.total_reviews,
            genuine: self.genuine_reviews,
            fake: self.fake_reviews,
        }
    }

    /// Total number of reviews
    pub fn total_reviews(&self) -> u64 {
        self.total_reviews
    }

    /// Number of genuine reviews
    pub fn genuine_reviews(&self) -> u64 {
        self.genuine_reviews
    }

    /// Number of fake reviews
    pub fn fake_reviews(&self) -> u64 {
        self.fake_reviews
    }

    /// Share of fake reviews in `[0, 100]`
    pub fn fake_percentage(&self) -> f64 {
        self.fake_percentage
    }

    /// Average rating over all reviews, in `[0, 5]`
    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    /// Average rating over genuine reviews, in `[0, 5]`
    pub fn genuine_average_rating(&self) -> f64 {
        self.genuine_average_rating
    }

    /// Written summary
    pub fn summary(&self) -> &ReviewSummary {
        &self.summary
    }

    /// Sentiment distribution
    pub fn sentiment(&self) -> &SentimentBreakdown {
        &self.sentiment
    }
}

/// Classifier confidence as a fraction in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Read a confidence reported by a backend
    ///
    /// Values in `(1, 100]` are read as percentages.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] for non-finite values and for values
    /// outside `[0, 100]`.
    pub fn from_raw(raw: f64) -> Result<Self, ApiError> {
        if !raw.is_finite() || !(0.0..=100.0).contains(&raw) {
            return Err(ApiError::decode(format!("invalid confidence value {raw}")));
        }
        let fraction = if raw > 1.0 { raw / 100.0 } else { raw };
        Ok(Self(fraction))
    }

    /// Confidence as a fraction in `[0, 1]`
    pub fn as_fraction(&self) -> f64 {
        self.0
    }

    /// Confidence as a percentage in `[0, 100]`
    pub fn as_percentage(&self) -> f64 {
        self.0 * 100.0
    }
}

/// Classification of a single review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    is_fake: bool,
    confidence: Confidence,
    verdict: Verdict,
    features: ReviewFeatures,
}

impl DetectionResult {
    /// Create a detection result; the verdict is derived from `is_fake`
    pub fn new(is_fake: bool, confidence: Confidence, features: ReviewFeatures) -> Self {
        Self {
            is_fake,
            confidence,
            verdict: Verdict::from_is_fake(is_fake),
            features,
        }
    }

    /// Whether the review was classified as fake
    pub fn is_fake(&self) -> bool {
        self.is_fake
    }

    /// Classifier confidence
    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Verdict label
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Linguistic features of the review
    pub fn features(&self) -> &ReviewFeatures {
        &self.features
    }
}

/// Aggregate statistics over every review known to the service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    total_reviews: u64,
    genuine_reviews: u64,
    fake_reviews: u64,
    fake_percentage: f64,
    total_products: u64,
    average_rating: f64,
    categories: BTreeMap<String, u64>,
    verified_purchases: u64,
}

impl DashboardStats {
    /// Assemble statistics; the fake percentage is always derived from `counts`
    pub fn new(counts: ReviewCounts, total_products: u64, average_rating: f64) -> Self {
        Self {
            total_reviews: counts.total(),
            genuine_reviews: counts.genuine(),
            fake_reviews: counts.fake(),
            fake_percentage: counts.fake_percentage(),
            total_products,
            average_rating: clamp_rating(average_rating),
            categories: BTreeMap::new(),
            verified_purchases: 0,
        }
    }

    /// Attach per-category review counts
    #[must_use]
    pub fn with_categories(mut self, categories: BTreeMap<String, u64>) -> Self {
        self.categories = categories;
        self
    }

    /// Attach the number of verified purchases
    #[must_use]
    pub fn with_verified_purchases(mut self, verified_purchases: u64) -> Self {
        self.verified_purchases = verified_purchases;
        self
    }

    /// Total number of reviews
    pub fn total_reviews(&self) -> u64 {
        self.total_reviews
    }

    /// Number of genuine reviews
    pub fn genuine_reviews(&self) -> u64 {
        self.genuine_reviews
    }

    /// Number of fake reviews
    pub fn fake_reviews(&self) -> u64 {
        self.fake_reviews
    }

    /// Share of fake reviews in `[0, 100]`
    pub fn fake_percentage(&self) -> f64 {
        self.fake_percentage
    }

    /// Number of distinct products
    pub fn total_products(&self) -> u64 {
        self.total_products
    }

    /// Average rating over all reviews, in `[0, 5]`
    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    /// Review counts per product category
    pub fn categories(&self) -> &BTreeMap<String, u64> {
        &self.categories
    }

    /// Number of reviews from verified purchases
    pub fn verified_purchases(&self) -> u64 {
        self.verified_purchases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_percentage_from_counts() {
        let counts = ReviewCounts::new(105, 45).unwrap();
        assert_eq!(counts.total(), 150);
        assert!((counts.fake_percentage() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn zero_reviews_have_zero_percentage() {
        let counts = ReviewCounts::new(0, 0).unwrap();
        assert_eq!(counts.fake_percentage(), 0.0);
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn percentage_stays_in_range() {
        for (genuine, fake) in [(0, 1), (1, 0), (1, 1), (3, 997), (u64::MAX - 1, 1)] {
            let value = ReviewCounts::new(genuine, fake).unwrap().fake_percentage();
            assert!((0.0..=100.0).contains(&value), "{genuine}/{fake} -> {value}");
        }
        assert_eq!(clamp_percentage(f64::NAN), 0.0);
        assert_eq!(clamp_percentage(140.0), 100.0);
    }

    #[test]
    fn resolve_counts_uses_sum_over_reported_total() {
        let counts = ReviewCounts::resolve(Some(151), Some(105), Some(45)).unwrap();
        assert_eq!(counts.total(), 150);
    }

    #[test]
    fn resolve_counts_derives_missing_side() {
        let counts = ReviewCounts::resolve(Some(150), Some(105), None).unwrap();
        assert_eq!(counts.fake(), 45);

        let counts = ReviewCounts::resolve(Some(150), None, Some(45)).unwrap();
        assert_eq!(counts.genuine(), 105);

        let counts = ReviewCounts::resolve(Some(20), None, None).unwrap();
        assert_eq!((counts.genuine(), counts.fake()), (20, 0));
    }

    #[test]
    fn resolve_counts_rejects_inconsistent_or_missing() {
        assert!(matches!(
            ReviewCounts::resolve(Some(10), Some(11), None),
            Err(ApiError::Decode { .. })
        ));
        assert!(matches!(
            ReviewCounts::resolve(Some(10), None, Some(11)),
            Err(ApiError::Decode { .. })
        ));
        assert!(matches!(
            ReviewCounts::resolve(None, None, Some(3)),
            Err(ApiError::Decode { .. })
        ));
    }

    #[test]
    fn resolve_counts_rejects_overflowing_sum() {
        let error = ReviewCounts::resolve(None, Some(u64::MAX), Some(1)).unwrap_err();
        assert!(matches!(error, ApiError::Decode { .. }));
        assert!(error.to_string().contains("review counts overflow"));

        assert!(ReviewCounts::new(u64::MAX, 0).is_ok());
        assert!(ReviewCounts::new(1, u64::MAX).is_err());
    }

    #[test]
    fn sentiment_breakdown_derives_overall_and_percentages() {
        let breakdown = SentimentBreakdown::new(None, 60, 30, 10);
        assert_eq!(breakdown.overall(), Sentiment::Positive);
        assert!((breakdown.positive_percentage() - 60.0).abs() < 1e-9);
        assert!((breakdown.negative_percentage() - 30.0).abs() < 1e-9);

        let reported = SentimentBreakdown::new(Some(Sentiment::Neutral), 60, 30, 10);
        assert_eq!(reported.overall(), Sentiment::Neutral);

        let empty = SentimentBreakdown::default();
        assert_eq!(empty.positive_percentage(), 0.0);
    }

    #[test]
    fn ratings_clamp_and_fall_back() {
        let ratings = Ratings::new(7.5, None);
        assert_eq!(ratings.average(), 5.0);
        assert_eq!(ratings.genuine_average(), 5.0);

        let ratings = Ratings::new(4.2, Some(-1.0));
        assert!((ratings.average() - 4.2).abs() < 1e-9);
        assert_eq!(ratings.genuine_average(), 0.0);
    }

    #[test]
    fn default_summary_text() {
        assert_eq!(
            ReviewSummary::default_text(0, Sentiment::Positive),
            "No reviews available for this product."
        );
        assert_eq!(
            ReviewSummary::default_text(12, Sentiment::Negative),
            "Based on 12 genuine reviews, this product has received mostly negative feedback."
        );
    }

    #[test]
    fn analysis_result_keeps_counts_consistent() {
        let result = AnalysisResult::new(
            "Wireless Mouse",
            ReviewCounts::new(105, 45).unwrap(),
            Ratings::new(4.2, Some(4.5)),
            ReviewSummary::default(),
            SentimentBreakdown::default(),
        );
        assert_eq!(
            result.genuine_reviews() + result.fake_reviews(),
            result.total_reviews()
        );
        assert!((result.fake_percentage() - 30.0).abs() < 1e-9);
        assert_eq!(result.counts(), ReviewCounts::new(105, 45).unwrap());
    }

    #[test]
    fn confidence_accepts_fractions_and_percentages() {
        assert!((Confidence::from_raw(0.92).unwrap().as_fraction() - 0.92).abs() < 1e-9);
        assert!((Confidence::from_raw(85.0).unwrap().as_fraction() - 0.85).abs() < 1e-9);
        assert_eq!(Confidence::from_raw(100.0).unwrap().as_fraction(), 1.0);
        assert_eq!(Confidence::from_raw(1.0).unwrap().as_percentage(), 100.0);
        assert!(matches!(
            Confidence::from_raw(250.0),
            Err(ApiError::Decode { .. })
        ));
        assert!(Confidence::from_raw(100.5).is_err());
        assert!(Confidence::from_raw(-0.1).is_err());
        assert!(Confidence::from_raw(f64::NAN).is_err());
    }

    #[test]
    fn detection_verdict_follows_flag() {
        let confidence = Confidence::from_raw(0.85).unwrap();
        let fake = DetectionResult::new(true, confidence, ReviewFeatures::default());
        assert_eq!(fake.verdict(), Verdict::Fake);

        let genuine = DetectionResult::new(false, confidence, ReviewFeatures::default());
        assert_eq!(genuine.verdict(), Verdict::Genuine);
    }

    #[test]
    fn stats_serialize_with_derived_percentage() {
        let stats = DashboardStats::new(ReviewCounts::new(210, 90).unwrap(), 3, 3.9)
            .with_verified_purchases(120);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_reviews"], 300);
        assert_eq!(json["fake_percentage"], 30.0);
        assert_eq!(json["verified_purchases"], 120);
    }
}
