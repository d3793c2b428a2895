// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Wire format of the review analysis backend
//!
//! Every payload is wrapped in a `{ "success": bool, "error": string }`
//! envelope. Two backend generations are in the wild and they disagree on
//! which fields they send, so every field here is optional and the
//! `into_*` conversions apply the normalization rules from `api_client`.

use std::collections::BTreeMap;

use api_client::{
    AnalysisResult, ApiError, Confidence, DashboardStats, DetectionResult, Ratings, ReviewCounts,
    ReviewFeatures, ReviewSummary, SentimentBreakdown,
};
use serde::{Deserialize, Serialize};
use shared_types::{Sentiment, Verdict};
use tracing::warn;

/// Response envelope shared by every `/api` endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

/// Body of a non-2xx response
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /api/analyze` request body
#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub product_name: &'a str,
}

/// `POST /api/detect-fake` request body
#[derive(Debug, Serialize)]
pub(crate) struct DetectRequest<'a> {
    pub review_text: &'a str,
}

/// `GET /` payload
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Liveness {
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /api/products` payload
#[derive(Debug, Deserialize)]
pub(crate) struct ProductsPayload {
    #[serde(default)]
    pub products: Option<Vec<String>>,
}

impl ProductsPayload {
    pub fn into_products(self) -> Result<Vec<String>, ApiError> {
        let products = self
            .products
            .ok_or_else(|| ApiError::decode("response is missing the product list"))?;

        Ok(products
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }
}

/// `GET /api/stats` payload
#[derive(Debug, Deserialize)]
pub(crate) struct StatsPayload {
    #[serde(default)]
    pub stats: Option<WireStats>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireStats {
    #[serde(default)]
    total_reviews: Option<u64>,
    #[serde(default)]
    genuine_reviews: Option<u64>,
    #[serde(default)]
    fake_reviews: Option<u64>,
    #[serde(default)]
    total_products: Option<u64>,
    #[serde(default)]
    avg_rating: Option<f64>,
    #[serde(default)]
    categories: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    verified_purchases: Option<u64>,
}

impl StatsPayload {
    pub fn into_stats(self) -> Result<DashboardStats, ApiError> {
        let stats = self
            .stats
            .ok_or_else(|| ApiError::decode("response is missing stats"))?;

        let counts =
            ReviewCounts::resolve(stats.total_reviews, stats.genuine_reviews, stats.fake_reviews)?;

        Ok(DashboardStats::new(
            counts,
            stats.total_products.unwrap_or_default(),
            stats.avg_rating.unwrap_or_default(),
        )
        .with_categories(stats.categories.unwrap_or_default())
        .with_verified_purchases(stats.verified_purchases.unwrap_or_default()))
    }
}

/// `POST /api/analyze` payload
#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzePayload {
    #[serde(default)]
    pub data: Option<WireAnalysis>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireAnalysis {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    summary: WireSummary,
    #[serde(default)]
    sentiment: WireSentiment,
    #[serde(default)]
    fake_stats: WireFakeStats,
}

#[derive(Debug, Default, Deserialize)]
struct WireSummary {
    #[serde(default, alias = "text")]
    summary_text: Option<String>,
    #[serde(default)]
    pros: Vec<String>,
    #[serde(default)]
    cons: Vec<String>,
    #[serde(default, alias = "total_reviews")]
    review_count: Option<u64>,
    #[serde(default)]
    avg_rating: Option<f64>,
    #[serde(default)]
    positive_percentage: Option<f64>,
    #[serde(default)]
    negative_percentage: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct WireSentiment {
    #[serde(default)]
    overall_sentiment: Option<String>,
    #[serde(default)]
    positive_count: u64,
    #[serde(default)]
    negative_count: u64,
    #[serde(default)]
    neutral_count: u64,
    #[serde(default)]
    total_reviews: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct WireFakeStats {
    #[serde(default)]
    total_reviews: Option<u64>,
    #[serde(default)]
    genuine_reviews: Option<u64>,
    #[serde(default)]
    fake_reviews: Option<u64>,
    #[serde(default)]
    avg_rating: Option<f64>,
    #[serde(default)]
    genuine_avg_rating: Option<f64>,
}

impl AnalyzePayload {
    /// Normalize the payload, falling back to `requested` for a missing name
    pub fn into_result(self, requested: &str) -> Result<AnalysisResult, ApiError> {
        let data = self
            .data
            .ok_or_else(|| ApiError::decode("response is missing analysis data"))?;

        let WireAnalysis {
            product_name,
            summary,
            sentiment,
            fake_stats,
        } = data;

        let counts = ReviewCounts::resolve(
            fake_stats
                .total_reviews
                .or(summary.review_count)
                .or(sentiment.total_reviews),
            fake_stats.genuine_reviews,
            fake_stats.fake_reviews,
        )?;

        let overall = sentiment.overall_sentiment.as_deref().and_then(|label| {
            let parsed = Sentiment::from_label(label);
            if parsed.is_none() {
                warn!(label, "unknown sentiment label, deriving from counts");
            }
            parsed
        });
        let breakdown = SentimentBreakdown::new(
            overall,
            sentiment.positive_count,
            sentiment.negative_count,
            sentiment.neutral_count,
        );

        let ratings = Ratings::new(
            fake_stats
                .avg_rating
                .or(summary.avg_rating)
                .unwrap_or_default(),
            fake_stats.genuine_avg_rating,
        );

        let text = summary
            .summary_text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| {
                ReviewSummary::default_text(counts.genuine(), breakdown.overall())
            });
        let review_summary = ReviewSummary::new(
            text,
            summary.pros,
            summary.cons,
            summary
                .positive_percentage
                .unwrap_or_else(|| breakdown.positive_percentage()),
            summary
                .negative_percentage
                .unwrap_or_else(|| breakdown.negative_percentage()),
        );

        let product_name = product_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| requested.to_string());

        Ok(AnalysisResult::new(
            product_name,
            counts,
            ratings,
            review_summary,
            breakdown,
        ))
    }
}

/// `POST /api/detect-fake` payload
#[derive(Debug, Deserialize)]
pub(crate) struct DetectPayload {
    #[serde(default)]
    is_fake: Option<bool>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    verdict: Option<String>,
    #[serde(default)]
    features: Option<WireFeatures>,
}

#[derive(Debug, Default, Deserialize)]
struct WireFeatures {
    #[serde(default, alias = "review_length_words")]
    review_length: Option<u64>,
    #[serde(default)]
    char_count: Option<u64>,
    #[serde(default)]
    exclamation_count: Option<u64>,
    #[serde(default)]
    question_count: Option<u64>,
    #[serde(default)]
    capital_ratio: Option<f64>,
    #[serde(default)]
    repetition_ratio: Option<f64>,
    #[serde(default)]
    generic_word_count: Option<u64>,
    #[serde(default)]
    all_caps_words: Option<u64>,
}

impl WireFeatures {
    // Reported values win; anything the backend left out comes from `local`.
    fn merge(self, local: ReviewFeatures) -> ReviewFeatures {
        ReviewFeatures {
            review_length_words: self.review_length.unwrap_or(local.review_length_words),
            char_count: self.char_count.unwrap_or(local.char_count),
            exclamation_count: self.exclamation_count.unwrap_or(local.exclamation_count),
            question_count: self.question_count.unwrap_or(local.question_count),
            capital_ratio: self
                .capital_ratio
                .filter(|ratio| ratio.is_finite())
                .map_or(local.capital_ratio, |ratio| ratio.clamp(0.0, 1.0)),
            repetition_ratio: self
                .repetition_ratio
                .filter(|ratio| ratio.is_finite())
                .map_or(local.repetition_ratio, |ratio| ratio.clamp(0.0, 1.0)),
            generic_word_count: self.generic_word_count.unwrap_or(local.generic_word_count),
            all_caps_words: self.all_caps_words.unwrap_or(local.all_caps_words),
        }
    }
}

impl DetectPayload {
    /// Normalize the payload; features missing from it are extracted from `review_text`
    pub fn into_result(self, review_text: &str) -> Result<DetectionResult, ApiError> {
        let is_fake = self
            .is_fake
            .ok_or_else(|| ApiError::decode("response is missing is_fake"))?;
        let confidence = self
            .confidence
            .ok_or_else(|| ApiError::decode("response is missing confidence"))
            .and_then(Confidence::from_raw)?;

        let verdict = Verdict::from_is_fake(is_fake);
        if let Some(reported) = self.verdict.as_deref()
            && !reported.trim().eq_ignore_ascii_case(verdict.label())
        {
            warn!(
                reported,
                derived = verdict.label(),
                "backend verdict disagrees with is_fake, using is_fake"
            );
        }

        let local = ReviewFeatures::extract(review_text);
        let features = match self.features {
            Some(reported) => reported.merge(local),
            None => local,
        };

        Ok(DetectionResult::new(is_fake, confidence, features))
    }
}
