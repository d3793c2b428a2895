// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Rendering contract
//!
//! View models turn normalized results into display-ready strings: counts
//! with thousands separators, percentages and ratings with one decimal, and
//! a badge for every value the UI colours. Any front end can draw them; the
//! `Display` impls are the plain-text rendering used by the CLI.

use std::fmt;

use api_client::{AnalysisResult, DashboardStats, DetectionResult};
use serde::Serialize;
use shared_types::Sentiment;

use crate::{Overview, RequestState};

/// Fake share above which a product is flagged
pub const FAKE_PERCENTAGE_ALERT_THRESHOLD: f64 = 30.0;

/// Colour class of a highlighted value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    /// Good news
    Success,
    /// Needs attention
    Danger,
    /// No signal either way
    Secondary,
}

impl Badge {
    fn for_sentiment(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Positive => Badge::Success,
            Sentiment::Negative => Badge::Danger,
            Sentiment::Neutral => Badge::Secondary,
        }
    }
}

/// Format a count with `,` thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

/// Format a percentage with one decimal, e.g. `30.0%`
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Format a star rating with one decimal, e.g. `4.2/5`
pub fn format_rating(value: f64) -> String {
    format!("{value:.1}/5")
}

/// Labelled value on a statistics card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    /// Card caption
    pub label: &'static str,
    /// Formatted value
    pub value: String,
}

/// Dashboard statistics panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsView {
    /// Headline cards in display order
    pub cards: Vec<StatCard>,
    /// Badge of the fake share card
    pub fake_badge: Badge,
    /// Review count per category, sorted by name
    pub categories: Vec<StatCard>,
}

impl From<&DashboardStats> for StatsView {
    fn from(stats: &DashboardStats) -> Self {
        let card = |label, value| StatCard { label, value };
        Self {
            cards: vec![
                card("Total Reviews", format_count(stats.total_reviews())),
                card("Genuine Reviews", format_count(stats.genuine_reviews())),
                card("Fake Reviews", format_count(stats.fake_reviews())),
                card("Fake Percentage", format_percentage(stats.fake_percentage())),
                card("Products", format_count(stats.total_products())),
                card("Average Rating", format_rating(stats.average_rating())),
                card(
                    "Verified Purchases",
                    format_count(stats.verified_purchases()),
                ),
            ],
            fake_badge: fake_badge(stats.fake_percentage()),
            categories: stats
                .categories()
                .iter()
                .map(|(name, count)| StatCard {
                    label: "category",
                    value: format!("{name}: {}", format_count(*count)),
                })
                .collect(),
        }
    }
}

impl fmt::Display for StatsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            writeln!(f, "{:<20} {}", format!("{}:", card.label), card.value)?;
        }
        if !self.categories.is_empty() {
            writeln!(f, "Categories:")?;
            for category in &self.categories {
                writeln!(f, "  {}", category.value)?;
            }
        }
        Ok(())
    }
}

fn fake_badge(fake_percentage: f64) -> Badge {
    if fake_percentage > FAKE_PERCENTAGE_ALERT_THRESHOLD {
        Badge::Danger
    } else {
        Badge::Success
    }
}

/// Dashboard overview: statistics plus the product selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewView {
    /// Statistics panel
    pub stats: StatsView,
    /// Products offered for analysis
    pub products: Vec<String>,
}

impl From<&Overview> for OverviewView {
    fn from(overview: &Overview) -> Self {
        Self {
            stats: StatsView::from(&overview.stats),
            products: overview.products.clone(),
        }
    }
}

impl fmt::Display for OverviewView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stats)?;
        if self.products.is_empty() {
            writeln!(f, "No products available")
        } else {
            writeln!(f, "Products:")?;
            for product in &self.products {
                writeln!(f, "  - {product}")?;
            }
            Ok(())
        }
    }
}

/// Product analysis panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisView {
    /// Product name
    pub title: String,
    /// Total review count
    pub total_reviews: String,
    /// Genuine review count
    pub genuine_reviews: String,
    /// Fake review count
    pub fake_reviews: String,
    /// Fake share, e.g. `30.0%`
    pub fake_percentage: String,
    /// Danger above the alert threshold, success otherwise
    pub fake_badge: Badge,
    /// Average rating over all reviews
    pub average_rating: String,
    /// Average rating over genuine reviews
    pub genuine_average_rating: String,
    /// Summary paragraph
    pub summary: String,
    /// Share of positive reviews
    pub positive_percentage: String,
    /// Share of negative reviews
    pub negative_percentage: String,
    /// Highlights from positive reviews
    pub pros: Vec<String>,
    /// Highlights from negative reviews
    pub cons: Vec<String>,
    /// Overall sentiment in capitals
    pub sentiment: String,
    /// Badge of the sentiment label
    pub sentiment_badge: Badge,
    /// `Positive: n | Negative: n | Neutral: n`
    pub sentiment_counts: String,
}

impl From<&AnalysisResult> for AnalysisView {
    fn from(result: &AnalysisResult) -> Self {
        let summary = result.summary();
        let sentiment = result.sentiment();
        Self {
            title: result.product_name().to_string(),
            total_reviews: format_count(result.total_reviews()),
            genuine_reviews: format_count(result.genuine_reviews()),
            fake_reviews: format_count(result.fake_reviews()),
            fake_percentage: format_percentage(result.fake_percentage()),
            fake_badge: fake_badge(result.fake_percentage()),
            average_rating: format_rating(result.average_rating()),
            genuine_average_rating: format_rating(result.genuine_average_rating()),
            summary: summary.text().to_string(),
            positive_percentage: format_percentage(summary.positive_percentage()),
            negative_percentage: format_percentage(summary.negative_percentage()),
            pros: summary.pros().to_vec(),
            cons: summary.cons().to_vec(),
            sentiment: sentiment.overall().as_str().to_uppercase(),
            sentiment_badge: Badge::for_sentiment(sentiment.overall()),
            sentiment_counts: format!(
                "Positive: {} | Negative: {} | Neutral: {}",
                format_count(sentiment.positive_count()),
                format_count(sentiment.negative_count()),
                format_count(sentiment.neutral_count())
            ),
        }
    }
}

impl fmt::Display for AnalysisView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        writeln!(f, "Fake Review Detection")?;
        writeln!(f, "  Total Reviews:   {}", self.total_reviews)?;
        writeln!(f, "  Genuine Reviews: {}", self.genuine_reviews)?;
        writeln!(f, "  Fake Reviews:    {}", self.fake_reviews)?;
        writeln!(f, "  Fake Percentage: {}", self.fake_percentage)?;
        writeln!(f, "Rating Information")?;
        writeln!(f, "  Average Rating:     {}", self.average_rating)?;
        writeln!(f, "  Genuine Avg Rating: {}", self.genuine_average_rating)?;
        writeln!(f, "Summary")?;
        writeln!(f, "  {}", self.summary)?;
        writeln!(
            f,
            "  Positive: {} | Negative: {}",
            self.positive_percentage, self.negative_percentage
        )?;
        write_list(f, "Pros", &self.pros)?;
        write_list(f, "Cons", &self.cons)?;
        writeln!(f, "Sentiment Analysis")?;
        writeln!(f, "  Overall Sentiment: {}", self.sentiment)?;
        writeln!(f, "  {}", self.sentiment_counts)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, heading: &str, items: &[String]) -> fmt::Result {
    writeln!(f, "{heading}")?;
    if items.is_empty() {
        return writeln!(f, "  (none)");
    }
    for item in items {
        writeln!(f, "  - {item}")?;
    }
    Ok(())
}

/// Row of the detection details table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRow {
    /// Feature caption
    pub label: &'static str,
    /// Formatted value
    pub value: String,
}

/// Fake review detection panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionView {
    /// `Fake Review Detected` or `Genuine Review`
    pub headline: &'static str,
    /// `FAKE` or `GENUINE`
    pub verdict: &'static str,
    /// Danger for fake reviews, success for genuine ones
    pub badge: Badge,
    /// Confidence as a percentage, e.g. `85.0%`
    pub confidence: String,
    /// Sentence explaining the verdict
    pub explanation: String,
    /// Feature breakdown
    pub features: Vec<FeatureRow>,
}

impl From<&DetectionResult> for DetectionView {
    fn from(result: &DetectionResult) -> Self {
        let verdict = result.verdict();
        let confidence = format_percentage(result.confidence().as_percentage());
        let features = result.features();
        let row = |label, value| FeatureRow { label, value };

        Self {
            headline: verdict.headline(),
            verdict: verdict.label(),
            badge: if verdict.is_fake() {
                Badge::Danger
            } else {
                Badge::Success
            },
            explanation: format!(
                "This review appears to be {} with {confidence} confidence.",
                verdict.label()
            ),
            confidence,
            features: vec![
                row(
                    "Review Length",
                    format!("{} words", format_count(features.review_length_words)),
                ),
                row("Exclamation Marks", format_count(features.exclamation_count)),
                row("Question Marks", format_count(features.question_count)),
                row(
                    "Capital Letter Ratio",
                    format_percentage(features.capital_ratio * 100.0),
                ),
                row(
                    "Repetition Ratio",
                    format_percentage(features.repetition_ratio * 100.0),
                ),
                row("Generic Words", format_count(features.generic_word_count)),
                row("All-Caps Words", format_count(features.all_caps_words)),
            ],
        }
    }
}

impl fmt::Display for DetectionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline)?;
        writeln!(f, "Confidence: {}", self.confidence)?;
        writeln!(f, "{}", self.explanation)?;
        writeln!(f, "Analysis Details")?;
        for feature in &self.features {
            writeln!(f, "  {:<22} {}", format!("{}:", feature.label), feature.value)?;
        }
        Ok(())
    }
}

/// What a screen panel shows for a controller state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "view", rename_all = "snake_case")]
pub enum PanelView<V> {
    /// Nothing requested yet
    Empty,
    /// Spinner
    Loading,
    /// Rendered result
    Ready(V),
    /// Error banner
    Error(String),
}

impl<V> PanelView<V> {
    /// Render a controller state
    pub fn from_state<'a, T>(state: &'a RequestState<T>) -> Self
    where
        V: From<&'a T>,
    {
        match state {
            RequestState::Idle => PanelView::Empty,
            RequestState::Pending { .. } => PanelView::Loading,
            RequestState::Succeeded(result) => PanelView::Ready(V::from(result)),
            RequestState::Failed { message } => PanelView::Error(message.clone()),
        }
    }
}

impl<V: fmt::Display> fmt::Display for PanelView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelView::Empty => Ok(()),
            PanelView::Loading => writeln!(f, "Loading..."),
            PanelView::Ready(view) => write!(f, "{view}"),
            PanelView::Error(message) => writeln!(f, "Error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use api_client::{
        Confidence, Ratings, ReviewCounts, ReviewFeatures, ReviewSummary, SentimentBreakdown,
    };

    use super::*;

    fn analysis(genuine: u64, fake: u64) -> AnalysisResult {
        AnalysisResult::new(
            "Wireless Mouse",
            ReviewCounts::new(genuine, fake).unwrap(),
            Ratings::new(4.24, Some(4.46)),
            ReviewSummary::new(
                "Mostly happy customers.",
                vec!["Good grip".to_string()],
                vec![],
                71.43,
                14.29,
            ),
            SentimentBreakdown::new(None, 75, 15, 15),
        )
    }

    #[test]
    fn counts_use_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn percentages_and_ratings_have_one_decimal() {
        assert_eq!(format_percentage(30.0), "30.0%");
        assert_eq!(format_percentage(28.66), "28.7%");
        assert_eq!(format_rating(4.24), "4.2/5");
    }

    #[test]
    fn analysis_badge_flags_high_fake_share() {
        let at_threshold = AnalysisView::from(&analysis(105, 45));
        assert_eq!(at_threshold.fake_percentage, "30.0%");
        assert_eq!(at_threshold.fake_badge, Badge::Success);

        let above = AnalysisView::from(&analysis(60, 40));
        assert_eq!(above.fake_badge, Badge::Danger);
    }

    #[test]
    fn analysis_view_fields() {
        let view = AnalysisView::from(&analysis(105, 45));
        assert_eq!(view.title, "Wireless Mouse");
        assert_eq!(view.total_reviews, "150");
        assert_eq!(view.average_rating, "4.2/5");
        assert_eq!(view.genuine_average_rating, "4.5/5");
        assert_eq!(view.positive_percentage, "71.4%");
        assert_eq!(view.sentiment, "POSITIVE");
        assert_eq!(view.sentiment_badge, Badge::Success);
        assert_eq!(view.sentiment_counts, "Positive: 75 | Negative: 15 | Neutral: 15");

        let text = view.to_string();
        assert!(text.contains("Fake Percentage: 30.0%"));
        assert!(text.contains("  (none)"));
    }

    #[test]
    fn detection_view_fields() {
        let result = DetectionResult::new(
            true,
            Confidence::from_raw(0.85).unwrap(),
            ReviewFeatures::extract("BEST PRODUCT EVER!!!"),
        );
        let view = DetectionView::from(&result);

        assert_eq!(view.headline, "Fake Review Detected");
        assert_eq!(view.confidence, "85.0%");
        assert_eq!(view.badge, Badge::Danger);
        assert_eq!(
            view.explanation,
            "This review appears to be FAKE with 85.0% confidence."
        );
        assert_eq!(view.features[0].value, "3 words");
        assert!(view.to_string().contains("Confidence: 85.0%"));
    }

    #[test]
    fn stats_view_cards() {
        let stats = DashboardStats::new(ReviewCounts::new(3_564, 1_436).unwrap(), 25, 4.06)
            .with_categories([("Electronics".to_string(), 2_500)].into_iter().collect());
        let view = StatsView::from(&stats);

        assert_eq!(view.cards[0].value, "5,000");
        assert_eq!(view.cards[3].value, "28.7%");
        assert_eq!(view.cards[5].value, "4.1/5");
        assert_eq!(view.fake_badge, Badge::Success);
        assert_eq!(view.categories[0].value, "Electronics: 2,500");
    }

    #[test]
    fn panel_follows_state() {
        let idle: RequestState<AnalysisResult> = RequestState::Idle;
        assert_eq!(PanelView::<AnalysisView>::from_state(&idle), PanelView::Empty);

        let failed: RequestState<AnalysisResult> = RequestState::Failed {
            message: "Unable to reach the analysis service".to_string(),
        };
        let panel = PanelView::<AnalysisView>::from_state(&failed);
        assert_eq!(
            panel.to_string(),
            "Error: Unable to reach the analysis service\n"
        );

        let done = RequestState::Succeeded(analysis(1, 0));
        assert!(matches!(
            PanelView::<AnalysisView>::from_state(&done),
            PanelView::Ready(_)
        ));
    }

    #[test]
    fn panel_serializes_with_state_tag() {
        let failed: PanelView<AnalysisView> = PanelView::Error("Analysis failed".to_string());
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({ "state": "error", "view": "Analysis failed" })
        );

        let loading: PanelView<AnalysisView> = PanelView::Loading;
        assert_eq!(
            serde_json::to_value(&loading).unwrap(),
            serde_json::json!({ "state": "loading" })
        );
        assert_eq!(
            serde_json::to_value(Badge::Danger).unwrap(),
            serde_json::json!("danger")
        );
    }
}
