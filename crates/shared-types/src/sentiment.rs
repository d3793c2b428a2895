// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Overall sentiment labels

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall sentiment of a set of reviews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Reviews are mostly positive
    Positive,
    /// Reviews are mostly negative
    Negative,
    /// Opinions are mixed or carry no signal
    #[default]
    Neutral,
}

impl Sentiment {
    /// Derive an overall sentiment from positive and negative review counts
    ///
    /// Ties, including the empty case, are neutral.
    pub fn from_counts(positive: u64, negative: u64) -> Self {
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }

    /// Parse a wire label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" | "mixed" => Some(Sentiment::Neutral),
            _ => None,
        }
    }

    /// Check if the sentiment is positive
    pub fn is_positive(&self) -> bool {
        matches!(self, Sentiment::Positive)
    }

    /// Check if the sentiment is negative
    pub fn is_negative(&self) -> bool {
        matches!(self, Sentiment::Negative)
    }

    /// Lowercase label as used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Sentence describing customer feedback with this sentiment
    pub fn feedback_phrase(&self) -> &'static str {
        match self {
            Sentiment::Positive => "this product has received overwhelmingly positive feedback",
            Sentiment::Negative => "this product has received mostly negative feedback",
            Sentiment::Neutral => "customer opinions about this product are mixed",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_from_counts() {
        assert_eq!(Sentiment::from_counts(10, 2), Sentiment::Positive);
        assert_eq!(Sentiment::from_counts(1, 7), Sentiment::Negative);
        assert_eq!(Sentiment::from_counts(3, 3), Sentiment::Neutral);
        assert_eq!(Sentiment::from_counts(0, 0), Sentiment::Neutral);
    }

    #[test]
    fn sentiment_from_label() {
        assert_eq!(Sentiment::from_label("positive"), Some(Sentiment::Positive));
        assert_eq!(Sentiment::from_label(" Negative "), Some(Sentiment::Negative));
        assert_eq!(Sentiment::from_label("mixed"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::from_label("ecstatic"), None);
    }

    #[test]
    fn sentiment_boolean_checks() {
        assert!(Sentiment::Positive.is_positive());
        assert!(!Sentiment::Positive.is_negative());
        assert!(Sentiment::Negative.is_negative());
        assert!(!Sentiment::Neutral.is_positive());
        assert!(!Sentiment::Neutral.is_negative());
    }

    #[test]
    fn serde_serialization() {
        assert_eq!(
            serde_json::to_string(&Sentiment::Positive).unwrap(),
            "\"positive\""
        );
        let deserialized: Sentiment = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(deserialized, Sentiment::Negative);
        assert!(serde_json::from_str::<Sentiment>("\"furious\"").is_err());
    }

    #[test]
    fn default_is_neutral() {
        assert_eq!(Sentiment::default(), Sentiment::Neutral);
    }
}
