// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Linguistic features of a single review
//!
//! These are the surface signals displayed alongside a detection verdict.
//! Backends may report them; when they do not, the client extracts them from
//! the submitted text so the detection panel is always complete.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Words that carry praise or blame without describing the product
const GENERIC_WORDS: [&str; 8] = [
    "best",
    "perfect",
    "amazing",
    "great",
    "excellent",
    "worst",
    "terrible",
    "awful",
];

/// Surface features of a review text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReviewFeatures {
    /// Number of whitespace-separated words
    pub review_length_words: u64,
    /// Number of characters
    pub char_count: u64,
    /// Number of `!` characters
    pub exclamation_count: u64,
    /// Number of `?` characters
    pub question_count: u64,
    /// Uppercase characters divided by all characters, in `[0, 1]`
    pub capital_ratio: f64,
    /// Occurrences of the most repeated word divided by the word count, in `[0, 1]`
    pub repetition_ratio: f64,
    /// Number of generic praise/blame words
    pub generic_word_count: u64,
    /// Number of words longer than one character written entirely in capitals
    pub all_caps_words: u64,
}

impl ReviewFeatures {
    /// Extract features from a review text
    #[allow(clippy::cast_precision_loss)]
    pub fn extract(text: &str) -> Self {
        let char_count = text.chars().count();
        let uppercase = text.chars().filter(|c| c.is_uppercase()).count();
        let capital_ratio = if char_count == 0 {
            0.0
        } else {
            uppercase as f64 / char_count as f64
        };

        let words: Vec<&str> = text.split_whitespace().collect();
        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for word in &lowered {
            *occurrences.entry(word.as_str()).or_default() += 1;
        }
        let repetition_ratio = occurrences
            .values()
            .max()
            .map_or(0.0, |max| *max as f64 / lowered.len() as f64);

        let generic_word_count = lowered
            .iter()
            .filter(|w| GENERIC_WORDS.contains(&w.as_str()))
            .count();

        let all_caps_words = words
            .iter()
            .filter(|w| w.chars().count() > 1 && is_all_caps(w))
            .count();

        Self {
            review_length_words: words.len() as u64,
            char_count: char_count as u64,
            exclamation_count: text.matches('!').count() as u64,
            question_count: text.matches('?').count() as u64,
            capital_ratio,
            repetition_ratio,
            generic_word_count: generic_word_count as u64,
            all_caps_words: all_caps_words as u64,
        }
    }
}

// A word counts as capitalised when it has at least one cased letter and no
// lowercase ones, so "WOW!!!" qualifies and "5!!!" does not.
fn is_all_caps(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_features() {
        let features = ReviewFeatures::extract("");
        assert_eq!(features, ReviewFeatures::default());
    }

    #[test]
    fn shouting_review() {
        let features = ReviewFeatures::extract("Best product ever!!! Amazing!!! 5 stars!!!");

        assert_eq!(features.review_length_words, 6);
        assert_eq!(features.exclamation_count, 9);
        assert_eq!(features.question_count, 0);
        assert_eq!(features.generic_word_count, 1);
        assert_eq!(features.all_caps_words, 0);
        assert!(features.capital_ratio > 0.0 && features.capital_ratio < 0.1);
    }

    #[test]
    fn all_caps_words_need_letters_and_length() {
        let features = ReviewFeatures::extract("WOW this is A GREAT buy 100%");
        // "WOW" and "GREAT" qualify; "A" is too short and "100%" has no letters
        assert_eq!(features.all_caps_words, 2);
        assert_eq!(features.generic_word_count, 1);
    }

    #[test]
    fn repetition_ratio_is_case_insensitive() {
        let features = ReviewFeatures::extract("good Good GOOD product");
        assert!((features.repetition_ratio - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn capital_ratio_counts_characters() {
        let features = ReviewFeatures::extract("ABcd");
        assert!((features.capital_ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(features.char_count, 4);
    }
}
