// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Review backend payload fixtures
//!
//! Canned responses in the shapes both backend generations produce.

use serde_json::{Value, json};

/// Analysis response from the current backend
pub fn analysis_response(product_name: &str, genuine: u64, fake: u64) -> Value {
    let total = genuine + fake;
    json!({
        "success": true,
        "data": {
            "product_name": product_name,
            "summary": {
                "summary_text": format!(
                    "Based on {genuine} genuine reviews, this product has received overwhelmingly positive feedback."
                ),
                "key_points": ["Comfortable to hold"],
                "pros": ["Comfortable to hold", "Long battery life"],
                "cons": ["Scroll wheel squeaks"],
                "overall_rating": 4,
                "review_count": genuine,
                "positive_percentage": 70.0,
                "negative_percentage": 10.0
            },
            "sentiment": {
                "overall_sentiment": "positive",
                "positive_count": 70,
                "negative_count": 10,
                "neutral_count": 20,
                "avg_score": 0.42,
                "aspect_analysis": {},
                "total_reviews": genuine
            },
            "fake_stats": {
                "total_reviews": total,
                "genuine_reviews": genuine,
                "fake_reviews": fake,
                "fake_percentage": 0.0,
                "avg_rating": 4.1,
                "genuine_avg_rating": 4.3
            },
            "reviews": []
        }
    })
}

/// Analysis response from the older backend, with counts split across objects
pub fn legacy_analysis_response() -> Value {
    json!({
        "success": true,
        "data": {
            "product_name": "Laptop",
            "summary": {
                "total_reviews": 20,
                "avg_rating": 3.8,
                "pros": ["Good quality", "Fast shipping"],
                "cons": ["Price could be better"]
            },
            "sentiment": {
                "positive_count": 9,
                "negative_count": 4
            },
            "fake_stats": {
                "total_reviews": 20,
                "genuine_reviews": 15,
                "fake_reviews": 5,
                "fake_percentage": 25.0
            }
        }
    })
}

/// Detection response including a feature breakdown
pub fn detection_response(is_fake: bool, confidence: f64) -> Value {
    json!({
        "success": true,
        "is_fake": is_fake,
        "confidence": confidence,
        "verdict": if is_fake { "FAKE" } else { "GENUINE" },
        "features": {
            "review_length": 6,
            "char_count": 35,
            "exclamation_count": 0,
            "question_count": 0,
            "capital_ratio": 0.03,
            "repetition_ratio": 0.17,
            "generic_word_count": 0,
            "all_caps_words": 0
        }
    })
}

/// Aggregate stats response
pub fn stats_response() -> Value {
    json!({
        "success": true,
        "stats": {
            "total_reviews": 1_250,
            "total_products": 12,
            "fake_reviews": 250,
            "genuine_reviews": 1_000,
            "fake_percentage": 20.0,
            "avg_rating": 4.1,
            "categories": { "Electronics": 800, "Clothing": 450 },
            "verified_purchases": 900
        }
    })
}
