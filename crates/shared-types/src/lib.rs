// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the review dashboard
//!
//! This crate provides the small vocabulary types that are shared across every
//! crate in the workspace (validated user input, sentiment labels and detection
//! verdicts), avoiding circular dependencies between the client and controller
//! crates.

pub mod non_empty_string;
pub mod sentiment;
pub mod verdict;

pub use non_empty_string::{EmptyStringError, NonEmptyString};
pub use sentiment::Sentiment;
pub use verdict::Verdict;
