// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Non-empty string validation
//!
//! [`NonEmptyString`] is how user input (a selected product name, a pasted
//! review) crosses from the screen into the request layer. Holding one means
//! the input contains at least one non-whitespace character, so the service
//! layer never has to re-check for blank submissions.
//!
//! # Examples
//!
//! ```rust
//! use shared_types::NonEmptyString;
//!
//! let product = NonEmptyString::trimmed("  Wireless Mouse ").unwrap();
//! assert_eq!(product.as_str(), "Wireless Mouse");
//!
//! assert!(NonEmptyString::new("").is_err());
//! assert!(NonEmptyString::new("   \t\n  ").is_err());
//! ```

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Returned when a string is empty or contains only whitespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value cannot be empty or whitespace-only")]
pub struct EmptyStringError;

/// A string guaranteed to contain at least one non-whitespace character
///
/// Uses `Box<str>` internally; the value is immutable after construction.
///
/// ```rust
/// use shared_types::NonEmptyString;
///
/// let valid = NonEmptyString::new("hello").unwrap();
/// assert_eq!(valid.as_str(), "hello");
///
/// let invalid = NonEmptyString::new("   ");
/// assert!(invalid.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyString(Box<str>);

impl NonEmptyString {
    /// Create a new `NonEmptyString`, keeping surrounding whitespace as given
    ///
    /// # Validation Rules
    ///
    /// - Empty strings (`""`) are rejected
    /// - Whitespace-only strings (`"   "`, `"\t\n"`) are rejected
    /// - Strings with leading/trailing whitespace are accepted unchanged
    pub fn new(s: impl Into<String>) -> Result<Self, EmptyStringError> {
        let s = s.into();
        if s.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(NonEmptyString(s.into_boxed_str()))
        }
    }

    /// Create a new `NonEmptyString` from the trimmed input
    ///
    /// Form inputs are submitted trimmed, so this is the constructor screens use.
    pub fn trimmed(s: impl AsRef<str>) -> Result<Self, EmptyStringError> {
        Self::new(s.as_ref().trim())
    }

    /// Get a string slice of the contained value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string
    pub fn into_string(self) -> String {
        self.0.into_string()
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NonEmptyString {
    type Err = EmptyStringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for NonEmptyString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_input() {
        assert_eq!(NonEmptyString::new(""), Err(EmptyStringError));
        assert_eq!(NonEmptyString::new(" \t\n"), Err(EmptyStringError));
        assert_eq!(NonEmptyString::trimmed("   "), Err(EmptyStringError));
    }

    #[test]
    fn new_keeps_whitespace_and_trimmed_strips_it() {
        let kept = NonEmptyString::new(" Laptop ").unwrap();
        assert_eq!(kept.as_str(), " Laptop ");

        let trimmed = NonEmptyString::trimmed(" Laptop ").unwrap();
        assert_eq!(trimmed.as_str(), "Laptop");
    }

    #[test]
    fn parse_and_display() {
        let parsed: NonEmptyString = "Smartphone".parse().unwrap();
        assert_eq!(parsed.to_string(), "Smartphone");
        assert!("".parse::<NonEmptyString>().is_err());
    }

    #[test]
    fn serde_round_trip_validates() {
        let value = NonEmptyString::new("T-Shirt").unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), "\"T-Shirt\"");

        let back: NonEmptyString = serde_json::from_str("\"T-Shirt\"").unwrap();
        assert_eq!(back, value);

        assert!(serde_json::from_str::<NonEmptyString>("\"  \"").is_err());
    }
}
