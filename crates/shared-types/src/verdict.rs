// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Fake review detection verdicts

use std::fmt;

use serde::{Deserialize, Serialize};

/// Verdict label for a single review, always derived from the fake flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Review was classified as fake
    Fake,
    /// Review was classified as genuine
    Genuine,
}

impl Verdict {
    /// Verdict for the given fake flag
    pub fn from_is_fake(is_fake: bool) -> Self {
        if is_fake {
            Verdict::Fake
        } else {
            Verdict::Genuine
        }
    }

    /// Check if the verdict is fake
    pub fn is_fake(&self) -> bool {
        matches!(self, Verdict::Fake)
    }

    /// Uppercase label as used on the wire
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Fake => "FAKE",
            Verdict::Genuine => "GENUINE",
        }
    }

    /// Headline shown for this verdict
    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::Fake => "Fake Review Detected",
            Verdict::Genuine => "Genuine Review",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
