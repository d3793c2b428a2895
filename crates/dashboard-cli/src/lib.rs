// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Command line front end for the review dashboard
//!
//! The `review-dashboard` binary loads [`DashboardConfig`], connects an
//! [`HttpAnalysisService`](backend_client::HttpAnalysisService) and runs one
//! [`Command`] through the dashboard controllers.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use commands::{AnalyzeArgs, Command, DetectArgs, Exit, execute};
pub use config::{ConfigSources, DashboardConfig, Environment, TimeoutSeconds};
pub use error::{CliError, CliResult, ConfigError};
pub use output::{Output, OutputFormat};
