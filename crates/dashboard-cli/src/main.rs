// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Review Dashboard
//!
//! Command line client for the fake review analysis backend.
//!
//! Commands:
//! - `review-dashboard health` - Check the backend is reachable
//! - `review-dashboard stats` - Aggregate review statistics
//! - `review-dashboard products` - Products available for analysis
//! - `review-dashboard overview` - Statistics and products together
//! - `review-dashboard analyze <PRODUCT>` - Analyze the reviews of a product
//! - `review-dashboard detect <TEXT>` - Classify a review as fake or genuine

use std::{io, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use backend_client::HttpAnalysisService;
use clap::Parser;
use dashboard_cli::{Command, DashboardConfig, Exit, Output, OutputFormat, execute};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Fake review analysis dashboard
#[derive(Debug, Parser)]
#[command(name = "review-dashboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Configuration file, applied after dashboard.json
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(cli).await {
        Ok(exit) => exit.into(),
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Exit> {
    let config = DashboardConfig::load(cli.config.as_deref())?;
    debug!(
        environment = %config.environment,
        base_url = %config.backend.base_url,
        "configuration loaded"
    );

    let service = Arc::new(HttpAnalysisService::new(config.to_backend_config())?);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut output = Output::new(format, io::stdout(), io::stderr());

    Ok(execute(cli.command, service, &mut output).await?)
}
