// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Subcommands
//!
//! `overview`, `analyze` and `detect` go through the same controllers a
//! graphical dashboard would use. Their notifications are printed before the
//! final state is rendered. `health`, `stats` and `products` are single reads
//! and call the service directly.

use std::{fmt::Display, io::Write, path::PathBuf, process::ExitCode, sync::Arc, time::Instant};

use api_client::{AnalysisService, HealthCheckResult};
use clap::{Args, Subcommand};
use dashboard::{
    AnalysisView, Dashboard, DetectionView, Notification, Outcome, OverviewView, RequestState,
    StatsView,
};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::{
    error::{CliError, CliResult},
    output::Output,
};

/// Dashboard commands
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check that the analysis backend is reachable
    Health,
    /// Show aggregate review statistics
    Stats,
    /// List the products available for analysis
    Products,
    /// Show statistics and the product catalogue together
    Overview,
    /// Analyze all reviews of a product
    Analyze(AnalyzeArgs),
    /// Classify a single review as fake or genuine
    Detect(DetectArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Health => "health",
            Command::Stats => "stats",
            Command::Products => "products",
            Command::Overview => "overview",
            Command::Analyze(_) => "analyze",
            Command::Detect(_) => "detect",
        }
    }
}

/// Arguments of `analyze`
#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Product name, as listed by `products`
    pub product: String,
}

/// Arguments of `detect`
#[derive(Debug, Clone, Args)]
pub struct DetectArgs {
    /// Review text
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the review text from a file
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,
}

impl DetectArgs {
    async fn review_text(&self) -> CliResult<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CliError::Input {
                    path: path.clone(),
                    source,
                }),
            (None, None) => Ok(String::new()),
        }
    }
}

/// Process exit status of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The command produced its result
    Success,
    /// The service failed or reported itself down
    Failed,
    /// Input was rejected before anything was sent
    Rejected,
}

impl Exit {
    /// Numeric process exit code
    pub fn code(self) -> u8 {
        match self {
            Exit::Success => 0,
            Exit::Failed => 1,
            Exit::Rejected => 2,
        }
    }
}

impl From<Outcome> for Exit {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Succeeded => Exit::Success,
            // Nothing else submits on a CLI controller, so superseded means lost
            Outcome::Failed | Outcome::Superseded => Exit::Failed,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Run `command` against `service`
///
/// # Errors
///
/// Returns `CliError` only when output cannot be written or an input file
/// cannot be read. Service failures are printed and reported as [`Exit::Failed`].
pub async fn execute<S, W, E>(
    command: Command,
    service: Arc<S>,
    output: &mut Output<W, E>,
) -> CliResult<Exit>
where
    S: AnalysisService,
    W: Write,
    E: Write,
{
    debug!(command = command.name(), service = service.name(), "executing command");

    let dashboard = Dashboard::new(Arc::clone(&service));
    let mut notifications = dashboard.notifications();

    match command {
        Command::Health => health(service.as_ref(), output).await,
        Command::Products => products(service.as_ref(), output).await,
        Command::Stats => stats(service.as_ref(), output).await,
        Command::Overview => {
            let overview = &dashboard.dashboard().overview;
            let outcome = overview.load_overview().await;
            print_notifications(&mut notifications, output)?;
            report(output, &overview.state(), |loaded| {
                (OverviewView::from(loaded), loaded)
            })?;
            Ok(outcome.into())
        }
        Command::Analyze(args) => {
            let analysis = &dashboard.dashboard().analysis;
            let submitted = analysis.submit_product_analysis(&args.product).await;
            print_notifications(&mut notifications, output)?;
            let Ok(outcome) = submitted else {
                return Ok(Exit::Rejected);
            };
            report(output, &analysis.state(), |result| {
                (AnalysisView::from(result), result)
            })?;
            Ok(outcome.into())
        }
        Command::Detect(args) => {
            let text = args.review_text().await?;
            let detection = &dashboard.fake_detection().detection;
            let submitted = detection.submit_fake_detection(&text).await;
            print_notifications(&mut notifications, output)?;
            let Ok(outcome) = submitted else {
                return Ok(Exit::Rejected);
            };
            report(output, &detection.state(), |result| {
                (DetectionView::from(result), result)
            })?;
            Ok(outcome.into())
        }
    }
}

async fn health<S, W, E>(service: &S, output: &mut Output<W, E>) -> CliResult<Exit>
where
    S: AnalysisService,
    W: Write,
    E: Write,
{
    let started = Instant::now();
    match service.health_check().await {
        Ok(status) => {
            let check = HealthCheckResult::new(service.name(), status, started.elapsed());
            let view = format!(
                "{}: {} ({} ms)\n",
                check.service,
                check.status.description(),
                check.response_time.as_millis()
            );
            output.result(&view, &check)?;
            Ok(if check.status.is_down() {
                Exit::Failed
            } else {
                Exit::Success
            })
        }
        Err(error) => {
            warn!(%error, "health check failed");
            output.failure(&error.user_message())?;
            Ok(Exit::Failed)
        }
    }
}

async fn stats<S, W, E>(service: &S, output: &mut Output<W, E>) -> CliResult<Exit>
where
    S: AnalysisService,
    W: Write,
    E: Write,
{
    match service.get_stats().await {
        Ok(stats) => {
            output.result(&StatsView::from(&stats), &stats)?;
            Ok(Exit::Success)
        }
        Err(error) => {
            warn!(%error, "failed to load statistics");
            output.failure(&error.user_message())?;
            Ok(Exit::Failed)
        }
    }
}

async fn products<S, W, E>(service: &S, output: &mut Output<W, E>) -> CliResult<Exit>
where
    S: AnalysisService,
    W: Write,
    E: Write,
{
    match service.list_products().await {
        Ok(products) => {
            let view = if products.is_empty() {
                "No products available\n".to_string()
            } else {
                products.iter().map(|product| format!("{product}\n")).collect()
            };
            output.result(&view, &products)?;
            Ok(Exit::Success)
        }
        Err(error) => {
            warn!(%error, "failed to list products");
            output.failure(&error.user_message())?;
            Ok(Exit::Failed)
        }
    }
}

fn print_notifications<W: Write, E: Write>(
    notifications: &mut broadcast::Receiver<Notification>,
    output: &mut Output<W, E>,
) -> CliResult<()> {
    while let Ok(notification) = notifications.try_recv() {
        output.notification(&notification)?;
    }
    Ok(())
}

/// Print a settled controller state
fn report<T, V, J, W, E>(
    output: &mut Output<W, E>,
    state: &RequestState<T>,
    present: impl FnOnce(&T) -> (V, &J),
) -> CliResult<()>
where
    V: Display,
    J: Serialize + ?Sized,
    W: Write,
    E: Write,
{
    match state {
        RequestState::Succeeded(result) => {
            let (view, value) = present(result);
            output.result(&view, value)
        }
        RequestState::Failed { message } => output.failure(message),
        RequestState::Idle | RequestState::Pending { .. } => Ok(()),
    }
}
