// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Screens and navigation
//!
//! Each screen owns its controllers; nothing is shared between screens
//! except the analysis service and the notification stream. Leaving a screen
//! resets its controllers, which abandons their in-flight requests.

use std::{fmt, str::FromStr, sync::Arc};

use api_client::AnalysisService;
use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    FakeDetectionController, Notification, Notifier, OverviewController,
    ProductAnalysisController, RequestController,
};

/// Screens the dashboard can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Overview statistics and per-product analysis
    #[default]
    Dashboard,
    /// Free-text fake review detection
    FakeDetection,
}

impl Screen {
    /// All screens, in navigation order
    pub const ALL: [Screen; 2] = [Screen::Dashboard, Screen::FakeDetection];

    /// Route name of the screen
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Dashboard => "dashboard",
            Screen::FakeDetection => "fake-detection",
        }
    }

    /// Heading shown at the top of the screen
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::FakeDetection => "Fake Review Detection",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Screen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| format!("unknown screen '{s}'"))
    }
}

/// Controllers of the dashboard screen
#[derive(Debug)]
pub struct DashboardScreen<S> {
    /// Statistics and product catalogue
    pub overview: Arc<OverviewController<S>>,
    /// Analysis of the selected product
    pub analysis: Arc<ProductAnalysisController<S>>,
}

/// Controllers of the fake detection screen
#[derive(Debug)]
pub struct FakeDetectionScreen<S> {
    /// Detection of the entered review
    pub detection: Arc<FakeDetectionController<S>>,
}

/// Top-level dashboard: the current screen and the controllers behind it
#[derive(Debug)]
pub struct Dashboard<S> {
    current: Screen,
    notifier: Notifier,
    dashboard: DashboardScreen<S>,
    fake_detection: FakeDetectionScreen<S>,
}

impl<S: AnalysisService> Dashboard<S> {
    /// Create a dashboard showing [`Screen::Dashboard`]
    pub fn new(service: Arc<S>) -> Self {
        let notifier = Notifier::new();
        Self {
            current: Screen::default(),
            dashboard: DashboardScreen {
                overview: Arc::new(RequestController::new(
                    Arc::clone(&service),
                    notifier.clone(),
                )),
                analysis: Arc::new(RequestController::new(
                    Arc::clone(&service),
                    notifier.clone(),
                )),
            },
            fake_detection: FakeDetectionScreen {
                detection: Arc::new(RequestController::new(service, notifier.clone())),
            },
            notifier,
        }
    }

    /// Screen currently shown
    pub fn current(&self) -> Screen {
        self.current
    }

    /// Subscribe to notifications from every controller
    pub fn notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// Controllers of the dashboard screen
    pub fn dashboard(&self) -> &DashboardScreen<S> {
        &self.dashboard
    }

    /// Controllers of the fake detection screen
    pub fn fake_detection(&self) -> &FakeDetectionScreen<S> {
        &self.fake_detection
    }

    /// Switch to `screen`, resetting the controllers of the screen being left
    ///
    /// Returns `false` when `screen` is already shown; nothing is reset then.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        if screen == self.current {
            return false;
        }

        debug!(from = %self.current, to = %screen, "navigating");
        match self.current {
            Screen::Dashboard => {
                self.dashboard.overview.reset();
                self.dashboard.analysis.reset();
            }
            Screen::FakeDetection => self.fake_detection.detection.reset(),
        }
        self.current = screen;
        true
    }
}
