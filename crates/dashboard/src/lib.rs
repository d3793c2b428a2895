// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Request lifecycle and screens of the review dashboard
//!
//! This crate holds everything between the analysis service and whatever
//! draws the dashboard: per-screen request controllers, the notification
//! stream for toasts, navigation, and view models ready for rendering.
//!
//! # Architecture
//!
//! - [`controller`]: [`RequestController`] tracks `Idle -> Pending -> Succeeded | Failed`
//!   for one kind of request, with cancel-and-replace for overlapping submissions
//! - [`notification`]: [`Notifier`] broadcasts in-progress, success, failure and
//!   warning notifications
//! - [`screen`]: [`Dashboard`] owns the controllers of each [`Screen`] and resets
//!   them on navigation
//! - [`render`]: view models with the display rules of the dashboard
//! - [`state`]: [`RequestState`], [`RequestId`] and [`Outcome`]
//!
//! Controllers publish state through `tokio::sync::watch`, so a renderer can
//! subscribe and redraw on every change without polling.

pub mod controller;
pub mod notification;
pub mod render;
pub mod screen;
pub mod state;

pub use controller::*;
pub use notification::*;
pub use render::{AnalysisView, Badge, DetectionView, OverviewView, PanelView, StatsView};
pub use screen::*;
pub use state::*;
