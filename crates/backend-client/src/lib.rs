// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the review analysis backend
//!
//! This crate provides the production implementation of the
//! [`api_client::AnalysisService`] trait. It owns the wire format of the
//! backend and turns every payload into the normalized result types of
//! `api_client`, so controllers never see raw JSON.
//!
//! # Architecture
//!
//! - **Client**: [`HttpAnalysisService`] - reqwest client with per-request
//!   timeouts and an `x-request-id` correlation header
//! - **Wire Format**: `wire` - lenient DTOs for both backend generations and
//!   their normalization into `api_client` types
//! - **Errors**: [`BackendError`] - transport-level failures, converted into the
//!   [`api_client::ApiError`] taxonomy at the trait boundary

pub mod http;
mod wire;

pub use http::*;
