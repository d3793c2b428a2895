// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the command line front end

use std::{io, path::PathBuf};

use backend_client::BackendError;
use thiserror::Error;

/// Configuration could not be loaded or is invalid
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The values were read but do not form a usable configuration
    #[error("invalid configuration: {message}")]
    Invalid {
        /// What is wrong with the configuration
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid configuration error
    pub fn invalid<T: ToString>(message: T) -> Self {
        Self::Invalid {
            message: message.to_string(),
        }
    }
}

/// Errors that stop a command before it can report a result
///
/// Service failures are not here: they end up in the controller state and
/// are reported through the exit code instead.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The backend client could not be created
    #[error("failed to create backend client: {0}")]
    Backend(#[from] BackendError),

    /// A review file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Input {
        /// File that was requested
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Writing to stdout or stderr failed
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// A result could not be encoded as JSON
    #[error("failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command line operations
pub type CliResult<T> = Result<T, CliError>;
