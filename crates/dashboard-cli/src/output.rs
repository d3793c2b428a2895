// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Output formatting for the CLI
//!
//! Results go to the output writer (stdout), notifications and errors to
//! the diagnostics writer (stderr), so `--json` output stays machine-readable.

use std::{fmt::Display, io::Write};

use dashboard::Notification;
use serde::Serialize;
use serde_json::json;

use crate::error::CliResult;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Rendered views
    #[default]
    Text,
    /// Normalized results as pretty-printed JSON
    Json,
}

/// Output handler for CLI results and messages
#[derive(Debug)]
pub struct Output<W, E> {
    format: OutputFormat,
    out: W,
    diagnostics: E,
}

impl<W: Write, E: Write> Output<W, E> {
    /// Create a new output handler
    pub fn new(format: OutputFormat, out: W, diagnostics: E) -> Self {
        Self {
            format,
            out,
            diagnostics,
        }
    }

    /// Selected output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Print a result: its rendered view as text, or `value` as JSON
    pub fn result<V, J>(&mut self, view: &V, value: &J) -> CliResult<()>
    where
        V: Display + ?Sized,
        J: Serialize + ?Sized,
    {
        match self.format {
            OutputFormat::Text => write!(self.out, "{view}")?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, value)?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    /// Print a failure message
    pub fn failure(&mut self, message: &str) -> CliResult<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.diagnostics, "Error: {message}")?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, &json!({ "error": message }))?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    /// Print a notification
    pub fn notification(&mut self, notification: &Notification) -> CliResult<()> {
        writeln!(self.diagnostics, "{notification}")?;
        Ok(())
    }

    /// Consume the handler, returning its writers
    pub fn into_inner(self) -> (W, E) {
        (self.out, self.diagnostics)
    }
}
