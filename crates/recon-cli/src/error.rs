// Dweve Recon - Data Reconciliation Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structured error types for the recon CLI.

use recon_core::ReconError;
use recon_csv::CsvError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for recon CLI operations.
///
/// # Examples
///
/// ```rust,no_run
/// use recon_cli::error::CliError;
///
/// fn read(path: &str) -> Result<String, CliError> {
///     std::fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed.
    #[error("I/O error for '{path}': {message}")]
    Io { path: PathBuf, message: String },

    /// Input file exceeds the configured size limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        path: PathBuf,
        actual: u64,
        max: u64,
        max_mb: u64,
    },

    /// Reading, writing or storing CSV data failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// A comparison, report or pipeline step failed.
    #[error("Recon error: {0}")]
    Recon(String),

    /// JSON serialization/deserialization error.
    #[error("JSON format error: {message}")]
    JsonFormat { message: String },

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<CsvError> for CliError {
    fn from(source: CsvError) -> Self {
        match source {
            CsvError::Recon(e) => e.into(),
            other => Self::Csv(other.to_string()),
        }
    }
}

impl From<ReconError> for CliError {
    fn from(source: ReconError) -> Self {
        Self::Recon(source.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: source.to_string(),
        }
    }
}
