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

//! Error types for CSV conversion and the recon store.

use recon_core::ReconError;
use std::path::PathBuf;
use thiserror::Error;

/// CSV and store error types.
///
/// # Examples
///
/// ```
/// use recon_csv::CsvError;
///
/// let err = CsvError::WidthMismatch {
///     expected: 4,
///     actual: 3,
///     row: 7,
/// };
///
/// assert_eq!(
///     err.to_string(),
///     "Row width mismatch: expected 4 columns, got 3 in row 7"
/// );
/// ```
#[derive(Debug, Error)]
pub enum CsvError {
    /// CSV parsing error at a specific line.
    #[error("CSV parse error at line {line}: {message}")]
    ParseError {
        /// Line number where the error occurred (1-based).
        line: usize,
        message: String,
    },

    /// A field could not be read as the type its column requires.
    ///
    /// # Examples
    ///
    /// ```
    /// use recon_csv::CsvError;
    ///
    /// let err = CsvError::TypeMismatch {
    ///     column: "Count".to_string(),
    ///     expected: "integer".to_string(),
    ///     value: "many".to_string(),
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Type mismatch in column 'Count': expected integer, got 'many'"
    /// );
    /// ```
    #[error("Type mismatch in column '{column}': expected {expected}, got '{value}'")]
    TypeMismatch {
        column: String,
        expected: String,
        value: String,
    },

    /// Missing required column.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Invalid header format or content.
    #[error("Invalid header at position {position}: {reason}")]
    InvalidHeader {
        /// Position of the invalid header (0-based).
        position: usize,
        reason: String,
    },

    /// Row has wrong number of columns.
    #[error("Row width mismatch: expected {expected} columns, got {actual} in row {row}")]
    WidthMismatch {
        expected: usize,
        actual: usize,
        /// Row number where the mismatch occurred (1-based).
        row: usize,
    },

    /// Row count exceeded the configured limit.
    ///
    /// ```
    /// use recon_csv::CsvError;
    ///
    /// let err = CsvError::SecurityLimit { limit: 10, actual: 11 };
    /// assert!(err.to_string().contains("Security limit"));
    /// ```
    #[error("Security limit exceeded: row count {actual} exceeds maximum {limit}")]
    SecurityLimit { limit: usize, actual: usize },

    /// A summary file name or `Date` cell is not a run timestamp.
    #[error("Invalid timestamp '{value}': expected format {format}")]
    InvalidTimestamp { value: String, format: String },

    /// A recon name that cannot be used as a directory name.
    #[error("Invalid recon name '{0}'")]
    InvalidReconName(String),

    /// A recon with this name already has an outputs directory.
    #[error("Recon '{0}' already exists")]
    ReconExists(String),

    /// No summary has been saved for the recon yet.
    #[error("No summaries found for recon '{name}' in {}", dir.display())]
    NoSummaries { name: String, dir: PathBuf },

    #[error("No pipeline saved for recon '{0}'")]
    PipelineNotFound(String),

    /// I/O error during reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the underlying CSV library.
    #[error("CSV library error: {0}")]
    CsvLib(#[from] csv::Error),

    /// Pipeline (de)serialisation error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Table or report error raised while converting.
    #[error(transparent)]
    Recon(#[from] ReconError),
}

/// Convenience type alias for `Result` with `CsvError`.
pub type Result<T> = std::result::Result<T, CsvError>;

impl CsvError {
    /// Attach the offending column and line to a parse failure.
    pub fn with_context(self, context: String) -> Self {
        match self {
            CsvError::ParseError { line, message } => CsvError::ParseError {
                line,
                message: format!("{} ({})", message, context),
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recon_error_is_transparent() {
        let err = CsvError::from(ReconError::UnknownColumn("Rent".to_string()));
        assert_eq!(
            err.to_string(),
            ReconError::UnknownColumn("Rent".to_string()).to_string()
        );
    }

    #[test]
    fn test_with_context_only_touches_parse_errors() {
        let err = CsvError::ParseError {
            line: 3,
            message: "bad quote".to_string(),
        }
        .with_context("in column 'Tenant'".to_string());
        assert_eq!(
            err.to_string(),
            "CSV parse error at line 3: bad quote (in column 'Tenant')"
        );

        let err = CsvError::MissingColumn("Date".to_string()).with_context("ignored".to_string());
        assert_eq!(err.to_string(), "Missing required column: Date");
    }

    #[test]
    fn test_no_summaries_message() {
        let err = CsvError::NoSummaries {
            name: "rent".to_string(),
            dir: PathBuf::from("outputs/rent"),
        };
        assert_eq!(
            err.to_string(),
            "No summaries found for recon 'rent' in outputs/rent"
        );
    }
}
