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

//! Error types for reconciliation operations.

use thiserror::Error;

/// Result type used throughout `recon-core`.
pub type Result<T> = std::result::Result<T, ReconError>;

/// Errors raised by the comparator, the table model, the report aggregator
/// and the pipeline runner.
///
/// # Examples
///
/// ```
/// use recon_core::ReconError;
///
/// let err = ReconError::ShapeMismatch { left: 3, right: 2 };
/// assert_eq!(
///     err.to_string(),
///     "Shape mismatch: left sequence has 3 values, right sequence has 2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconError {
    /// Comparator inputs are not index-aligned.
    #[error("Shape mismatch: left sequence has {left} values, right sequence has {right}")]
    ShapeMismatch {
        /// Length of the left-hand sequence.
        left: usize,
        /// Length of the right-hand sequence.
        right: usize,
    },

    /// A value could not be used where a specific type was required.
    #[error("Type mismatch in {context}: expected {expected}, got '{value}'")]
    TypeMismatch {
        /// Where the value was found (column name, argument position).
        context: String,
        /// Expected type description.
        expected: String,
        /// Textual form of the offending value.
        value: String,
    },

    /// A tolerance, threshold or position argument is out of range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Column lookup failed.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Two columns of one table share a name.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A column does not have one value per table row.
    #[error("Column '{column}' has {actual} values but the table has {expected} rows")]
    ColumnLength {
        /// Column name.
        column: String,
        /// Row count of the table.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A check column holds a value that cannot be compared to the outcome tags.
    #[error("Check column '{column}' holds a value that cannot be classified: '{value}'")]
    UnsupportedCheckValue {
        /// Check column name.
        column: String,
        /// Textual form of the value.
        value: String,
    },

    /// A pipeline step referenced a table that is not in its environment.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// A pipeline input slot was not bound to a table.
    #[error("Missing input binding for '{0}'")]
    MissingInput(String),

    /// A pipeline step failed.
    #[error("Pipeline step {index} ({step}) failed: {source}")]
    Step {
        /// 1-based step number.
        index: usize,
        /// Step operation name.
        step: String,
        /// Underlying error.
        #[source]
        source: Box<ReconError>,
    },

    /// The recon setup wizard received an event its current state does not accept.
    #[error("Invalid wizard transition: {event} is not accepted while {from}")]
    InvalidTransition {
        /// State the wizard was in.
        from: String,
        /// Event that was rejected.
        event: String,
    },
}

impl ReconError {
    /// Create a type mismatch error.
    pub fn type_mismatch(
        context: impl Into<String>,
        expected: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            context: context.into(),
            expected: expected.into(),
            value: value.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Wrap this error with the pipeline step that produced it.
    pub fn in_step(self, index: usize, step: impl Into<String>) -> Self {
        Self::Step {
            index,
            step: step.into(),
            source: Box::new(self),
        }
    }
}
