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

//! Declarative, replayable recon pipelines.
//!
//! A [`Pipeline`] describes how a recon table is built from its source tables:
//! a list of input slots, an ordered list of typed [`Step`]s over a named table
//! environment, and the name of the table handed to the report aggregator.
//! Rerunning a recon against fresh data means binding new tables to the same
//! input slots and running the same steps again.
//!
//! Pipelines serialise to JSON:
//!
//! ```
//! use recon_core::Pipeline;
//!
//! let json = r#"{
//!   "inputs": ["ledger", "bank"],
//!   "steps": [
//!     {"op": "merge", "left": "ledger", "right": "bank",
//!      "left_on": ["Txn"], "right_on": ["Txn"], "into": "merged"},
//!     {"op": "compare_numbers", "table": "merged",
//!      "left": "Amount_x", "right": "Amount_y", "tolerance": 0.5,
//!      "column": "Amount Check"}
//!   ],
//!   "result": "merged"
//! }"#;
//!
//! let pipeline: Pipeline = serde_json::from_str(json).unwrap();
//! assert_eq!(pipeline.steps.len(), 2);
//! ```

use crate::compare::{
    compare_number_values, compare_string_values, StringMetric, DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::error::{ReconError, Result};
use crate::table::{Column, ConcatJoin, MergeHow, Table};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

fn default_suffixes() -> (String, String) {
    ("_x".to_string(), "_y".to_string())
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

/// One transformation over the pipeline's table environment.
///
/// Steps with an `into` field write their result under that name (the source
/// table otherwise); the other steps replace their table in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Drop rows whose value in `column` has one of the given textual forms.
    FilterOut {
        table: String,
        column: String,
        values: Vec<String>,
    },
    /// Keep only rows whose value in `column` has the given textual form.
    FilterEquals {
        table: String,
        column: String,
        value: String,
    },
    RenameColumns {
        table: String,
        renames: BTreeMap<String, String>,
    },
    /// Replace every occurrence of `find` with `replace` in a text column.
    Substitute {
        table: String,
        column: String,
        find: String,
        replace: String,
    },
    Concat {
        tables: Vec<String>,
        into: String,
        #[serde(default)]
        join: ConcatJoin,
    },
    DropDuplicates {
        table: String,
        #[serde(default)]
        subset: Vec<String>,
        #[serde(default)]
        into: Option<String>,
    },
    DropColumns {
        table: String,
        columns: Vec<String>,
        #[serde(default)]
        into: Option<String>,
    },
    Merge {
        left: String,
        right: String,
        left_on: Vec<String>,
        right_on: Vec<String>,
        #[serde(default)]
        how: MergeHow,
        #[serde(default = "default_suffixes")]
        suffixes: (String, String),
        into: String,
    },
    MoveColumn {
        table: String,
        column: String,
        position: usize,
    },
    /// Sort columns by name.
    SortColumns { table: String },
    /// Add a check column comparing two numeric columns.
    CompareNumbers {
        table: String,
        left: String,
        right: String,
        #[serde(default)]
        tolerance: f64,
        column: String,
        #[serde(default)]
        position: Option<usize>,
    },
    /// Add a check column comparing two columns as text.
    CompareStrings {
        table: String,
        left: String,
        right: String,
        #[serde(default = "default_similarity_threshold")]
        similarity_threshold: f64,
        #[serde(default)]
        metric: StringMetric,
        column: String,
        #[serde(default)]
        position: Option<usize>,
    },
}

impl Step {
    /// Operation name, as written in the `op` field.
    pub fn name(&self) -> &'static str {
        match self {
            Step::FilterOut { .. } => "filter_out",
            Step::FilterEquals { .. } => "filter_equals",
            Step::RenameColumns { .. } => "rename_columns",
            Step::Substitute { .. } => "substitute",
            Step::Concat { .. } => "concat",
            Step::DropDuplicates { .. } => "drop_duplicates",
            Step::DropColumns { .. } => "drop_columns",
            Step::Merge { .. } => "merge",
            Step::MoveColumn { .. } => "move_column",
            Step::SortColumns { .. } => "sort_columns",
            Step::CompareNumbers { .. } => "compare_numbers",
            Step::CompareStrings { .. } => "compare_strings",
        }
    }

    /// Apply the step to `env`.
    pub fn apply(&self, env: &mut BTreeMap<String, Table>) -> Result<()> {
        match self {
            Step::FilterOut {
                table,
                column,
                values,
            } => {
                let filtered = lookup(env, table)?
                    .filter_column(column, |v| !values.iter().any(|s| *s == v.to_string()))?;
                env.insert(table.clone(), filtered);
            }
            Step::FilterEquals {
                table,
                column,
                value,
            } => {
                let filtered =
                    lookup(env, table)?.filter_column(column, |v| v.to_string() == *value)?;
                env.insert(table.clone(), filtered);
            }
            Step::RenameColumns { table, renames } => {
                let renamed = lookup(env, table)?.rename_columns(renames)?;
                env.insert(table.clone(), renamed);
            }
            Step::Substitute {
                table,
                column,
                find,
                replace,
            } => {
                if find.is_empty() {
                    return Err(ReconError::invalid_parameter("find", "must not be empty"));
                }
                let substituted = lookup(env, table)?.map_column(column, |v| match v {
                    Value::String(s) => Value::String(s.replace(find.as_str(), replace)),
                    other => other.clone(),
                })?;
                env.insert(table.clone(), substituted);
            }
            Step::Concat { tables, into, join } => {
                let sources = tables
                    .iter()
                    .map(|name| lookup(env, name))
                    .collect::<Result<Vec<_>>>()?;
                let combined = Table::concat(&sources, *join)?;
                env.insert(into.clone(), combined);
            }
            Step::DropDuplicates {
                table,
                subset,
                into,
            } => {
                let deduped = lookup(env, table)?.drop_duplicates(subset)?;
                env.insert(into.clone().unwrap_or_else(|| table.clone()), deduped);
            }
            Step::DropColumns {
                table,
                columns,
                into,
            } => {
                let dropped = lookup(env, table)?.drop_columns(columns)?;
                env.insert(into.clone().unwrap_or_else(|| table.clone()), dropped);
            }
            Step::Merge {
                left,
                right,
                left_on,
                right_on,
                how,
                suffixes,
                into,
            } => {
                let merged = lookup(env, left)?.merge(
                    lookup(env, right)?,
                    left_on,
                    right_on,
                    *how,
                    (suffixes.0.as_str(), suffixes.1.as_str()),
                )?;
                env.insert(into.clone(), merged);
            }
            Step::MoveColumn {
                table,
                column,
                position,
            } => {
                let moved = lookup(env, table)?.move_column(column, *position)?;
                env.insert(table.clone(), moved);
            }
            Step::SortColumns { table } => {
                let sorted = lookup(env, table)?.sort_columns();
                env.insert(table.clone(), sorted);
            }
            Step::CompareNumbers {
                table,
                left,
                right,
                tolerance,
                column,
                position,
            } => {
                let source = lookup(env, table)?;
                let cells = compare_number_values(
                    &source.require_column(left)?.values,
                    &source.require_column(right)?.values,
                    *tolerance,
                )?;
                let updated = with_check_column(source, column, cells, *position)?;
                env.insert(table.clone(), updated);
            }
            Step::CompareStrings {
                table,
                left,
                right,
                similarity_threshold,
                metric,
                column,
                position,
            } => {
                let source = lookup(env, table)?;
                let cells = compare_string_values(
                    &source.require_column(left)?.values,
                    &source.require_column(right)?.values,
                    *similarity_threshold,
                    *metric,
                )?;
                let updated = with_check_column(source, column, cells, *position)?;
                env.insert(table.clone(), updated);
            }
        }
        Ok(())
    }
}

fn lookup<'a>(env: &'a BTreeMap<String, Table>, name: &str) -> Result<&'a Table> {
    env.get(name)
        .ok_or_else(|| ReconError::UnknownTable(name.to_string()))
}

fn with_check_column(
    source: &Table,
    name: &str,
    cells: Vec<Value>,
    position: Option<usize>,
) -> Result<Table> {
    let mut table = source.clone();
    let position = position.unwrap_or(table.column_count());
    table.insert_column(position, Column::check(name, cells))?;
    Ok(table)
}

/// Tables produced by [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Every table in the environment after the last step.
    pub tables: BTreeMap<String, Table>,
    /// The table named by [`Pipeline::result`].
    pub result: Table,
}

/// A replayable recon recipe.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pipeline {
    /// Input slots that must be bound when the pipeline runs.
    pub inputs: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Name of the table passed on to the report aggregator.
    pub result: String,
}

impl Pipeline {
    pub fn new(inputs: Vec<String>, result: impl Into<String>) -> Self {
        Self {
            inputs,
            steps: Vec::new(),
            result: result.into(),
        }
    }

    /// Append a step (builder style).
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Run every step against the given input bindings.
    ///
    /// # Errors
    ///
    /// - [`ReconError::MissingInput`] if an input slot is unbound
    /// - [`ReconError::Step`] wrapping the first step failure
    /// - [`ReconError::UnknownTable`] if the result table was never produced
    pub fn run(&self, inputs: BTreeMap<String, Table>) -> Result<PipelineOutput> {
        for slot in &self.inputs {
            if !inputs.contains_key(slot) {
                return Err(ReconError::MissingInput(slot.clone()));
            }
        }
        for name in inputs.keys() {
            if !self.inputs.contains(name) {
                warn!(input = %name, "binding does not match any pipeline input slot");
            }
        }

        let mut env = inputs;
        for (idx, step) in self.steps.iter().enumerate() {
            debug!(step = idx + 1, op = step.name(), "applying pipeline step");
            step.apply(&mut env)
                .map_err(|e| e.in_step(idx + 1, step.name()))?;
        }

        let result = lookup(&env, &self.result)?.clone();
        Ok(PipelineOutput { tables: env, result })
    }
}
