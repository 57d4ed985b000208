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

//! Core data model and engines for data reconciliation.
//!
//! A recon merges two datasets, adds check columns that compare their
//! attributes row by row, and summarises the outcomes.
//!
//! # Comparators
//!
//! [`compare_numbers`] and [`compare_strings`] produce one [`Outcome`] per
//! row pair: `Match`, `Immaterial` (within tolerance or above the similarity
//! threshold) or `Fail` carrying the difference or similarity ratio.
//!
//! ```
//! use recon_core::{compare_numbers, compare_strings, Outcome};
//!
//! let outcomes = compare_numbers(&[1200.0, 950.0], &[1200.0, 900.0], 10.0).unwrap();
//! assert_eq!(outcomes, vec![Outcome::Match, Outcome::Fail(50.0)]);
//!
//! let outcomes = compare_strings(&["Acme Ltd"], &["Acme Ltd."], 80.0).unwrap();
//! assert_eq!(outcomes, vec![Outcome::Immaterial]);
//! ```
//!
//! # Reports
//!
//! [`build_recon_report`] counts the outcomes of every check column of a
//! [`Table`] and slices the table per outcome bucket.
//!
//! ```
//! use recon_core::{build_recon_report, Bucket, Column, Outcome, Table, Value};
//!
//! let table = Table::from_columns(vec![
//!     Column::new("Unit", vec![Value::from("A1"), Value::from("A2")]),
//!     Column::check(
//!         "Rent Check",
//!         vec![Value::Outcome(Outcome::Match), Value::Outcome(Outcome::Fail(25.0))],
//!     ),
//! ])
//! .unwrap();
//!
//! let report = build_recon_report(&table).unwrap();
//! assert_eq!(report.summary.count("Rent Check", Bucket::Match), 1);
//! assert_eq!(report.summary.count("Rent Check", Bucket::Failing), 1);
//! ```
//!
//! # Pipelines
//!
//! A [`Pipeline`] is a serialisable list of [`Step`]s (filters, concat,
//! merge, comparisons) that can be stored per recon and re-run against fresh
//! inputs.

mod chart;
mod compare;
mod dashboard;
mod error;
mod pipeline;
mod report;
mod table;
mod value;
mod wizard;

pub use chart::{BarSeries, GroupedBarChart};
pub use compare::{
    compare_number_values, compare_numbers, compare_string_values, compare_strings,
    compare_strings_with, similarity, StringMetric, DEFAULT_SIMILARITY_THRESHOLD,
    DEFAULT_TOLERANCE,
};
pub use dashboard::{DashboardTotals, FAIL};
pub use error::{ReconError, Result};
pub use pipeline::{Pipeline, PipelineOutput, Step};
pub use report::{
    build_recon_report, build_recon_report_at, classify_check_cell, OutcomeSlice, ReconReport,
    ReconSummary, SummaryRow, CHECK_OUTCOME_COLUMN, SUMMARY_COLUMNS, SUMMARY_DATE_FORMAT,
};
pub use table::{Column, ColumnKind, ConcatJoin, MergeHow, Table};
pub use value::{Bucket, Outcome, Value, ValueKey, FAILING, IMMATERIAL, MATCH};
pub use wizard::{WizardEvent, WizardState};
