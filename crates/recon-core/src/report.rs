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

//! Recon report aggregation.
//!
//! [`build_recon_report`] scans the check columns of a recon table and produces:
//!
//! 1. a [`ReconSummary`] with three rows per check column (Match, Immaterial,
//!    Failing), all stamped with one timestamp;
//! 2. an unmodified copy of the input table;
//! 3. three [`OutcomeSlice`]s per check column, one per bucket.
//!
//! Missing check cells are counted in no bucket and appear in no slice, so for
//! every check column the three counts add up to its non-missing cell count and
//! the three slices partition its non-missing rows.

use crate::error::{ReconError, Result};
use crate::table::{Column, ColumnKind, Table};
use crate::value::{Bucket, Value, IMMATERIAL, MATCH};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column names of the summary table, in order.
pub const SUMMARY_COLUMNS: [&str; 4] = ["Date", "Check", "Outcome", "Count"];

/// Label column inserted at the front of every outcome slice.
pub const CHECK_OUTCOME_COLUMN: &str = "Check Outcome";

/// Format of the summary `Date` column.
pub const SUMMARY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One `(Date, Check, Outcome, Count)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub date: NaiveDateTime,
    pub check: String,
    pub outcome: Bucket,
    pub count: usize,
}

/// Per-check outcome counts of one recon run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconSummary {
    pub rows: Vec<SummaryRow>,
}

impl ReconSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: SummaryRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Timestamp of the run (the first row's date).
    pub fn date(&self) -> Option<NaiveDateTime> {
        self.rows.first().map(|r| r.date)
    }

    /// Distinct check names, in first-seen order.
    pub fn checks(&self) -> Vec<&str> {
        let mut checks: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !checks.contains(&row.check.as_str()) {
                checks.push(&row.check);
            }
        }
        checks
    }

    /// Count recorded for one check and bucket (0 if absent).
    pub fn count(&self, check: &str, outcome: Bucket) -> usize {
        self.rows
            .iter()
            .filter(|r| r.check == check && r.outcome == outcome)
            .map(|r| r.count)
            .sum()
    }

    /// Total count of one bucket across all checks.
    pub fn total(&self, outcome: Bucket) -> usize {
        self.rows
            .iter()
            .filter(|r| r.outcome == outcome)
            .map(|r| r.count)
            .sum()
    }

    /// Total count across all checks and buckets.
    pub fn records_checked(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// The summary as a table with columns [`SUMMARY_COLUMNS`].
    pub fn to_table(&self) -> Table {
        let columns = vec![
            Column::new(
                SUMMARY_COLUMNS[0],
                self.rows
                    .iter()
                    .map(|r| Value::String(r.date.format(SUMMARY_DATE_FORMAT).to_string()))
                    .collect(),
            ),
            Column::new(
                SUMMARY_COLUMNS[1],
                self.rows.iter().map(|r| Value::String(r.check.clone())).collect(),
            ),
            Column::new(
                SUMMARY_COLUMNS[2],
                self.rows
                    .iter()
                    .map(|r| Value::String(r.outcome.as_str().to_string()))
                    .collect(),
            ),
            Column::new(
                SUMMARY_COLUMNS[3],
                self.rows.iter().map(|r| Value::Int(r.count as i64)).collect(),
            ),
        ];
        Table::from_columns(columns)
            .expect("summary columns have distinct names and one value per row")
    }
}

/// Rows of the recon table whose check column falls in one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeSlice {
    pub check: String,
    pub bucket: Bucket,
    /// Copy of the matching rows with [`CHECK_OUTCOME_COLUMN`] in front.
    pub table: Table,
}

impl OutcomeSlice {
    /// `"{check} - {bucket}"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.check, self.bucket)
    }
}

/// Output of [`build_recon_report`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReconReport {
    pub summary: ReconSummary,
    /// Unmodified copy of the input table.
    pub table: Table,
    /// Three slices per check column: Match, Immaterial, Failing.
    pub slices: Vec<OutcomeSlice>,
}

impl ReconReport {
    /// Number of check columns that were aggregated.
    pub fn check_count(&self) -> usize {
        self.slices.len() / Bucket::ALL.len()
    }

    pub fn slice(&self, check: &str, bucket: Bucket) -> Option<&OutcomeSlice> {
        self.slices
            .iter()
            .find(|s| s.check == check && s.bucket == bucket)
    }

    /// `[Summary, FullTable, Match₁, Immaterial₁, Failing₁, ...]`.
    pub fn into_tables(self) -> Vec<Table> {
        let mut tables = Vec::with_capacity(2 + self.slices.len());
        tables.push(self.summary.to_table());
        tables.push(self.table);
        tables.extend(self.slices.into_iter().map(|s| s.table));
        tables
    }
}

/// Classify one check cell.
///
/// Returns `None` for a missing cell. Outcome values map to their bucket; the
/// text tags `Match` / `Immaterial` are accepted as written by CSV round-trips;
/// any other number or text is failing. Booleans cannot be compared to the
/// outcome tags and are rejected.
pub fn classify_check_cell(column: &str, value: &Value) -> Result<Option<Bucket>> {
    match value {
        Value::Null => Ok(None),
        Value::Outcome(o) => Ok(Some(o.bucket())),
        Value::String(s) if s == MATCH => Ok(Some(Bucket::Match)),
        Value::String(s) if s == IMMATERIAL => Ok(Some(Bucket::Immaterial)),
        Value::String(_) | Value::Int(_) | Value::Float(_) => Ok(Some(Bucket::Failing)),
        Value::Bool(_) => Err(ReconError::UnsupportedCheckValue {
            column: column.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Aggregate a recon table, stamping the summary with the current local time.
///
/// # Errors
///
/// Returns [`ReconError::UnsupportedCheckValue`] if a check cell cannot be
/// classified, or [`ReconError::DuplicateColumn`] if the table already has a
/// [`CHECK_OUTCOME_COLUMN`]. No partial report is returned.
///
/// # Examples
///
/// ```
/// use recon_core::{build_recon_report, Bucket, Column, Outcome, Table, Value};
///
/// let table = Table::from_columns(vec![
///     Column::new("Amount", vec![Value::Int(1), Value::Int(2)]),
///     Column::check("Amount Check", vec![
///         Value::Outcome(Outcome::Match),
///         Value::Outcome(Outcome::Fail(5.0)),
///     ]),
/// ]).unwrap();
///
/// let report = build_recon_report(&table).unwrap();
/// assert_eq!(report.summary.count("Amount Check", Bucket::Failing), 1);
/// assert_eq!(report.into_tables().len(), 5);
/// ```
pub fn build_recon_report(table: &Table) -> Result<ReconReport> {
    build_recon_report_at(table, Local::now().naive_local())
}

/// [`build_recon_report`] with an explicit run timestamp.
pub fn build_recon_report_at(table: &Table, now: NaiveDateTime) -> Result<ReconReport> {
    let mut summary = ReconSummary::new();
    let mut slices = Vec::new();

    for column in table.check_columns() {
        let mut positions: [Vec<usize>; 3] = [Vec::new(), Vec::new(), Vec::new()];
        for (row, value) in column.values.iter().enumerate() {
            if let Some(bucket) = classify_check_cell(&column.name, value)? {
                positions[bucket_slot(bucket)].push(row);
            }
        }

        debug!(
            check = %column.name,
            matching = positions[0].len(),
            immaterial = positions[1].len(),
            failing = positions[2].len(),
            "aggregated check column"
        );

        for bucket in Bucket::ALL {
            let rows = &positions[bucket_slot(bucket)];
            summary.push(SummaryRow {
                date: now,
                check: column.name.clone(),
                outcome: bucket,
                count: rows.len(),
            });

            let label = format!("{} - {}", column.name, bucket);
            let mut slice_table = table.take_rows(rows);
            slice_table.insert_column(
                0,
                Column {
                    name: CHECK_OUTCOME_COLUMN.to_string(),
                    kind: ColumnKind::Data,
                    values: vec![Value::String(label); rows.len()],
                },
            )?;
            slices.push(OutcomeSlice {
                check: column.name.clone(),
                bucket,
                table: slice_table,
            });
        }
    }

    Ok(ReconReport {
        summary,
        table: table.clone(),
        slices,
    })
}

fn bucket_slot(bucket: Bucket) -> usize {
    match bucket {
        Bucket::Match => 0,
        Bucket::Immaterial => 1,
        Bucket::Failing => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Outcome;
    use chrono::NaiveDate;

    fn run_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap()
    }

    fn amount_table() -> Table {
        Table::from_columns(vec![
            Column::new(
                "Amount",
                vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)],
            ),
            Column::check(
                "Amount Check",
                vec![
                    Value::Outcome(Outcome::Match),
                    Value::Outcome(Outcome::Immaterial),
                    Value::Outcome(Outcome::Fail(5.0)),
                    Value::Outcome(Outcome::Match),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_check_scenario() {
        let report = build_recon_report_at(&amount_table(), run_time()).unwrap();

        let rows: Vec<(&str, Bucket, usize)> = report
            .summary
            .rows
            .iter()
            .map(|r| (r.check.as_str(), r.outcome, r.count))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Amount Check", Bucket::Match, 2),
                ("Amount Check", Bucket::Immaterial, 1),
                ("Amount Check", Bucket::Failing, 1),
            ]
        );
        assert!(report.summary.rows.iter().all(|r| r.date == run_time()));

        let sizes: Vec<usize> = report.slices.iter().map(|s| s.table.row_count()).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
        assert_eq!(report.check_count(), 1);
    }

    #[test]
    fn test_slice_label_column_first() {
        let report = build_recon_report_at(&amount_table(), run_time()).unwrap();
        let failing = report.slice("Amount Check", Bucket::Failing).unwrap();
        assert_eq!(failing.label(), "Amount Check - Failing");
        assert_eq!(failing.table.column_names()[0], CHECK_OUTCOME_COLUMN);
        assert_eq!(
            failing.table.column(CHECK_OUTCOME_COLUMN).unwrap().values,
            vec![Value::from("Amount Check - Failing")]
        );
        assert_eq!(failing.table.index(), &[2]);
        // The failure payload survives in the slice
        assert_eq!(
            failing.table.column("Amount Check").unwrap().values[0],
            Value::Outcome(Outcome::Fail(5.0))
        );
    }

    #[test]
    fn test_input_not_modified() {
        let table = amount_table();
        let before = table.clone();
        let report = build_recon_report_at(&table, run_time()).unwrap();
        assert_eq!(table, before);
        assert_eq!(report.table, before);
    }

    #[test]
    fn test_zero_check_columns() {
        let table = Table::from_columns(vec![Column::new("Amount", vec![Value::Int(1)])]).unwrap();
        let report = build_recon_report_at(&table, run_time()).unwrap();
        assert!(report.summary.is_empty());
        let tables = report.into_tables();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].column_names(), SUMMARY_COLUMNS.to_vec());
        assert_eq!(tables[0].row_count(), 0);
    }

    #[test]
    fn test_zero_rows_still_emit_summary() {
        let table = Table::from_columns(vec![Column::check("Rent Check", vec![])]).unwrap();
        let report = build_recon_report_at(&table, run_time()).unwrap();
        assert_eq!(report.summary.len(), 3);
        assert!(report.summary.rows.iter().all(|r| r.count == 0));
        assert_eq!(report.slices.len(), 3);
    }

    #[test]
    fn test_missing_cells_excluded() {
        let table = Table::from_columns(vec![Column::check(
            "Name Check",
            vec![
                Value::Null,
                Value::Outcome(Outcome::Match),
                Value::Outcome(Outcome::Fail(40.0)),
                Value::Null,
            ],
        )])
        .unwrap();
        let report = build_recon_report_at(&table, run_time()).unwrap();
        assert_eq!(report.summary.count("Name Check", Bucket::Match), 1);
        assert_eq!(report.summary.count("Name Check", Bucket::Immaterial), 0);
        assert_eq!(report.summary.count("Name Check", Bucket::Failing), 1);
        let sliced: usize = report.slices.iter().map(|s| s.table.row_count()).sum();
        assert_eq!(sliced, 2);
    }

    #[test]
    fn test_text_tags_and_raw_numbers() {
        let table = Table::from_columns(vec![Column::check(
            "Tenant Check",
            vec![
                Value::from("Match"),
                Value::from("Immaterial"),
                Value::Int(75),
                Value::from("pending"),
            ],
        )])
        .unwrap();
        let report = build_recon_report_at(&table, run_time()).unwrap();
        assert_eq!(report.summary.count("Tenant Check", Bucket::Match), 1);
        assert_eq!(report.summary.count("Tenant Check", Bucket::Immaterial), 1);
        assert_eq!(report.summary.count("Tenant Check", Bucket::Failing), 2);
    }

    #[test]
    fn test_bool_check_cell_rejected() {
        let table =
            Table::from_columns(vec![Column::check("Flag Check", vec![Value::Bool(true)])]).unwrap();
        let err = build_recon_report_at(&table, run_time()).unwrap_err();
        assert!(matches!(err, ReconError::UnsupportedCheckValue { .. }));
    }

    #[test]
    fn test_data_column_named_check_is_ignored() {
        let table = Table::from_columns(vec![
            Column::new("Background Check", vec![Value::from("cleared")]),
            Column::check("Amount Verified", vec![Value::Outcome(Outcome::Match)]),
        ])
        .unwrap();
        let report = build_recon_report_at(&table, run_time()).unwrap();
        assert_eq!(report.summary.checks(), vec!["Amount Verified"]);
    }

    #[test]
    fn test_check_order_follows_columns() {
        let table = Table::from_columns(vec![
            Column::check("Z Check", vec![Value::Outcome(Outcome::Match)]),
            Column::new("Data", vec![Value::Int(1)]),
            Column::check("A Check", vec![Value::Outcome(Outcome::Immaterial)]),
        ])
        .unwrap();
        let report = build_recon_report_at(&table, run_time()).unwrap();
        assert_eq!(report.summary.checks(), vec!["Z Check", "A Check"]);
        let labels: Vec<String> = report.slices.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Z Check - Match",
                "Z Check - Immaterial",
                "Z Check - Failing",
                "A Check - Match",
                "A Check - Immaterial",
                "A Check - Failing",
            ]
        );
        assert_eq!(report.into_tables().len(), 8);
    }

    #[test]
    fn test_summary_table_shape() {
        let report = build_recon_report_at(&amount_table(), run_time()).unwrap();
        let table = report.summary.to_table();
        assert_eq!(table.column_names(), SUMMARY_COLUMNS.to_vec());
        assert_eq!(
            table.column("Date").unwrap().values[0],
            Value::from("2024-03-01 09:30:00.000000")
        );
        assert_eq!(table.column("Count").unwrap().values[0], Value::Int(2));
        assert_eq!(report.summary.records_checked(), 4);
        assert_eq!(report.summary.total(Bucket::Match), 2);
    }

    #[test]
    fn test_empty_summary_table_keeps_columns() {
        let table = ReconSummary::new().to_table();
        assert_eq!(table.column_names(), SUMMARY_COLUMNS.to_vec());
        assert_eq!(table.row_count(), 0);
    }
}
