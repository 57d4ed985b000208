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

//! Write recon tables and summaries as CSV.

use crate::error::{CsvError, Result};
use chrono::NaiveDateTime;
use recon_core::{Bucket, ReconSummary, SummaryRow, Table, Value, SUMMARY_COLUMNS};
use std::io::{Read, Write};

/// Formats accepted for the summary `Date` column, most specific first.
const SUMMARY_DATE_PARSE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Configuration for CSV output.
#[derive(Debug, Clone)]
pub struct ToCsvConfig {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Include header row (default: true)
    pub include_headers: bool,
    /// Quote style for fields (default: necessary)
    pub quote_style: csv::QuoteStyle,
}

impl Default for ToCsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_headers: true,
            quote_style: csv::QuoteStyle::Necessary,
        }
    }
}

/// Convert a table to a CSV string.
///
/// ```
/// use recon_core::{Column, Table, Value};
/// use recon_csv::to_csv;
///
/// let table = Table::from_columns(vec![
///     Column::new("Unit", vec![Value::from("A1")]),
///     Column::new("Rent", vec![Value::Float(1200.0)]),
/// ]).unwrap();
/// assert_eq!(to_csv(&table).unwrap(), "Unit,Rent\nA1,1200.0\n");
/// ```
pub fn to_csv(table: &Table) -> Result<String> {
    to_csv_with_config(table, ToCsvConfig::default())
}

pub fn to_csv_with_config(table: &Table, config: ToCsvConfig) -> Result<String> {
    let mut buffer = Vec::new();
    to_csv_writer_with_config(table, &mut buffer, config)?;
    String::from_utf8(buffer).map_err(|e| CsvError::ParseError {
        line: 0,
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Write a table as CSV to any writer.
pub fn to_csv_writer<W: Write>(table: &Table, writer: W) -> Result<()> {
    to_csv_writer_with_config(table, writer, ToCsvConfig::default())
}

pub fn to_csv_writer_with_config<W: Write>(
    table: &Table,
    writer: W,
    config: ToCsvConfig,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .quote_style(config.quote_style)
        .from_writer(writer);

    if config.include_headers {
        wtr.write_record(table.column_names())?;
    }

    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| value_to_csv_string(&c.values[row]))
            .collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Convert a value to its CSV field.
///
/// Whole floats keep a decimal point so the column reads back as float.
fn value_to_csv_string(value: &Value) -> String {
    match value {
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}", f),
        Value::Float(f) if f.is_nan() => "NaN".to_string(),
        other => other.to_string(),
    }
}

/// Serialise a summary with columns `Date, Check, Outcome, Count`.
pub fn summary_to_csv(summary: &ReconSummary) -> Result<String> {
    to_csv(&summary.to_table())
}

pub fn summary_to_writer<W: Write>(summary: &ReconSummary, writer: W) -> Result<()> {
    to_csv_writer(&summary.to_table(), writer)
}

/// Parse a summary written by [`summary_to_csv`].
///
/// Outcome labels other than `Match` and `Immaterial` read as failing.
///
/// # Errors
///
/// - [`CsvError::MissingColumn`] if one of the four summary columns is absent
/// - [`CsvError::InvalidTimestamp`] on an unreadable `Date`
/// - [`CsvError::TypeMismatch`] on a non-integer `Count`
pub fn summary_from_csv(csv: &str) -> Result<ReconSummary> {
    summary_from_reader(csv.as_bytes())
}

pub fn summary_from_reader<R: Read>(reader: R) -> Result<ReconSummary> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut positions = [0usize; 4];
    for (slot, name) in SUMMARY_COLUMNS.iter().enumerate() {
        positions[slot] = headers
            .iter()
            .position(|h| h == *name)
            .ok_or_else(|| CsvError::MissingColumn(name.to_string()))?;
    }

    let mut summary = ReconSummary::new();
    for (record_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| CsvError::ParseError {
            line: record_idx + 2,
            message: e.to_string(),
        })?;
        let field = |slot: usize| record.get(positions[slot]).unwrap_or("");

        let count = field(3).parse::<usize>().map_err(|_| CsvError::TypeMismatch {
            column: SUMMARY_COLUMNS[3].to_string(),
            expected: "non-negative integer".to_string(),
            value: field(3).to_string(),
        })?;

        summary.push(SummaryRow {
            date: parse_summary_date(field(0))?,
            check: field(1).to_string(),
            outcome: Bucket::from_label(field(2)),
            count,
        });
    }
    Ok(summary)
}

fn parse_summary_date(value: &str) -> Result<NaiveDateTime> {
    SUMMARY_DATE_PARSE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| CsvError::InvalidTimestamp {
            value: value.to_string(),
            format: SUMMARY_DATE_PARSE_FORMATS[0].to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_csv::from_csv;
    use chrono::NaiveDate;
    use recon_core::{build_recon_report_at, Column, Outcome};

    fn run_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_micro_opt(9, 30, 5, 250_000))
            .unwrap()
    }

    #[test]
    fn test_values_to_fields() {
        let table = Table::from_columns(vec![
            Column::new("a", vec![Value::Null, Value::Bool(true)]),
            Column::new("b", vec![Value::Float(2.5), Value::Float(f64::NAN)]),
            Column::check(
                "c",
                vec![Value::Outcome(Outcome::Match), Value::Outcome(Outcome::Fail(-3.0))],
            ),
            Column::new("d", vec![Value::from("x, y"), Value::Int(7)]),
        ])
        .unwrap();

        assert_eq!(
            to_csv(&table).unwrap(),
            "a,b,c,d\n,2.5,Match,\"x, y\"\ntrue,NaN,-3,7\n"
        );
    }

    #[test]
    fn test_without_headers() {
        let table = Table::from_columns(vec![Column::new("a", vec![Value::Int(1)])]).unwrap();
        let config = ToCsvConfig {
            include_headers: false,
            ..Default::default()
        };
        assert_eq!(to_csv_with_config(&table, config).unwrap(), "1\n");
    }

    #[test]
    fn test_table_survives_reimport() {
        let csv = "Unit,Rent,Rent Check\nA1,1200.5,Match\nA2,950.0,-50\n";
        let table = from_csv(csv).unwrap();
        let written = to_csv(&table).unwrap();
        assert_eq!(from_csv(&written).unwrap(), table);
    }

    #[test]
    fn test_non_finite_checks_survive_reimport() {
        let left = vec![Value::Float(f64::NAN), Value::Float(f64::INFINITY), Value::Float(5.0)];
        let right = vec![Value::Float(1.0), Value::Float(f64::INFINITY), Value::Float(1.0)];
        let check = recon_core::compare_number_values(&left, &right, 1.0).unwrap();
        let table = Table::from_columns(vec![
            Column::new("Rent_x", left),
            Column::new("Rent_y", right),
            Column::check("Rent Check", check),
        ])
        .unwrap();

        let before = build_recon_report_at(&table, run_time()).unwrap().summary;
        let reloaded = from_csv(&to_csv(&table).unwrap()).unwrap();
        let after = build_recon_report_at(&reloaded, run_time()).unwrap().summary;

        assert_eq!(before, after);
        assert_eq!(after.count("Rent Check", Bucket::Match), 1);
        assert_eq!(after.count("Rent Check", Bucket::Failing), 1);
    }

    #[test]
    fn test_summary_file_format() {
        let table = from_csv("Rent Check\nMatch\n-5\nImmaterial\n").unwrap();
        let report = build_recon_report_at(&table, run_time()).unwrap();
        let csv = summary_to_csv(&report.summary).unwrap();

        assert_eq!(
            csv,
            "Date,Check,Outcome,Count\n\
             2024-03-01 09:30:05.250000,Rent Check,Match,1\n\
             2024-03-01 09:30:05.250000,Rent Check,Immaterial,1\n\
             2024-03-01 09:30:05.250000,Rent Check,Failing,1\n"
        );
        assert_eq!(summary_from_csv(&csv).unwrap(), report.summary);
    }

    #[test]
    fn test_summary_reads_foreign_labels_and_dates() {
        let csv = "Check,Outcome,Count,Date\nName Check,Fail,4,2024-01-02 03:04:05\n";
        let summary = summary_from_csv(csv).unwrap();
        assert_eq!(summary.rows[0].outcome, Bucket::Failing);
        assert_eq!(summary.rows[0].count, 4);
        assert_eq!(
            summary.date(),
            NaiveDate::from_ymd_opt(2024, 1, 2).and_then(|d| d.and_hms_opt(3, 4, 5))
        );
    }

    #[test]
    fn test_summary_errors() {
        let err = summary_from_csv("Date,Check,Count\n").unwrap_err();
        assert!(matches!(err, CsvError::MissingColumn(ref c) if c == "Outcome"));

        let err = summary_from_csv("Date,Check,Outcome,Count\nyesterday,A,Match,1\n").unwrap_err();
        assert!(matches!(err, CsvError::InvalidTimestamp { .. }));

        let err =
            summary_from_csv("Date,Check,Outcome,Count\n2024-01-01 00:00:00,A,Match,x\n").unwrap_err();
        assert!(matches!(err, CsvError::TypeMismatch { .. }));
    }
}
