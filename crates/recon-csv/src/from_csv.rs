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

//! Read CSV files into recon tables.

use crate::error::{CsvError, Result};
use recon_core::{Column, ColumnKind, Outcome, Table, Value};
use std::collections::HashSet;
use std::io::Read;
use tracing::debug;

/// Default maximum number of data rows read from one file.
///
/// ```
/// # use recon_csv::FromCsvConfig;
/// let config = FromCsvConfig::default();
/// assert_eq!(config.max_rows, 1_000_000);
/// ```
pub const DEFAULT_MAX_ROWS: usize = 1_000_000;

/// Field values read as missing.
pub const NULL_MARKERS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// How imported columns are tagged as check columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckDetection {
    /// Columns whose name contains `check` (any case).
    #[default]
    ByName,
    /// Exactly the listed columns.
    Named(Vec<String>),
    /// No check columns; every column is data.
    None,
}

impl CheckDetection {
    fn kind_of(&self, name: &str) -> ColumnKind {
        match self {
            CheckDetection::ByName => ColumnKind::from_name(name),
            CheckDetection::Named(names) if names.iter().any(|n| n == name) => ColumnKind::Check,
            CheckDetection::Named(_) | CheckDetection::None => ColumnKind::Data,
        }
    }
}

/// Configuration for CSV parsing.
///
/// # Examples
///
/// ```
/// # use recon_csv::{CheckDetection, FromCsvConfig};
/// let config = FromCsvConfig {
///     delimiter: b';',
///     check_columns: CheckDetection::None,
///     ..Default::default()
/// };
/// assert!(config.trim);
/// ```
#[derive(Debug, Clone)]
pub struct FromCsvConfig {
    /// Field delimiter character (default: `,`).
    pub delimiter: u8,

    /// Whether to trim leading/trailing whitespace from fields (default: `true`).
    pub trim: bool,

    /// Maximum number of data rows (default: [`DEFAULT_MAX_ROWS`]).
    ///
    /// Reading stops with [`CsvError::SecurityLimit`] past this many rows.
    pub max_rows: usize,

    /// Which columns become check columns (default: by name).
    pub check_columns: CheckDetection,
}

impl Default for FromCsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
            max_rows: DEFAULT_MAX_ROWS,
            check_columns: CheckDetection::default(),
        }
    }
}

/// Inferred type of a data column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Null,
    Bool,
    Int,
    Float,
    String,
}

/// Parse CSV text with the default configuration.
///
/// # Examples
///
/// ```
/// use recon_csv::from_csv;
///
/// let table = from_csv("Unit,Rent,Rent Check\nA1,1200,Match\nA2,950,-50\n").unwrap();
/// assert_eq!(table.row_count(), 2);
/// assert_eq!(table.check_columns().count(), 1);
/// ```
pub fn from_csv(csv: &str) -> Result<Table> {
    from_csv_with_config(csv, FromCsvConfig::default())
}

/// Parse CSV text with a custom configuration.
pub fn from_csv_with_config(csv: &str, config: FromCsvConfig) -> Result<Table> {
    from_csv_reader(csv.as_bytes(), config)
}

/// Parse CSV from any reader.
///
/// The first record is the header row. Data columns are typed by inference
/// over all their non-missing fields (bool, integer, float, falling back to
/// text for the whole column). Check columns read `Match`, `Immaterial` and
/// numbers as outcomes; other text is kept as is.
///
/// # Errors
///
/// - [`CsvError::InvalidHeader`] on duplicate column names
/// - [`CsvError::WidthMismatch`] if a row has the wrong number of fields
/// - [`CsvError::SecurityLimit`] past `config.max_rows` rows
/// - [`CsvError::ParseError`] on malformed CSV
pub fn from_csv_reader<R: Read>(reader: R, config: FromCsvConfig) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(if config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader);

    let headers = read_headers(&mut csv_reader)?;

    let mut records: Vec<Vec<String>> = Vec::new();
    for (record_idx, result) in csv_reader.records().enumerate() {
        if record_idx >= config.max_rows {
            return Err(CsvError::SecurityLimit {
                limit: config.max_rows,
                actual: record_idx + 1,
            });
        }

        let record = result.map_err(|e| CsvError::ParseError {
            line: record_idx + 2,
            message: e.to_string(),
        })?;

        if record.len() != headers.len() {
            return Err(CsvError::WidthMismatch {
                expected: headers.len(),
                actual: record.len(),
                row: record_idx + 1,
            });
        }

        records.push(record.iter().map(|s| s.to_string()).collect());
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (col_idx, name) in headers.iter().enumerate() {
        let fields = records.iter().map(|row| row[col_idx].as_str());
        let kind = config.check_columns.kind_of(name);
        let values = match kind {
            ColumnKind::Check => fields.map(parse_check_field).collect(),
            ColumnKind::Data => {
                let col_type = infer_column_type(records.iter().map(|row| row[col_idx].as_str()));
                fields
                    .map(|field| parse_field_with_type(field, col_type))
                    .collect()
            }
        };
        columns.push(Column {
            name: name.clone(),
            kind,
            values,
        });
    }

    let table = Table::from_columns(columns)?;
    debug!(
        rows = table.row_count(),
        columns = table.column_count(),
        checks = table.check_columns().count(),
        "read csv table"
    );
    Ok(table)
}

/// Read and validate the header row. Blank names become `Unnamed: <position>`.
fn read_headers<R: Read>(csv_reader: &mut csv::Reader<R>) -> Result<Vec<String>> {
    let raw = csv_reader.headers().map_err(|e| CsvError::ParseError {
        line: 1,
        message: e.to_string(),
    })?;

    let mut seen = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());
    for (position, name) in raw.iter().enumerate() {
        let name = if name.is_empty() {
            format!("Unnamed: {}", position)
        } else {
            name.to_string()
        };
        if !seen.insert(name.clone()) {
            return Err(CsvError::InvalidHeader {
                position,
                reason: format!("duplicate column name '{}'", name),
            });
        }
        headers.push(name);
    }
    Ok(headers)
}

fn is_null(field: &str) -> bool {
    NULL_MARKERS.contains(&field.trim())
}

fn parse_bool(field: &str) -> Option<bool> {
    match field {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Infer the most specific type shared by every non-missing field.
fn infer_column_type<'a, I>(values: I) -> ColumnType
where
    I: Iterator<Item = &'a str>,
{
    let mut all_null = true;
    let mut all_bool = true;
    let mut all_int = true;
    let mut all_float = true;

    for value in values {
        if is_null(value) {
            continue;
        }
        let trimmed = value.trim();
        all_null = false;

        if parse_bool(trimmed).is_none() {
            all_bool = false;
        }
        if trimmed.parse::<i64>().is_err() {
            all_int = false;
        }
        if trimmed.parse::<f64>().is_err() {
            all_float = false;
        }

        if !all_bool && !all_int && !all_float {
            return ColumnType::String;
        }
    }

    if all_null {
        ColumnType::Null
    } else if all_bool {
        ColumnType::Bool
    } else if all_int {
        ColumnType::Int
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::String
    }
}

fn parse_field_with_type(field: &str, col_type: ColumnType) -> Value {
    if is_null(field) {
        return Value::Null;
    }
    let trimmed = field.trim();

    match col_type {
        ColumnType::Null => Value::Null,
        ColumnType::Bool => parse_bool(trimmed)
            .map(Value::Bool)
            .unwrap_or_else(|| Value::String(field.to_string())),
        ColumnType::Int => trimmed
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::String(field.to_string())),
        ColumnType::Float => trimmed
            .parse::<f64>()
            .map(Value::Float)
            .unwrap_or_else(|_| Value::String(field.to_string())),
        ColumnType::String => Value::String(field.to_string()),
    }
}

fn parse_check_field(field: &str) -> Value {
    if is_null(field) {
        return Value::Null;
    }
    match Outcome::parse(field) {
        Some(outcome) => Value::Outcome(outcome),
        None => Value::String(field.to_string()),
    }
}
