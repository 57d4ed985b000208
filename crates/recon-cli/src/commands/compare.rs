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

//! Compare commands - add a check column comparing two columns of one CSV

use super::{read_table, write_output};
use crate::error::CliError;
use recon_core::{compare_number_values, compare_string_values, Column, StringMetric, Table};
use recon_csv::to_csv;
use tracing::info;

/// Metric names accepted on the command line.
pub const METRIC_NAMES: [&str; 3] = ["indel", "levenshtein", "jaro-winkler"];

pub fn parse_metric(name: &str) -> Result<StringMetric, CliError> {
    match name.to_lowercase().as_str() {
        "indel" => Ok(StringMetric::Indel),
        "levenshtein" => Ok(StringMetric::Levenshtein),
        "jaro-winkler" | "jaro_winkler" => Ok(StringMetric::JaroWinkler),
        _ => Err(CliError::invalid_input(format!(
            "Unknown similarity metric '{}'. Supported metrics: {}",
            name,
            METRIC_NAMES.join(", ")
        ))),
    }
}

fn check_name(left: &str, right: &str, column: Option<String>) -> String {
    column.unwrap_or_else(|| format!("{} vs {} Check", left, right))
}

fn append_check(table: &Table, name: String, values: Vec<recon_core::Value>) -> Result<Table, CliError> {
    let mut table = table.clone();
    table.push_column(Column::check(name, values))?;
    Ok(table)
}

/// Compare two numeric columns and print (or write) the table with the new
/// check column appended.
///
/// # Examples
///
/// ```no_run
/// use recon_cli::commands::compare_numbers;
///
/// # fn main() -> Result<(), recon_cli::error::CliError> {
/// compare_numbers("merged.csv", "Rent_x", "Rent_y", 5.0, None, Some("checked.csv"))?;
/// # Ok(())
/// # }
/// ```
pub fn compare_numbers(
    file: &str,
    left: &str,
    right: &str,
    tolerance: f64,
    column: Option<String>,
    output: Option<&str>,
) -> Result<(), CliError> {
    let table = read_table(file)?;
    let cells = compare_number_values(
        &table.require_column(left)?.values,
        &table.require_column(right)?.values,
        tolerance,
    )?;
    let name = check_name(left, right, column);
    info!(check = %name, tolerance, rows = cells.len(), "compared numeric columns");

    let table = append_check(&table, name, cells)?;
    write_output(&to_csv(&table)?, output)
}

/// Compare two columns as text and print (or write) the table with the new
/// check column appended.
pub fn compare_strings(
    file: &str,
    left: &str,
    right: &str,
    similarity_threshold: f64,
    metric: StringMetric,
    column: Option<String>,
    output: Option<&str>,
) -> Result<(), CliError> {
    let table = read_table(file)?;
    let cells = compare_string_values(
        &table.require_column(left)?.values,
        &table.require_column(right)?.values,
        similarity_threshold,
        metric,
    )?;
    let name = check_name(left, right, column);
    info!(check = %name, similarity_threshold, ?metric, rows = cells.len(), "compared text columns");

    let table = append_check(&table, name, cells)?;
    write_output(&to_csv(&table)?, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metric() {
        assert_eq!(parse_metric("Indel").unwrap(), StringMetric::Indel);
        assert_eq!(parse_metric("jaro-winkler").unwrap(), StringMetric::JaroWinkler);
        assert!(parse_metric("soundex").is_err());
    }

    #[test]
    fn test_default_check_name() {
        assert_eq!(check_name("Rent_x", "Rent_y", None), "Rent_x vs Rent_y Check");
        assert_eq!(
            check_name("a", "b", Some("Rent Check".to_string())),
            "Rent Check"
        );
    }
}
