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

//! Report command - aggregate the check columns of a recon table

use super::{read_table, write_table};
use crate::error::CliError;
use colored::Colorize;
use recon_core::{build_recon_report, Bucket, ReconReport, ReconSummary, SUMMARY_DATE_FORMAT};
use recon_csv::ReconStore;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Build the recon report of a wide CSV and print its summary.
///
/// With `slices_dir`, every output table is written there as CSV. With
/// `save`, the summary is persisted in the store under that recon name.
pub fn report(
    file: &str,
    format: &str,
    slices_dir: Option<&str>,
    save: Option<&str>,
    store: &ReconStore,
) -> Result<(), CliError> {
    let table = read_table(file)?;
    if table.check_columns().count() == 0 {
        eprintln!(
            "{} no check columns found in '{}' (column names must contain \"check\")",
            "warning:".yellow().bold(),
            file
        );
    }

    let report = build_recon_report(&table)?;

    match format {
        "text" => print_summary(&report.summary),
        "json" => println!("{}", serde_json::to_string_pretty(&report.summary)?),
        other => {
            return Err(CliError::invalid_input(format!(
                "Unknown format '{}'. Supported formats: text, json",
                other
            )))
        }
    }

    if let Some(name) = save {
        let path = store.save_summary(name, &report.summary)?;
        eprintln!("{} {}", "Saved summary:".green().bold(), path.display());
    }

    if let Some(dir) = slices_dir {
        let written = write_slices(report, Path::new(dir))?;
        eprintln!(
            "{} {} tables to {}",
            "Wrote".green().bold(),
            written.len(),
            dir
        );
    }

    Ok(())
}

/// Print one line per check with its bucket counts.
pub fn print_summary(summary: &ReconSummary) {
    let date = summary
        .date()
        .map(|d| d.format(SUMMARY_DATE_FORMAT).to_string())
        .unwrap_or_default();
    println!("{} {}", "Recon Report Summary".bold(), date.dimmed());

    let checks = summary.checks();
    if checks.is_empty() {
        println!("  (no checks)");
        return;
    }
    let width = checks.iter().map(|c| c.len()).max().unwrap_or(0);
    for check in checks {
        println!(
            "  {:width$}  {} {}  {} {}  {} {}",
            check,
            summary.count(check, Bucket::Match).to_string().green(),
            Bucket::Match,
            summary.count(check, Bucket::Immaterial).to_string().yellow(),
            Bucket::Immaterial,
            summary.count(check, Bucket::Failing).to_string().red(),
            Bucket::Failing,
            width = width
        );
    }
}

/// File name for a table label: path separators and colons become `_`.
fn file_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}

/// Write `summary.csv`, `recon.csv` and one `<check> - <bucket>.csv` per slice.
///
/// Labels that map to the same file name get a ` (2)`, ` (3)`, ... suffix.
pub fn write_slices(report: ReconReport, dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    fs::create_dir_all(dir).map_err(|e| CliError::io_error(dir, e))?;

    let mut written = Vec::with_capacity(2 + report.slices.len());
    let mut taken = HashSet::new();
    let mut write = |label: &str, table: &recon_core::Table| -> Result<(), CliError> {
        let stem = file_stem(label);
        let mut name = stem.clone();
        let mut n = 1;
        while !taken.insert(name.to_lowercase()) {
            n += 1;
            name = format!("{} ({})", stem, n);
        }
        let path = dir.join(format!("{}.csv", name));
        write_table(table, &path)?;
        written.push(path);
        Ok(())
    };

    write("summary", &report.summary.to_table())?;
    write("recon", &report.table)?;
    for slice in &report.slices {
        write(&slice.label(), &slice.table)?;
    }

    info!(dir = %dir.display(), tables = written.len(), "wrote report tables");
    Ok(written)
}
