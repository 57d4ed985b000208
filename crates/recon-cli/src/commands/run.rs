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

//! Run command - replay a recon pipeline against fresh inputs

use super::{print_summary, read_file, read_table, write_slices, write_table};
use crate::error::CliError;
use colored::Colorize;
use recon_core::{build_recon_report, Pipeline};
use recon_csv::ReconStore;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Split a `slot=path` input binding.
///
/// ```
/// use recon_cli::commands::parse_binding;
///
/// let (slot, path) = parse_binding("ledger=data/ledger.csv").unwrap();
/// assert_eq!(slot, "ledger");
/// assert_eq!(path, "data/ledger.csv");
/// assert!(parse_binding("ledger").is_err());
/// ```
pub fn parse_binding(binding: &str) -> Result<(String, String), CliError> {
    match binding.split_once('=') {
        Some((slot, path)) if !slot.trim().is_empty() && !path.trim().is_empty() => {
            Ok((slot.trim().to_string(), path.trim().to_string()))
        }
        _ => Err(CliError::invalid_input(format!(
            "Invalid input binding '{}'. Expected SLOT=PATH",
            binding
        ))),
    }
}

/// Options of one pipeline run.
#[derive(Debug, Default)]
pub struct RunOptions<'a> {
    /// Pipeline JSON file; the pipeline saved for `recon` otherwise.
    pub pipeline_file: Option<&'a str>,
    /// Recon whose saved pipeline runs.
    pub recon: Option<&'a str>,
    /// `slot=path` bindings.
    pub inputs: &'a [String],
    /// Recon name the summary is saved under; defaults to `recon`.
    pub save: Option<&'a str>,
    /// Where the result table is written as CSV.
    pub output: Option<&'a str>,
    /// Directory for the summary, full table and slice CSVs.
    pub slices_dir: Option<&'a str>,
}

/// Run a pipeline, aggregate its result table and persist the summary.
///
/// A pipeline loaded from a file and saved under a recon name is also stored,
/// so later runs can use `--recon` alone.
pub fn run(options: RunOptions<'_>, store: &ReconStore) -> Result<(), CliError> {
    let pipeline: Pipeline = match (options.pipeline_file, options.recon) {
        (Some(file), _) => serde_json::from_str(&read_file(file)?)?,
        (None, Some(name)) => store.load_pipeline(name)?,
        (None, None) => {
            return Err(CliError::invalid_input(
                "Either --pipeline or --recon must be given",
            ))
        }
    };

    let mut bindings = BTreeMap::new();
    for binding in options.inputs {
        let (slot, path) = parse_binding(binding)?;
        let table = read_table(&path)?;
        info!(slot = %slot, path = %path, rows = table.row_count(), "bound pipeline input");
        bindings.insert(slot, table);
    }

    let output = pipeline.run(bindings)?;
    let report = build_recon_report(&output.result)?;
    print_summary(&report.summary);

    if let Some(path) = options.output {
        write_table(&output.result, Path::new(path))?;
    }

    if let Some(name) = options.save.or(options.recon) {
        let path = store.save_summary(name, &report.summary)?;
        eprintln!("{} {}", "Saved summary:".green().bold(), path.display());
        if options.pipeline_file.is_some() {
            let path = store.save_pipeline(name, &pipeline)?;
            eprintln!("{} {}", "Saved pipeline:".green().bold(), path.display());
        }
    }

    if let Some(dir) = options.slices_dir {
        write_slices(report, Path::new(dir))?;
    }

    Ok(())
}
