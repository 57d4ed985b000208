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

//! CLI command implementations

mod compare;
mod completion;
mod dashboard;
mod registry;
mod report;
mod run;

pub use compare::{compare_numbers, compare_strings, parse_metric};
pub use completion::{generate_completion_for_command, print_installation_instructions};
pub use dashboard::{dashboard, summary};
pub use registry::{list, register, reset};
pub use report::{print_summary, report, write_slices};
pub use run::{parse_binding, run, RunOptions};

use crate::error::CliError;
use recon_core::Table;
use recon_csv::{from_csv, to_csv};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Default maximum input file size (1 GB).
/// Can be overridden via the RECON_MAX_FILE_SIZE environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

fn get_max_file_size() -> u64 {
    std::env::var("RECON_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read a file from disk, rejecting files over the size limit before reading.
///
/// # Errors
///
/// Returns [`CliError::FileTooLarge`] past the limit (`RECON_MAX_FILE_SIZE`,
/// in bytes) and [`CliError::Io`] if the file cannot be read.
pub fn read_file(path: &str) -> Result<String, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;

    let max_file_size = get_max_file_size();
    if metadata.len() > max_file_size {
        return Err(CliError::file_too_large(path, metadata.len(), max_file_size));
    }

    fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
}

/// Write content to a file or stdout.
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::io_error(p, e)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}

/// Read a CSV file into a table, tagging check columns by name.
pub fn read_table(path: &str) -> Result<Table, CliError> {
    let content = read_file(path)?;
    Ok(from_csv(&content)?)
}

/// Write a table as CSV to `path`.
pub fn write_table(table: &Table, path: &Path) -> Result<(), CliError> {
    let csv = to_csv(table)?;
    fs::write(path, csv).map_err(|e| CliError::io_error(path, e))
}
