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

//! Table commands: comparisons, reports and pipeline runs.

use crate::commands::{self, RunOptions};
use crate::error::CliError;
use clap::Subcommand;
use recon_core::{DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TOLERANCE};
use recon_csv::ReconStore;

/// Commands that read recon tables from CSV.
#[derive(Subcommand)]
pub enum CoreCommands {
    /// Compare two numeric columns
    ///
    /// Appends a check column: Match when equal, Immaterial when the absolute
    /// difference is below the tolerance, the signed difference otherwise.
    CompareNumbers {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        file: String,

        /// Left column
        #[arg(long)]
        left: String,

        /// Right column
        #[arg(long)]
        right: String,

        /// Differences below this are immaterial
        #[arg(short, long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,

        /// Name of the check column (default: "<left> vs <right> Check")
        #[arg(short, long)]
        column: Option<String>,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compare two columns as text
    ///
    /// Appends a check column: Match when identical, Immaterial when the
    /// similarity ratio (0-100) exceeds the threshold, the ratio otherwise.
    CompareStrings {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        file: String,

        /// Left column
        #[arg(long)]
        left: String,

        /// Right column
        #[arg(long)]
        right: String,

        /// Ratios above this are immaterial
        #[arg(short = 's', long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
        similarity_threshold: f64,

        /// Similarity metric (indel, levenshtein, jaro-winkler)
        #[arg(short, long, default_value = "indel")]
        metric: String,

        /// Name of the check column (default: "<left> vs <right> Check")
        #[arg(short, long)]
        column: Option<String>,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Aggregate the check columns of a recon table
    ///
    /// Check columns are those whose name contains "check" (any case).
    Report {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        file: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the summary, full table and every outcome slice as CSV here
        #[arg(long, value_name = "DIR")]
        slices_dir: Option<String>,

        /// Save the summary under this recon name
        #[arg(long, value_name = "NAME")]
        save: Option<String>,
    },

    /// Run a recon pipeline against new inputs
    ///
    /// Binds each input slot to a CSV file, runs the pipeline steps, and
    /// aggregates the result table.
    Run {
        /// Pipeline JSON file
        #[arg(short, long, value_name = "FILE", required_unless_present = "recon")]
        pipeline: Option<String>,

        /// Run the pipeline saved for this recon
        #[arg(short, long, value_name = "NAME")]
        recon: Option<String>,

        /// Input binding, repeatable
        #[arg(short, long = "input", value_name = "SLOT=PATH")]
        inputs: Vec<String>,

        /// Save the summary (and a file pipeline) under this recon name
        #[arg(long, value_name = "NAME")]
        save: Option<String>,

        /// Write the result table as CSV
        #[arg(short, long)]
        output: Option<String>,

        /// Write the summary, full table and every outcome slice as CSV here
        #[arg(long, value_name = "DIR")]
        slices_dir: Option<String>,
    },
}

impl CoreCommands {
    pub fn execute(self, store: &ReconStore) -> Result<(), CliError> {
        match self {
            CoreCommands::CompareNumbers {
                file,
                left,
                right,
                tolerance,
                column,
                output,
            } => commands::compare_numbers(&file, &left, &right, tolerance, column, output.as_deref()),
            CoreCommands::CompareStrings {
                file,
                left,
                right,
                similarity_threshold,
                metric,
                column,
                output,
            } => commands::compare_strings(
                &file,
                &left,
                &right,
                similarity_threshold,
                commands::parse_metric(&metric)?,
                column,
                output.as_deref(),
            ),
            CoreCommands::Report {
                file,
                format,
                slices_dir,
                save,
            } => commands::report(&file, &format, slices_dir.as_deref(), save.as_deref(), store),
            CoreCommands::Run {
                pipeline,
                recon,
                inputs,
                save,
                output,
                slices_dir,
            } => commands::run(
                RunOptions {
                    pipeline_file: pipeline.as_deref(),
                    recon: recon.as_deref(),
                    inputs: &inputs,
                    save: save.as_deref(),
                    output: output.as_deref(),
                    slices_dir: slices_dir.as_deref(),
                },
                store,
            ),
        }
    }
}
