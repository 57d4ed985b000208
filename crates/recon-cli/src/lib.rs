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

//! Recon CLI library for command-line parsing and execution.
//!
//! # Commands
//!
//! ## Tables
//!
//! - **compare-numbers**: add a tolerance-based check column to a CSV
//! - **compare-strings**: add a similarity-based check column to a CSV
//! - **report**: aggregate the check columns of a recon table
//! - **run**: replay a saved recon pipeline against new inputs
//!
//! ## Store
//!
//! - **summary**: latest summary of one recon, or its chart dataset
//! - **dashboard**: totals over the latest summary of every recon
//! - **register** / **list** / **reset**: manage the recon registry and outputs
//!
//! ## Utilities
//!
//! - **completion**: generate shell completion scripts
//!
//! # Configuration
//!
//! Store locations come from `--outputs-dir`, `--metadata-file` and
//! `--pipelines-dir`, or the `RECON_OUTPUTS_DIR`, `RECON_METADATA_FILE` and
//! `RECON_PIPELINES_DIR` environment variables. Input files larger than
//! `RECON_MAX_FILE_SIZE` bytes (default 1 GB) are rejected.
//!
//! # Examples
//!
//! ```no_run
//! use recon_cli::commands::{compare_numbers, report};
//! use recon_csv::ReconStore;
//!
//! # fn main() -> Result<(), recon_cli::error::CliError> {
//! compare_numbers("merged.csv", "Rent_x", "Rent_y", 5.0, Some("Rent Check".into()), Some("checked.csv"))?;
//! report("checked.csv", "text", None, Some("Residential"), &ReconStore::default())?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
