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

//! CLI command definitions and argument parsing.
//!
//! Commands are organized into the following modules:
//!
//! - [`core`]: table commands (compare-numbers, compare-strings, report, run)
//! - [`store`]: persisted results (summary, dashboard, register, list, reset)
//! - [`utility`]: utility commands (completion)

mod core;
mod store;
mod utility;

use crate::error::CliError;
use clap::{Args, Subcommand};
use recon_csv::{ReconStore, StoreConfig};
use std::path::PathBuf;

pub use core::CoreCommands;
pub use store::StoreCommands;
pub use utility::UtilityCommands;

/// Store locations, shared by every command.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Directory of per-recon summary files
    #[arg(long, global = true, env = "RECON_OUTPUTS_DIR", default_value = "outputs")]
    pub outputs_dir: PathBuf,

    /// Recon metadata registry (CSV)
    #[arg(long, global = true, env = "RECON_METADATA_FILE", default_value = "recon_metadata.csv")]
    pub metadata_file: PathBuf,

    /// Directory of saved pipelines
    #[arg(long, global = true, env = "RECON_PIPELINES_DIR", default_value = "pipelines")]
    pub pipelines_dir: PathBuf,
}

impl StoreArgs {
    pub fn store(&self) -> ReconStore {
        ReconStore::new(StoreConfig {
            outputs_dir: self.outputs_dir.clone(),
            metadata_file: self.metadata_file.clone(),
            pipelines_dir: self.pipelines_dir.clone(),
        })
    }
}

/// Top-level CLI commands enum.
///
/// ```text
/// Commands
/// ├── Core (compare-numbers, compare-strings, report, run)
/// ├── Store (summary, dashboard, register, list, reset)
/// └── Utility (completion)
/// ```
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use recon_cli::cli::{Commands, StoreArgs};
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     store: StoreArgs,
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Store(StoreCommands),

    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the command against the given store.
    ///
    /// # Errors
    ///
    /// Returns `Err` if file I/O, CSV conversion, a comparison, a pipeline
    /// step or report aggregation fails.
    pub fn execute(self, store: &ReconStore) -> Result<(), CliError> {
        match self {
            Commands::Core(cmd) => cmd.execute(store),
            Commands::Store(cmd) => cmd.execute(store),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}
