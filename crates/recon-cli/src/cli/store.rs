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

//! Commands over persisted recon results.

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;
use recon_csv::ReconStore;

/// Commands that read or change the recon store.
#[derive(Subcommand)]
pub enum StoreCommands {
    /// Show the latest summary of a recon
    Summary {
        /// Recon name
        #[arg(value_name = "NAME")]
        recon: String,

        /// Print the grouped bar-chart dataset as JSON
        #[arg(long)]
        chart: bool,
    },

    /// Totals over the latest summary of every recon
    Dashboard {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Register a recon in the metadata registry
    Register {
        /// Recon name
        #[arg(value_name = "NAME")]
        name: String,

        /// What the recon checks
        #[arg(short, long, default_value = "")]
        description: String,

        /// Hours saved per quarter by automating this recon
        #[arg(short, long, default_value_t = 0.0)]
        value: f64,
    },

    /// List recons
    List,

    /// Delete every saved summary
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl StoreCommands {
    pub fn execute(self, store: &ReconStore) -> Result<(), CliError> {
        match self {
            StoreCommands::Summary { recon, chart } => commands::summary(&recon, chart, store),
            StoreCommands::Dashboard { format } => commands::dashboard(&format, store),
            StoreCommands::Register {
                name,
                description,
                value,
            } => commands::register(&name, &description, value, store),
            StoreCommands::List => commands::list(store),
            StoreCommands::Reset { yes } => commands::reset(yes, store),
        }
    }
}
