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

//! Recon Command Line Interface

use clap::Parser;
use recon_cli::cli::{Commands, StoreArgs};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Recon - data reconciliation toolkit
///
/// # Examples
///
/// ```bash
/// # Add a check column comparing two rent columns
/// recon compare-numbers merged.csv --left Rent_x --right Rent_y -t 5 -o checked.csv
///
/// # Aggregate and save the run
/// recon report checked.csv --save Residential
///
/// # Cross-recon totals
/// recon dashboard
/// ```
#[derive(Parser)]
#[command(name = "recon")]
#[command(author, version, about = "Recon - data reconciliation toolkit", long_about = None)]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("recon=info".parse().expect("valid log directive")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = cli.store.store();

    match cli.command.execute(&store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
