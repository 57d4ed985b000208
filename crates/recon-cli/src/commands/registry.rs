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

//! Registry commands - register, list and reset recons

use crate::error::CliError;
use colored::Colorize;
use recon_csv::{CsvError, ReconStore};

/// Register a recon and create its outputs directory.
///
/// Registering a name that is already in the registry changes nothing.
pub fn register(
    name: &str,
    description: &str,
    value: f64,
    store: &ReconStore,
) -> Result<(), CliError> {
    match store.create_recon(name) {
        Ok(_) | Err(CsvError::ReconExists(_)) => {}
        Err(e) => return Err(e.into()),
    }

    if store.register_recon(name, description, value)? {
        println!("{} {}", "Registered".green().bold(), name);
    } else {
        println!("{} is already registered", name);
    }
    Ok(())
}

/// List every recon with its description and latest run.
pub fn list(store: &ReconStore) -> Result<(), CliError> {
    let metadata = store.load_metadata()?;
    let names = store.recon_names()?;
    if names.is_empty() {
        println!("No recons found in {}", store.config().outputs_dir.display());
        return Ok(());
    }

    for name in names {
        let description = metadata
            .iter()
            .find(|m| m.recon_name == name)
            .map(|m| m.recon_description.as_str())
            .unwrap_or("");
        let latest = store
            .latest_summary_path(&name)?
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "never run".to_string());
        println!("{}  {}  ({})", name.bold(), description, latest.dimmed());
    }
    Ok(())
}

/// Delete every saved summary. Requires `confirmed`.
pub fn reset(confirmed: bool, store: &ReconStore) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::invalid_input(format!(
            "Refusing to delete {} without --yes",
            store.config().outputs_dir.display()
        )));
    }
    store.reset()?;
    println!(
        "{} {}",
        "Reset".yellow().bold(),
        store.config().outputs_dir.display()
    );
    Ok(())
}
