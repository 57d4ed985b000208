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

//! Summary and dashboard commands - read back persisted recon results

use super::print_summary;
use crate::error::CliError;
use colored::Colorize;
use recon_core::{DashboardTotals, GroupedBarChart, ReconSummary};
use recon_csv::{run_date_from_path, ReconStore};
use serde::Serialize;
use tracing::debug;

/// Print the latest summary of one recon, or its bar-chart dataset as JSON.
pub fn summary(recon: &str, chart: bool, store: &ReconStore) -> Result<(), CliError> {
    let path = store.latest_summary_path(recon)?.ok_or_else(|| {
        CliError::invalid_input(format!("Recon '{}' has no saved summaries", recon))
    })?;
    let summary = store.load_summary(&path)?;

    if chart {
        let chart = GroupedBarChart::from_summary(&summary);
        println!("{}", serde_json::to_string_pretty(&chart)?);
        return Ok(());
    }

    if let Ok(run_at) = run_date_from_path(&path) {
        println!("{} {}", "Run:".bold(), run_at);
    }
    print_summary(&summary);
    Ok(())
}

/// JSON shape of the dashboard.
#[derive(Debug, Serialize)]
struct DashboardReport {
    recons: Vec<String>,
    totals: DashboardTotals,
    distribution: GroupedBarChart,
}

/// Totals over the latest summary of every recon.
pub fn dashboard(format: &str, store: &ReconStore) -> Result<(), CliError> {
    let latest = store.latest_summaries()?;
    let recons: Vec<String> = latest.keys().cloned().collect();
    let summaries: Vec<ReconSummary> = latest.into_values().flatten().collect();
    debug!(recons = recons.len(), summaries = summaries.len(), "loaded latest summaries");

    let totals = DashboardTotals::from_summaries(&summaries).with_hours_saved(store.hours_saved()?);

    match format {
        "json" => {
            let report = DashboardReport {
                recons,
                distribution: GroupedBarChart::outcome_distribution(&totals),
                totals,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "text" => print_dashboard(&recons, &totals),
        other => {
            return Err(CliError::invalid_input(format!(
                "Unknown format '{}'. Supported formats: text, json",
                other
            )))
        }
    }
    Ok(())
}

fn print_dashboard(recons: &[String], totals: &DashboardTotals) {
    println!("{}", "Recon Dashboard".bold());
    println!("  Recons:                      {}", recons.len());
    println!("  Number of Rules Applied:     {}", totals.rules_applied);
    println!("  Number of Records Checked:   {}", totals.records_checked);
    println!("  Number of Hours Saved:       {}", totals.hours_saved);
    println!(
        "  Number of MATCHING checks:   {}",
        totals.matching.to_string().green()
    );
    println!(
        "  Number of IMMATERIAL checks: {}",
        totals.immaterial.to_string().yellow()
    );
    println!(
        "  Number of FAILING checks:    {}",
        totals.failing.to_string().red()
    );
}
