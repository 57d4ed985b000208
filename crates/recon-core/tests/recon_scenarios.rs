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

//! End-to-end recon scenarios: build a recon table from two sources, add
//! checks, aggregate, and feed the dashboard.

use chrono::NaiveDate;
use recon_core::{
    build_recon_report_at, Bucket, DashboardTotals, GroupedBarChart, MergeHow, Outcome, Pipeline,
    ReconError, Step, Table, Value, WizardEvent, WizardState,
};
use std::collections::BTreeMap;

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn ledger() -> Table {
    Table::from_rows(
        &headers(&["Unit", "Tenant", "Rent"]),
        vec![
            vec![Value::from("A1"), Value::from("Acme Ltd"), Value::Int(1200)],
            vec![Value::from("A2"), Value::from("Globex"), Value::Int(950)],
            vec![Value::from("A3"), Value::from("Initech"), Value::Int(800)],
            vec![Value::from("A4"), Value::from("Hooli"), Value::Int(1000)],
        ],
    )
    .unwrap()
}

fn lease_register() -> Table {
    Table::from_rows(
        &headers(&["Unit", "Tenant", "Rent"]),
        vec![
            vec![Value::from("A1"), Value::from("Acme Ltd."), Value::Int(1200)],
            vec![Value::from("A2"), Value::from("Globex"), Value::Float(949.5)],
            vec![Value::from("A3"), Value::from("Umbrella"), Value::Int(850)],
        ],
    )
    .unwrap()
}

fn lease_pipeline() -> Pipeline {
    Pipeline::new(vec!["ledger".to_string(), "leases".to_string()], "recon")
        .step(Step::Merge {
            left: "ledger".to_string(),
            right: "leases".to_string(),
            left_on: headers(&["Unit"]),
            right_on: headers(&["Unit"]),
            how: MergeHow::Left,
            suffixes: ("_ledger".to_string(), "_lease".to_string()),
            into: "recon".to_string(),
        })
        .step(Step::CompareNumbers {
            table: "recon".to_string(),
            left: "Rent_ledger".to_string(),
            right: "Rent_lease".to_string(),
            tolerance: 1.0,
            column: "Rent Check".to_string(),
            position: None,
        })
        .step(Step::CompareStrings {
            table: "recon".to_string(),
            left: "Tenant_ledger".to_string(),
            right: "Tenant_lease".to_string(),
            similarity_threshold: 90.0,
            metric: Default::default(),
            column: "Tenant Check".to_string(),
            position: None,
        })
}

#[test]
fn test_lease_recon_end_to_end() {
    let mut inputs = BTreeMap::new();
    inputs.insert("ledger".to_string(), ledger());
    inputs.insert("leases".to_string(), lease_register());

    let output = lease_pipeline().run(inputs).unwrap();
    let recon = &output.result;
    assert_eq!(recon.row_count(), 4);

    let rent = recon.require_column("Rent Check").unwrap();
    assert!(rent.is_check());
    assert_eq!(rent.values[0], Value::Outcome(Outcome::Match));
    assert_eq!(rent.values[1], Value::Outcome(Outcome::Immaterial));
    assert_eq!(rent.values[2], Value::Outcome(Outcome::Fail(-50.0)));
    // A4 has no lease: nothing to compare.
    assert_eq!(rent.values[3], Value::Null);

    let tenant = recon.require_column("Tenant Check").unwrap();
    assert_eq!(tenant.values[0], Value::Outcome(Outcome::Immaterial));
    assert_eq!(tenant.values[1], Value::Outcome(Outcome::Match));
    assert!(matches!(tenant.values[2], Value::Outcome(Outcome::Fail(_))));

    let run_at = NaiveDate::from_ymd_opt(2024, 4, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap();
    let report = build_recon_report_at(recon, run_at).unwrap();
    assert_eq!(report.check_count(), 2);
    assert_eq!(report.summary.count("Rent Check", Bucket::Match), 1);
    assert_eq!(report.summary.count("Rent Check", Bucket::Immaterial), 1);
    assert_eq!(report.summary.count("Rent Check", Bucket::Failing), 1);
    assert_eq!(report.summary.records_checked(), 6);

    let failing = report.slice("Rent Check", Bucket::Failing).unwrap();
    assert_eq!(failing.label(), "Rent Check - Failing");
    assert_eq!(failing.table.index(), &[2]);

    let chart = GroupedBarChart::from_summary(&report.summary);
    assert_eq!(chart.title, "Recon Report Summary");

    let totals = DashboardTotals::from_summaries(&[report.summary.clone()]).with_hours_saved(6.0);
    assert_eq!(totals.rules_applied, 2);
    assert_eq!(totals.records_checked, 6);
    assert_eq!(totals.matching + totals.immaterial + totals.failing, 6);

    let tables = report.into_tables();
    assert_eq!(tables.len(), 2 + 6);
    assert_eq!(tables[0].column_names(), vec!["Date", "Check", "Outcome", "Count"]);
}

#[test]
fn test_pipeline_reports_failing_step() {
    let pipeline = lease_pipeline();
    let mut inputs = BTreeMap::new();
    inputs.insert("ledger".to_string(), ledger());
    inputs.insert(
        "leases".to_string(),
        ledger().drop_columns(&headers(&["Rent"])).unwrap(),
    );

    let err = pipeline.run(inputs).unwrap_err();
    assert!(matches!(err, ReconError::Step { index: 2, .. }));
}

#[test]
fn test_wizard_follows_pipeline_progress() {
    let mut state = WizardState::from_table_count(0);
    state = state.advance(WizardEvent::TableImported).unwrap();
    state = state.advance(WizardEvent::TableImported).unwrap();
    assert!(!state.can_generate_report());
    state = state.advance(WizardEvent::TablesMerged).unwrap();
    state = state.advance(WizardEvent::ChecksAdded).unwrap();
    assert_eq!(state, WizardState::from_table_count(3));
    assert!(state.can_generate_report());
}
