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

//! Property-based tests for report aggregation.

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use recon_core::{
    build_recon_report_at, Bucket, Column, Outcome, Table, Value, CHECK_OUTCOME_COLUMN,
};

fn run_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 30)
        .and_then(|d| d.and_hms_opt(17, 0, 0))
        .unwrap()
}

fn check_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::Outcome(Outcome::Match)),
        Just(Value::Outcome(Outcome::Immaterial)),
        (-500_i32..500).prop_map(|d| Value::Outcome(Outcome::Fail(f64::from(d)))),
        Just(Value::from("Match")),
        Just(Value::from("mismatch")),
    ]
}

/// A table with an `Id` column and one to three check columns.
fn recon_table() -> impl Strategy<Value = Table> {
    (0_usize..25, 1_usize..4).prop_flat_map(|(rows, checks)| {
        prop::collection::vec(prop::collection::vec(check_cell(), rows), checks).prop_map(
            move |cells| {
                let mut columns = vec![Column::new(
                    "Id",
                    (0..rows).map(|i| Value::Int(i as i64)).collect(),
                )];
                for (i, values) in cells.into_iter().enumerate() {
                    columns.push(Column::check(format!("Check {}", i), values));
                }
                Table::from_columns(columns).unwrap()
            },
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Property: per check, the three counts add up to the non-missing cells.
    #[test]
    fn prop_counts_conserve_non_missing(table in recon_table()) {
        let report = build_recon_report_at(&table, run_time()).unwrap();
        for column in table.check_columns() {
            let total: usize = Bucket::ALL
                .iter()
                .map(|b| report.summary.count(&column.name, *b))
                .sum();
            prop_assert_eq!(total, column.non_missing());
        }
        prop_assert_eq!(report.summary.len(), 3 * table.check_columns().count());
    }

    /// Property: slices of one check partition its non-missing rows.
    #[test]
    fn prop_slices_partition_rows(table in recon_table()) {
        let report = build_recon_report_at(&table, run_time()).unwrap();
        for column in table.check_columns() {
            let mut seen: Vec<usize> = Vec::new();
            for bucket in Bucket::ALL {
                let slice = report.slice(&column.name, bucket).unwrap();
                prop_assert_eq!(slice.table.row_count(), report.summary.count(&column.name, bucket));
                prop_assert_eq!(slice.table.column_names()[0], CHECK_OUTCOME_COLUMN);
                seen.extend_from_slice(slice.table.index());
            }
            seen.sort_unstable();
            let expected: Vec<usize> = column
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_null())
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(seen, expected);
        }
    }

    /// Property: aggregation leaves its input unchanged and is repeatable.
    #[test]
    fn prop_report_is_deterministic(table in recon_table()) {
        let before = table.clone();
        let first = build_recon_report_at(&table, run_time()).unwrap();
        let second = build_recon_report_at(&table, run_time()).unwrap();
        prop_assert_eq!(&table, &before);
        prop_assert_eq!(&first.table, &before);
        prop_assert_eq!(first, second);
    }
}
