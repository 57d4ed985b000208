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

//! Bar-chart datasets for the visualization layer.
//!
//! Nothing here renders; these are the serialisable shapes a charting
//! front-end consumes.

use crate::dashboard::DashboardTotals;
use crate::report::ReconSummary;
use crate::value::Bucket;
use serde::{Deserialize, Serialize};

/// One bar series: a label and `(category, count)` points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub points: Vec<(String, usize)>,
}

/// A grouped bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<BarSeries>,
}

impl GroupedBarChart {
    /// Per-check counts grouped by outcome: x = Check, y = Count, one series
    /// per outcome bucket.
    pub fn from_summary(summary: &ReconSummary) -> Self {
        let checks = summary.checks();
        let series = Bucket::ALL
            .iter()
            .map(|bucket| BarSeries {
                name: bucket.as_str().to_string(),
                points: checks
                    .iter()
                    .map(|check| (check.to_string(), summary.count(check, *bucket)))
                    .collect(),
            })
            .collect();

        Self {
            title: "Recon Report Summary".to_string(),
            x_label: "Check".to_string(),
            y_label: "Count".to_string(),
            series,
        }
    }

    /// Single-series distribution of outcomes across every recon.
    pub fn outcome_distribution(totals: &DashboardTotals) -> Self {
        Self {
            title: "Outcome Distribution".to_string(),
            x_label: "Outcome".to_string(),
            y_label: "Total number of records".to_string(),
            series: vec![BarSeries {
                name: "Count".to_string(),
                points: totals
                    .distribution()
                    .iter()
                    .map(|(label, count)| (label.to_string(), *count))
                    .collect(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_recon_report;
    use crate::table::{Column, Table};
    use crate::value::{Outcome, Value};

    #[test]
    fn test_summary_chart_groups_by_outcome() {
        let table = Table::from_columns(vec![
            Column::check(
                "Rent Check",
                vec![
                    Value::Outcome(Outcome::Match),
                    Value::Outcome(Outcome::Fail(12.0)),
                ],
            ),
            Column::check("Name Check", vec![Value::Outcome(Outcome::Immaterial), Value::Null]),
        ])
        .unwrap();
        let report = build_recon_report(&table).unwrap();
        let chart = GroupedBarChart::from_summary(&report.summary);

        assert_eq!(chart.x_label, "Check");
        assert_eq!(chart.series.len(), 3);
        assert_eq!(chart.series[0].name, "Match");
        assert_eq!(
            chart.series[0].points,
            vec![("Rent Check".to_string(), 1), ("Name Check".to_string(), 0)]
        );
        assert_eq!(chart.series[1].points[1], ("Name Check".to_string(), 1));
        assert_eq!(chart.series[2].points[0], ("Rent Check".to_string(), 1));
    }

    #[test]
    fn test_distribution_chart() {
        let totals = DashboardTotals {
            matching: 4,
            immaterial: 1,
            failing: 2,
            ..Default::default()
        };
        let chart = GroupedBarChart::outcome_distribution(&totals);
        assert_eq!(chart.series.len(), 1);
        assert_eq!(
            chart.series[0].points,
            vec![
                ("Match".to_string(), 4),
                ("Immaterial".to_string(), 1),
                ("Fail".to_string(), 2)
            ]
        );
    }
}
