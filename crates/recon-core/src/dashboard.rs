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

//! Cross-recon dashboard totals.

use crate::report::ReconSummary;
use crate::value::{Bucket, IMMATERIAL, MATCH};
use serde::{Deserialize, Serialize};

/// Label used for failing checks in the outcome distribution.
pub const FAIL: &str = "Fail";

/// Headline numbers over the most recent summary of every recon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardTotals {
    /// Distinct check columns, summed per summary.
    pub rules_applied: usize,
    /// Sum of every summary count.
    pub records_checked: usize,
    pub matching: usize,
    pub immaterial: usize,
    pub failing: usize,
    /// Sum of the registered per-recon value (hours saved per quarter).
    pub hours_saved: f64,
}

impl DashboardTotals {
    /// Aggregate a set of summaries.
    ///
    /// ```
    /// use recon_core::DashboardTotals;
    ///
    /// let totals = DashboardTotals::from_summaries(&[]);
    /// assert_eq!(totals.records_checked, 0);
    /// ```
    pub fn from_summaries(summaries: &[ReconSummary]) -> Self {
        let mut totals = Self::default();
        for summary in summaries {
            totals.rules_applied += summary.checks().len();
            totals.records_checked += summary.records_checked();
            totals.matching += summary.total(Bucket::Match);
            totals.immaterial += summary.total(Bucket::Immaterial);
            totals.failing += summary.total(Bucket::Failing);
        }
        totals
    }

    pub fn with_hours_saved(mut self, hours: f64) -> Self {
        self.hours_saved = hours;
        self
    }

    /// `(Match, Immaterial, Fail)` counts, for the outcome distribution chart.
    pub fn distribution(&self) -> [(&'static str, usize); 3] {
        [
            (MATCH, self.matching),
            (IMMATERIAL, self.immaterial),
            (FAIL, self.failing),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SummaryRow;
    use chrono::NaiveDate;

    fn summary(check_counts: &[(&str, [usize; 3])]) -> ReconSummary {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let mut summary = ReconSummary::new();
        for (check, counts) in check_counts {
            for (bucket, count) in Bucket::ALL.iter().zip(counts) {
                summary.push(SummaryRow {
                    date,
                    check: check.to_string(),
                    outcome: *bucket,
                    count: *count,
                });
            }
        }
        summary
    }

    #[test]
    fn test_totals_across_recons() {
        let residential = summary(&[("Rent Check", [5, 1, 2]), ("Tenant Check", [7, 0, 1])]);
        let sales = summary(&[("Price Check", [10, 2, 0])]);

        let totals = DashboardTotals::from_summaries(&[residential, sales]).with_hours_saved(12.5);
        assert_eq!(totals.rules_applied, 3);
        assert_eq!(totals.records_checked, 28);
        assert_eq!(totals.matching, 22);
        assert_eq!(totals.immaterial, 3);
        assert_eq!(totals.failing, 3);
        assert_eq!(totals.hours_saved, 12.5);
        assert_eq!(
            totals.distribution(),
            [("Match", 22), ("Immaterial", 3), ("Fail", 3)]
        );
    }

    #[test]
    fn test_empty_summary_counts_nothing() {
        let totals = DashboardTotals::from_summaries(&[ReconSummary::new()]);
        assert_eq!(totals, DashboardTotals::default());
    }
}
