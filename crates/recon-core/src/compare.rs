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

//! Tolerance-based comparison checks.
//!
//! Both comparators take two index-aligned sequences and classify each pair as
//! [`Outcome::Match`], [`Outcome::Immaterial`] or [`Outcome::Fail`]:
//!
//! | Comparator          | Match              | Immaterial                  | Fail payload       |
//! |---------------------|--------------------|-----------------------------|--------------------|
//! | [`compare_numbers`] | `a == b`           | `abs(a - b) < tolerance`    | signed `a - b`     |
//! | [`compare_strings`] | identical text     | `ratio > threshold`         | ratio in `0..=100` |
//!
//! With the default parameters (`tolerance = 0`, `threshold = 100`) the
//! `Immaterial` bucket is unreachable: any difference fails.
//!
//! # Examples
//!
//! ```
//! use recon_core::{compare_numbers, compare_strings, Outcome};
//!
//! let outcomes = compare_numbers(&[10.0, 10.0, 10.0], &[10.0, 10.4, 12.0], 1.0).unwrap();
//! assert_eq!(outcomes, vec![Outcome::Match, Outcome::Immaterial, Outcome::Fail(-2.0)]);
//!
//! let outcomes = compare_strings(&["Group", "Grp"], &["Group", "Group"], 70.0).unwrap();
//! assert_eq!(outcomes, vec![Outcome::Match, Outcome::Immaterial]);
//! ```

use crate::error::{ReconError, Result};
use crate::value::{Outcome, Value};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Default numeric tolerance.
pub const DEFAULT_TOLERANCE: f64 = 0.0;

/// Default similarity threshold. No ratio exceeds it.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 100.0;

/// String similarity metric, scaled to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringMetric {
    /// `2 * LCS / (len(a) + len(b))`: edit distance with insertions and
    /// deletions only. This is the classic fuzzy-matching "ratio".
    #[default]
    Indel,
    /// Normalised Levenshtein similarity (substitutions cost 1).
    Levenshtein,
    /// Jaro-Winkler similarity.
    JaroWinkler,
}

/// Compare two numeric sequences element-wise.
///
/// # Errors
///
/// - [`ReconError::ShapeMismatch`] if the sequences differ in length
/// - [`ReconError::InvalidParameter`] if `tolerance` is negative or not finite
/// - [`ReconError::TypeMismatch`] if either side holds a NaN
pub fn compare_numbers(left: &[f64], right: &[f64], tolerance: f64) -> Result<Vec<Outcome>> {
    check_shape(left.len(), right.len())?;
    check_tolerance(tolerance)?;

    left.iter()
        .zip(right)
        .enumerate()
        .map(|(row, (&a, &b))| {
            if a.is_nan() || b.is_nan() {
                return Err(ReconError::type_mismatch(
                    format!("row {}", row + 1),
                    "comparable number",
                    "NaN",
                ));
            }
            Ok(classify_pair(a, b, tolerance))
        })
        .collect()
}

/// Equal infinities match; the difference is only taken for unequal operands.
fn classify_pair(a: f64, b: f64, tolerance: f64) -> Outcome {
    if a == b {
        return Outcome::Match;
    }
    let diff = a - b;
    if diff.abs() < tolerance {
        Outcome::Immaterial
    } else {
        Outcome::Fail(diff)
    }
}

/// Compare two sequences by the similarity of their textual forms, using
/// [`StringMetric::Indel`].
///
/// Values of any `Display` type are compared as text.
///
/// # Errors
///
/// - [`ReconError::ShapeMismatch`] if the sequences differ in length
/// - [`ReconError::InvalidParameter`] if `similarity_threshold` is outside `0..=100`
pub fn compare_strings<A: Display, B: Display>(
    left: &[A],
    right: &[B],
    similarity_threshold: f64,
) -> Result<Vec<Outcome>> {
    compare_strings_with(left, right, similarity_threshold, StringMetric::Indel)
}

/// [`compare_strings`] with an explicit metric.
pub fn compare_strings_with<A: Display, B: Display>(
    left: &[A],
    right: &[B],
    similarity_threshold: f64,
    metric: StringMetric,
) -> Result<Vec<Outcome>> {
    check_shape(left.len(), right.len())?;
    check_threshold(similarity_threshold)?;

    Ok(left
        .iter()
        .zip(right)
        .map(|(a, b)| classify_text(&a.to_string(), &b.to_string(), similarity_threshold, metric))
        .collect())
}

fn classify_text(a: &str, b: &str, threshold: f64, metric: StringMetric) -> Outcome {
    if a == b {
        return Outcome::Match;
    }
    // Rounding may lift a near-identical pair to 100; it still is not identical.
    let ratio = similarity(a, b, metric).min(99.0);
    if ratio > threshold {
        Outcome::Immaterial
    } else {
        Outcome::Fail(ratio)
    }
}

/// Similarity of two strings on a `0..=100` integer scale.
///
/// ```
/// use recon_core::{similarity, StringMetric};
///
/// assert_eq!(similarity("Grp", "Group", StringMetric::Indel), 75.0);
/// assert_eq!(similarity("abc", "abc", StringMetric::Levenshtein), 100.0);
/// assert_eq!(similarity("", "", StringMetric::Indel), 100.0);
/// ```
pub fn similarity(a: &str, b: &str, metric: StringMetric) -> f64 {
    let score = match metric {
        StringMetric::Indel => indel_similarity(a, b),
        StringMetric::Levenshtein => strsim::normalized_levenshtein(a, b),
        StringMetric::JaroWinkler => strsim::jaro_winkler(a, b),
    };
    (score * 100.0).round()
}

fn indel_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * longest_common_subsequence(&a, &b)) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for ca in a {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Numeric comparison over table cells.
///
/// A missing value on either side yields a missing check cell (`Null`), which
/// the report aggregator leaves out of every bucket. A NaN cell counts as
/// missing, as it does when read from CSV. Integers and floats are accepted;
/// any other value fails with [`ReconError::TypeMismatch`].
pub fn compare_number_values(left: &[Value], right: &[Value], tolerance: f64) -> Result<Vec<Value>> {
    check_shape(left.len(), right.len())?;
    check_tolerance(tolerance)?;

    left.iter()
        .zip(right)
        .enumerate()
        .map(|(row, (a, b))| {
            if a.is_null() || b.is_null() {
                return Ok(Value::Null);
            }
            let a = numeric(a, row, "left")?;
            let b = numeric(b, row, "right")?;
            if a.is_nan() || b.is_nan() {
                return Ok(Value::Null);
            }
            Ok(Value::Outcome(classify_pair(a, b, tolerance)))
        })
        .collect()
}

fn numeric(value: &Value, row: usize, side: &str) -> Result<f64> {
    value.as_float().ok_or_else(|| {
        ReconError::type_mismatch(
            format!("{} value at row {}", side, row + 1),
            "number",
            value.to_string(),
        )
    })
}

/// String comparison over table cells. Non-string values are compared by
/// their textual form; a missing value on either side yields `Null`.
pub fn compare_string_values(
    left: &[Value],
    right: &[Value],
    similarity_threshold: f64,
    metric: StringMetric,
) -> Result<Vec<Value>> {
    check_shape(left.len(), right.len())?;
    check_threshold(similarity_threshold)?;

    Ok(left
        .iter()
        .zip(right)
        .map(|(a, b)| {
            if a.is_null() || b.is_null() {
                Value::Null
            } else {
                Value::Outcome(classify_text(
                    &a.to_string(),
                    &b.to_string(),
                    similarity_threshold,
                    metric,
                ))
            }
        })
        .collect())
}

fn check_shape(left: usize, right: usize) -> Result<()> {
    if left != right {
        return Err(ReconError::ShapeMismatch { left, right });
    }
    Ok(())
}

fn check_tolerance(tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ReconError::invalid_parameter(
            "tolerance",
            format!("must be a finite number >= 0, got {}", tolerance),
        ));
    }
    Ok(())
}

fn check_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&threshold) {
        return Err(ReconError::invalid_parameter(
            "similarity_threshold",
            format!("must be between 0 and 100, got {}", threshold),
        ));
    }
    Ok(())
}
