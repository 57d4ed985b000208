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

//! Property-based tests for the comparison checks.

use proptest::prelude::*;
use recon_core::{compare_numbers, compare_strings, similarity, Outcome, StringMetric};

fn number() -> impl Strategy<Value = f64> {
    // Integer-valued floats keep `a - b` exact.
    (-100_000_i32..100_000).prop_map(f64::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: a number pair matches iff the values are equal.
    #[test]
    fn prop_numbers_match_iff_equal(a in number(), b in number(), tolerance in 0_u32..1000) {
        let outcomes = compare_numbers(&[a], &[b], f64::from(tolerance)).unwrap();
        prop_assert_eq!(outcomes[0] == Outcome::Match, a == b);
    }

    /// Property: a differing pair is immaterial iff the difference is under the tolerance.
    #[test]
    fn prop_numbers_immaterial_iff_within_tolerance(
        a in number(),
        b in number(),
        tolerance in 0_u32..1000
    ) {
        prop_assume!(a != b);
        let tolerance = f64::from(tolerance);
        let outcomes = compare_numbers(&[a], &[b], tolerance).unwrap();
        match outcomes[0] {
            Outcome::Immaterial => prop_assert!((a - b).abs() < tolerance),
            Outcome::Fail(diff) => {
                prop_assert!((a - b).abs() >= tolerance);
                prop_assert_eq!(diff, a - b);
            }
            Outcome::Match => prop_assert!(false, "unequal values matched"),
        }
    }

    /// Property: one outcome per input pair, in input order.
    #[test]
    fn prop_numbers_preserve_length(pairs in prop::collection::vec((number(), number()), 0..50)) {
        let (left, right): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();
        let outcomes = compare_numbers(&left, &right, 0.0).unwrap();
        prop_assert_eq!(outcomes.len(), pairs.len());
        for ((a, b), outcome) in pairs.iter().zip(&outcomes) {
            prop_assert_eq!(*outcome == Outcome::Match, a == b);
        }
    }

    /// Property: mismatched lengths are always rejected.
    #[test]
    fn prop_numbers_reject_mismatched_shapes(
        left in prop::collection::vec(number(), 0..10),
        extra in 1_usize..5
    ) {
        let mut right = left.clone();
        right.extend(std::iter::repeat(0.0).take(extra));
        prop_assert!(compare_numbers(&left, &right, 0.0).is_err());
    }

    /// Property: a string pair matches iff the texts are identical.
    #[test]
    fn prop_strings_match_iff_identical(
        a in "[a-zA-Z ]{0,20}",
        b in "[a-zA-Z ]{0,20}",
        threshold in 0_u32..=100
    ) {
        let outcomes = compare_strings(&[a.as_str()], &[b.as_str()], f64::from(threshold)).unwrap();
        prop_assert_eq!(outcomes[0] == Outcome::Match, a == b);
    }

    /// Property: non-identical strings are classified by the similarity ratio.
    #[test]
    fn prop_strings_split_on_threshold(
        a in "[a-z]{1,12}",
        b in "[a-z]{1,12}",
        threshold in 0_u32..=100
    ) {
        prop_assume!(a != b);
        let threshold = f64::from(threshold);
        let ratio = similarity(&a, &b, StringMetric::Indel).min(99.0);
        let outcomes = compare_strings(&[a.as_str()], &[b.as_str()], threshold).unwrap();
        match outcomes[0] {
            Outcome::Immaterial => prop_assert!(ratio > threshold),
            Outcome::Fail(r) => {
                prop_assert!(ratio <= threshold);
                prop_assert_eq!(r, ratio);
                prop_assert!((0.0..=99.0).contains(&r));
            }
            Outcome::Match => prop_assert!(false, "different strings matched"),
        }
    }

    /// Property: with the default threshold nothing is immaterial.
    #[test]
    fn prop_strings_default_threshold_never_immaterial(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
        let outcomes = compare_strings(&[a.as_str()], &[b.as_str()], 100.0).unwrap();
        prop_assert_ne!(outcomes[0], Outcome::Immaterial);
    }

    /// Property: similarity is symmetric and bounded for every metric.
    #[test]
    fn prop_similarity_symmetric(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
        for metric in [StringMetric::Indel, StringMetric::Levenshtein] {
            let ab = similarity(&a, &b, metric);
            prop_assert_eq!(ab, similarity(&b, &a, metric));
            prop_assert!((0.0..=100.0).contains(&ab));
        }
    }
}
