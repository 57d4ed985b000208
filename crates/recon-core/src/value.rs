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

//! Cell values and comparison outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag written for an exact match.
pub const MATCH: &str = "Match";
/// Tag written for a difference within tolerance.
pub const IMMATERIAL: &str = "Immaterial";
/// Summary-level label for every other outcome.
pub const FAILING: &str = "Failing";

/// The classification of a single comparison.
///
/// `Fail` carries the raw difference (numeric checks) or the similarity ratio
/// (string checks), so downstream consumers can sort or bucket by severity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The two values are exactly equal.
    Match,
    /// The values differ, but within the caller-supplied tolerance.
    Immaterial,
    /// The values differ materially; the payload is the difference or ratio.
    Fail(f64),
}

impl Outcome {
    /// Parse the textual form written by [`Outcome`]'s `Display`.
    ///
    /// ```
    /// use recon_core::Outcome;
    ///
    /// assert_eq!(Outcome::parse("Match"), Some(Outcome::Match));
    /// assert_eq!(Outcome::parse("-2.5"), Some(Outcome::Fail(-2.5)));
    /// assert_eq!(Outcome::parse("pending"), None);
    /// assert_eq!(Outcome::parse("NaN"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            MATCH => Some(Self::Match),
            IMMATERIAL => Some(Self::Immaterial),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .map(Self::Fail),
        }
    }

    /// The summary bucket this outcome is counted in.
    pub fn bucket(&self) -> Bucket {
        match self {
            Self::Match => Bucket::Match,
            Self::Immaterial => Bucket::Immaterial,
            Self::Fail(_) => Bucket::Failing,
        }
    }

    /// The failure payload, if any.
    pub fn payload(&self) -> Option<f64> {
        match self {
            Self::Fail(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Match => f.write_str(MATCH),
            Self::Immaterial => f.write_str(IMMATERIAL),
            Self::Fail(v) => write!(f, "{}", v),
        }
    }
}

/// Summary-level outcome. All `Fail` payloads collapse into `Failing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    Match,
    Immaterial,
    Failing,
}

impl Bucket {
    /// Buckets in the order the aggregator emits them.
    pub const ALL: [Bucket; 3] = [Bucket::Match, Bucket::Immaterial, Bucket::Failing];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => MATCH,
            Self::Immaterial => IMMATERIAL,
            Self::Failing => FAILING,
        }
    }

    /// Parse a summary `Outcome` cell. Anything other than the two tags is failing.
    pub fn from_label(s: &str) -> Self {
        match s.trim() {
            MATCH => Self::Match,
            IMMATERIAL => Self::Immaterial,
            _ => Self::Failing,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Result of a comparison check.
    Outcome(Outcome),
}

impl Value {
    /// Returns true if this value is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_outcome(&self) -> Option<Outcome> {
        match self {
            Self::Outcome(o) => Some(*o),
            _ => None,
        }
    }

    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Outcome(_) => "outcome",
        }
    }

    /// Equality key used by joins and de-duplication.
    ///
    /// Integers and floats with the same numeric value share a key, as do
    /// `0.0` and `-0.0`.
    pub fn key(&self) -> ValueKey {
        match self {
            Self::Null => ValueKey::Null,
            Self::Bool(b) => ValueKey::Bool(*b),
            Self::Int(n) => ValueKey::number(*n as f64),
            Self::Float(n) => ValueKey::number(*n),
            Self::String(s) => ValueKey::Text(s.clone()),
            Self::Outcome(o) => ValueKey::Text(o.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
            Self::Outcome(o) => write!(f, "{}", o),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Outcome> for Value {
    fn from(o: Outcome) -> Self {
        Self::Outcome(o)
    }
}

/// Hashable projection of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Null,
    Bool(bool),
    /// Bit pattern of a normalised `f64`.
    Number(u64),
    Text(String),
}

impl ValueKey {
    fn number(n: f64) -> Self {
        let n = if n == 0.0 { 0.0 } else { n };
        Self::Number(n.to_bits())
    }
}
