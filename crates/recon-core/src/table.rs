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

//! In-memory tables with an explicit column schema.
//!
//! A [`Table`] is a list of named, equal-length columns plus a row index. Each
//! column carries a [`ColumnKind`] tag: check columns are tagged when the table
//! is built, not discovered later from their names. [`ColumnKind::from_name`]
//! exists for importers that opt into the "name contains `check`" convention.
//!
//! Every transformation returns a new table; the receiver is never modified.
//! The row index survives filtering, so rows of a filtered table can be traced
//! back to the table they came from.

use crate::error::{ReconError, Result};
use crate::value::{Value, ValueKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Role of a column in a recon table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Ordinary data column.
    #[default]
    Data,
    /// Column of comparison outcomes.
    Check,
}

impl ColumnKind {
    /// Naming convention used by importers: a column whose name contains
    /// `check` (any case) is a check column.
    ///
    /// ```
    /// use recon_core::ColumnKind;
    ///
    /// assert_eq!(ColumnKind::from_name("Amount CHECK"), ColumnKind::Check);
    /// assert_eq!(ColumnKind::from_name("Amount"), ColumnKind::Data);
    /// ```
    pub fn from_name(name: &str) -> Self {
        if name.to_lowercase().contains("check") {
            Self::Check
        } else {
            Self::Data
        }
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    /// Create a data column.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Data,
            values,
        }
    }

    /// Create a check column.
    pub fn check(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Check,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_check(&self) -> bool {
        self.kind == ColumnKind::Check
    }

    /// Number of non-missing cells.
    pub fn non_missing(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }
}

/// How [`Table::concat`] combines columns that are not shared by every table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatJoin {
    /// Keep only columns present in every table.
    #[default]
    Inner,
    /// Keep every column; rows lacking one get `Null`.
    Outer,
}

/// Join type for [`Table::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeHow {
    /// Every left row is kept; unmatched rows carry `Null` on the right side.
    #[default]
    Left,
    /// Only rows with a match on both sides.
    Inner,
}

/// A two-dimensional table with named, kind-tagged columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Table {
    /// Create an empty table with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, validating names and lengths.
    ///
    /// # Errors
    ///
    /// Returns [`ReconError::DuplicateColumn`] or [`ReconError::ColumnLength`].
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut table = Self {
            columns: Vec::with_capacity(columns.len()),
            index: (0..rows).collect(),
        };
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Build a table from a header and row-major values.
    ///
    /// Column kinds are all [`ColumnKind::Data`]; tag check columns afterwards
    /// with [`Table::set_kind`] or [`Table::with_checks_by_name`].
    pub fn from_rows(headers: &[String], rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(h.clone(), Vec::with_capacity(rows.len())))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(ReconError::ColumnLength {
                    column: format!("row {}", row_idx + 1),
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.values.push(value);
            }
        }

        Self::from_columns(columns)
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Row labels, inherited from the table this one was filtered from.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column, failing with [`ReconError::UnknownColumn`].
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| ReconError::UnknownColumn(name.to_string()))
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| ReconError::UnknownColumn(name.to_string()))
    }

    /// Check columns, in table column order.
    pub fn check_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_check())
    }

    /// Values of one row, in column order.
    pub fn row(&self, position: usize) -> Option<Vec<&Value>> {
        if position >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[position]).collect())
    }

    /// Append a column.
    ///
    /// The first column pushed onto a column-less table sets the row count.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        let at = self.columns.len();
        self.insert_column(at, column)
    }

    /// Insert a column at `position` (clamped to the column count).
    pub fn insert_column(&mut self, position: usize, column: Column) -> Result<()> {
        if self.column(&column.name).is_some() {
            return Err(ReconError::DuplicateColumn(column.name));
        }
        if self.columns.is_empty() && self.index.is_empty() {
            self.index = (0..column.len()).collect();
        }
        let actual = column.len();
        if actual != self.row_count() {
            return Err(ReconError::ColumnLength {
                column: column.name,
                expected: self.row_count(),
                actual,
            });
        }
        let position = position.min(self.columns.len());
        self.columns.insert(position, column);
        Ok(())
    }

    /// Change the kind tag of a column.
    pub fn set_kind(&mut self, name: &str, kind: ColumnKind) -> Result<()> {
        let pos = self.position(name)?;
        self.columns[pos].kind = kind;
        Ok(())
    }

    /// Copy of this table with every column re-tagged by
    /// [`ColumnKind::from_name`].
    pub fn with_checks_by_name(&self) -> Table {
        let mut table = self.clone();
        for column in &mut table.columns {
            column.kind = ColumnKind::from_name(&column.name);
        }
        table
    }

    /// Rows at the given positions, in the given order. Row labels are kept.
    ///
    /// Positions past the end are skipped.
    pub fn take_rows(&self, positions: &[usize]) -> Table {
        let positions: Vec<usize> = positions
            .iter()
            .copied()
            .filter(|&p| p < self.row_count())
            .collect();
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    kind: c.kind,
                    values: positions.iter().map(|&p| c.values[p].clone()).collect(),
                })
                .collect(),
            index: positions.iter().map(|&p| self.index[p]).collect(),
        }
    }

    /// Rows for which `keep(position)` returns true.
    pub fn filter_rows(&self, mut keep: impl FnMut(usize) -> bool) -> Table {
        let positions: Vec<usize> = (0..self.row_count()).filter(|&p| keep(p)).collect();
        self.take_rows(&positions)
    }

    /// Rows whose value in `column` satisfies `predicate`.
    pub fn filter_column(
        &self,
        column: &str,
        predicate: impl Fn(&Value) -> bool,
    ) -> Result<Table> {
        let values = &self.require_column(column)?.values;
        Ok(self.filter_rows(|p| predicate(&values[p])))
    }

    /// Rename columns. Names absent from the table are ignored.
    pub fn rename_columns(&self, renames: &BTreeMap<String, String>) -> Result<Table> {
        let mut columns = self.columns.clone();
        for column in &mut columns {
            if let Some(new_name) = renames.get(&column.name) {
                column.name = new_name.clone();
            }
        }
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(ReconError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Table {
            columns,
            index: self.index.clone(),
        })
    }

    /// Remove columns. Every name must exist.
    pub fn drop_columns(&self, names: &[String]) -> Result<Table> {
        for name in names {
            self.position(name)?;
        }
        Ok(Table {
            columns: self
                .columns
                .iter()
                .filter(|c| !names.contains(&c.name))
                .cloned()
                .collect(),
            index: self.index.clone(),
        })
    }

    /// Move a column to `position` (clamped to the last slot).
    pub fn move_column(&self, name: &str, position: usize) -> Result<Table> {
        let from = self.position(name)?;
        let mut columns = self.columns.clone();
        let column = columns.remove(from);
        let position = position.min(columns.len());
        columns.insert(position, column);
        Ok(Table {
            columns,
            index: self.index.clone(),
        })
    }

    /// Columns sorted by name, so that the two sides of a compared attribute
    /// sit next to each other after a merge.
    pub fn sort_columns(&self) -> Table {
        let mut columns = self.columns.clone();
        columns.sort_by(|a, b| a.name.cmp(&b.name));
        Table {
            columns,
            index: self.index.clone(),
        }
    }

    /// Apply `f` to every value of one column.
    pub fn map_column(&self, name: &str, f: impl Fn(&Value) -> Value) -> Result<Table> {
        let pos = self.position(name)?;
        let mut table = self.clone();
        table.columns[pos].values = self.columns[pos].values.iter().map(f).collect();
        Ok(table)
    }

    /// Stack tables vertically. The row index is renumbered from zero.
    ///
    /// Column order follows the first table in which each column appears.
    pub fn concat(tables: &[&Table], join: ConcatJoin) -> Result<Table> {
        let mut names: Vec<(String, ColumnKind)> = Vec::new();
        for table in tables {
            for column in &table.columns {
                if !names.iter().any(|(n, _)| n == &column.name) {
                    names.push((column.name.clone(), column.kind));
                }
            }
        }
        if join == ConcatJoin::Inner {
            names.retain(|(n, _)| tables.iter().all(|t| t.column(n).is_some()));
        }

        let total: usize = tables.iter().map(|t| t.row_count()).sum();
        let mut columns = Vec::with_capacity(names.len());
        for (name, kind) in names {
            let mut values = Vec::with_capacity(total);
            for table in tables {
                match table.column(&name) {
                    Some(c) => values.extend(c.values.iter().cloned()),
                    None => values.extend(std::iter::repeat(Value::Null).take(table.row_count())),
                }
            }
            columns.push(Column { name, kind, values });
        }

        Ok(Table {
            columns,
            index: (0..total).collect(),
        })
    }

    /// Keep the first row of each group of rows equal on `subset`
    /// (all columns when `subset` is empty).
    pub fn drop_duplicates(&self, subset: &[String]) -> Result<Table> {
        let key_columns: Vec<&Column> = if subset.is_empty() {
            self.columns.iter().collect()
        } else {
            subset
                .iter()
                .map(|n| self.require_column(n))
                .collect::<Result<_>>()?
        };

        let mut seen: HashSet<Vec<ValueKey>> = HashSet::new();
        Ok(self.filter_rows(|p| {
            let key: Vec<ValueKey> = key_columns.iter().map(|c| c.values[p].key()).collect();
            seen.insert(key)
        }))
    }

    /// Join `right` onto this table.
    ///
    /// Key columns that have the same name on both sides appear once. Other
    /// columns present on both sides get `suffixes.0` / `suffixes.1` appended.
    /// Rows keep the left table's order; a left row with several matches
    /// yields one row per match, in right-table order. The row index is
    /// renumbered from zero.
    pub fn merge(
        &self,
        right: &Table,
        left_on: &[String],
        right_on: &[String],
        how: MergeHow,
        suffixes: (&str, &str),
    ) -> Result<Table> {
        if left_on.len() != right_on.len() {
            return Err(ReconError::invalid_parameter(
                "right_on",
                format!(
                    "expected {} key columns to match left_on, got {}",
                    left_on.len(),
                    right_on.len()
                ),
            ));
        }
        if left_on.is_empty() {
            return Err(ReconError::invalid_parameter(
                "left_on",
                "at least one key column is required",
            ));
        }

        let left_keys: Vec<&Column> = left_on
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<_>>()?;
        let right_keys: Vec<&Column> = right_on
            .iter()
            .map(|n| right.require_column(n))
            .collect::<Result<_>>()?;

        let shared_keys: HashSet<&str> = left_on
            .iter()
            .zip(right_on)
            .filter(|(l, r)| l == r)
            .map(|(l, _)| l.as_str())
            .collect();

        let mut lookup: HashMap<Vec<ValueKey>, Vec<usize>> = HashMap::new();
        for p in 0..right.row_count() {
            let key = right_keys.iter().map(|c| c.values[p].key()).collect();
            lookup.entry(key).or_default().push(p);
        }

        let mut pairs: Vec<(usize, Option<usize>)> = Vec::new();
        for p in 0..self.row_count() {
            let key: Vec<ValueKey> = left_keys.iter().map(|c| c.values[p].key()).collect();
            match lookup.get(&key) {
                Some(matches) => pairs.extend(matches.iter().map(|&r| (p, Some(r)))),
                None if how == MergeHow::Left => pairs.push((p, None)),
                None => {}
            }
        }

        let right_columns: Vec<&Column> = right
            .columns
            .iter()
            .filter(|c| !shared_keys.contains(c.name.as_str()))
            .collect();
        let overlapping: HashSet<&str> = right_columns
            .iter()
            .map(|c| c.name.as_str())
            .filter(|n| !shared_keys.contains(n) && self.column(n).is_some())
            .collect();

        let mut columns = Vec::with_capacity(self.columns.len() + right_columns.len());
        for column in &self.columns {
            let name = if overlapping.contains(column.name.as_str()) {
                format!("{}{}", column.name, suffixes.0)
            } else {
                column.name.clone()
            };
            columns.push(Column {
                name,
                kind: column.kind,
                values: pairs.iter().map(|&(l, _)| column.values[l].clone()).collect(),
            });
        }
        for column in right_columns {
            let name = if overlapping.contains(column.name.as_str()) {
                format!("{}{}", column.name, suffixes.1)
            } else {
                column.name.clone()
            };
            columns.push(Column {
                name,
                kind: column.kind,
                values: pairs
                    .iter()
                    .map(|&(_, r)| r.map_or(Value::Null, |r| column.values[r].clone()))
                    .collect(),
            });
        }

        let rows = pairs.len();
        let mut merged = Table {
            columns: Vec::with_capacity(columns.len()),
            index: (0..rows).collect(),
        };
        for column in columns {
            merged.push_column(column)?;
        }
        Ok(merged)
    }
}
