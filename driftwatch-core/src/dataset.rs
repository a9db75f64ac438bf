// Copyright 2025 Driftwatch (https://github.com/driftwatch)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! In-memory tabular dataset.
//!
//! The common currency of the query layer: every warehouse read produces a
//! `Dataset`, and the aligner consumes two of them. Datasets are immutable
//! once fetched; their lifetime is one evaluation run.

use crate::error::{DriftwatchError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Column-named, row-oriented table of [`Value`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset with the given column names.
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. The row must match the column arity.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(DriftwatchError::Query(format!(
                "row arity {} does not match {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Column index, or a `ColumnNotFound` error naming the column.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| DriftwatchError::ColumnNotFound(name.to_string()))
    }

    /// Value at (row, column name). Errors if the column does not exist.
    pub fn value(&self, row: usize, column: &str) -> Result<&Value> {
        let idx = self.require_column(column)?;
        self.rows
            .get(row)
            .and_then(|r| r.get(idx))
            .ok_or_else(|| DriftwatchError::Query(format!("row {} out of bounds", row)))
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Keep only rows for which `keep` returns true.
    pub fn filtered<F: Fn(&[Value]) -> bool>(&self, keep: F) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|r| keep(r.as_slice()))
                .cloned()
                .collect(),
        }
    }

    /// Rows sorted descending by a timestamp column, capped at `limit`.
    pub fn latest(&self, timestamp_column: &str, limit: usize) -> Result<Dataset> {
        let idx = self.require_column(timestamp_column)?;
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            let ta = a[idx].as_timestamp();
            let tb = b[idx].as_timestamp();
            tb.cmp(&ta)
        });
        rows.truncate(limit);
        Ok(Dataset {
            columns: self.columns.clone(),
            rows,
        })
    }
}
