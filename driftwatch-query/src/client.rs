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

//! The warehouse client seam.
//!
//! Queries are typed values rather than SQL strings: a remote client renders
//! them through [`crate::sql::render_sql`], while the local warehouse
//! interprets them directly. This keeps the executors testable without a
//! SQL parser on the read side.

use chrono::{DateTime, Utc};
use driftwatch_core::{Dataset, DriftwatchError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column carrying the model version tag in inference tables
pub const MODEL_VERSION_COLUMN: &str = "model_version";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").expect("identifier pattern"));

/// Fully-qualified warehouse table reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    /// Build a reference, validating every identifier before it can reach
    /// rendered SQL.
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self> {
        let table_ref = Self {
            project: project.into(),
            dataset: dataset.into(),
            table: table.into(),
        };
        for part in [&table_ref.project, &table_ref.dataset, &table_ref.table] {
            if !IDENTIFIER.is_match(part) {
                return Err(DriftwatchError::InvalidIdentifier(part.clone()));
            }
        }
        Ok(table_ref)
    }

    /// `project.dataset.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.project, self.dataset, self.table)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// A parameterized warehouse read.
#[derive(Debug, Clone, PartialEq)]
pub enum WarehouseQuery {
    /// Maximum recorded model version in an inference table
    MaxVersion { table: TableRef },

    /// Inference rows for one model version inside the lookback window,
    /// newest first, capped at `limit` rows
    InferenceHistory {
        table: TableRef,
        model_version: String,
        timestamp_column: String,
        cutoff: DateTime<Utc>,
        limit: usize,
    },

    /// Full scan of a table (ground-truth reads)
    SelectAll { table: TableRef },
}

impl WarehouseQuery {
    pub fn table(&self) -> &TableRef {
        match self {
            WarehouseQuery::MaxVersion { table }
            | WarehouseQuery::InferenceHistory { table, .. }
            | WarehouseQuery::SelectAll { table } => table,
        }
    }
}

/// Executes typed reads against a tabular warehouse.
///
/// Implementations are synchronous and blocking; each call fully completes
/// before the caller proceeds.
pub trait WarehouseClient {
    fn execute(&self, query: &WarehouseQuery) -> Result<Dataset>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        let table = TableRef::new("acme-prod", "churn", "inference_data_history").unwrap();
        assert_eq!(
            table.qualified_name(),
            "acme-prod.churn.inference_data_history"
        );
    }

    #[test]
    fn test_rejects_quoting_attempts() {
        assert!(TableRef::new("acme`; DROP", "churn", "t").is_err());
        assert!(TableRef::new("acme", "chu rn", "t").is_err());
        assert!(TableRef::new("acme", "churn", "").is_err());
        assert!(TableRef::new("1acme", "churn", "t").is_err());
    }
}
