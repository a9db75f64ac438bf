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

//! In-memory warehouse used for local runs and tests.
//!
//! Interprets [`WarehouseQuery`] values directly over registered datasets,
//! with the same semantics a remote warehouse would apply to the rendered
//! SQL. Tables are keyed by their qualified `project.dataset.table` name.

use crate::client::{TableRef, WarehouseClient, WarehouseQuery, MODEL_VERSION_COLUMN};
use driftwatch_core::{Dataset, DriftwatchError, Result, Value};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;

/// Synchronous in-memory warehouse.
#[derive(Default)]
pub struct LocalWarehouse {
    tables: RwLock<HashMap<String, Dataset>>,
}

impl LocalWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table under its qualified name.
    pub fn insert_table(&self, table: &TableRef, dataset: Dataset) {
        self.tables
            .write()
            .insert(table.qualified_name(), dataset);
    }

    /// Load every `<project.dataset.table>.json` file in a directory as a
    /// table. Files are serialized [`Dataset`] values.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let warehouse = Self::new();
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(warehouse);
        }
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default()
                    .to_string();
                let text = std::fs::read_to_string(&path)?;
                let dataset: Dataset = serde_json::from_str(&text)?;
                tracing::debug!(table = %name, rows = dataset.len(), "loaded local table");
                warehouse.tables.write().insert(name, dataset);
            }
        }
        Ok(warehouse)
    }

    pub fn table_count(&self) -> usize {
        self.tables.read().len()
    }

    fn lookup(&self, table: &TableRef) -> Result<Dataset> {
        self.tables
            .read()
            .get(&table.qualified_name())
            .cloned()
            .ok_or_else(|| {
                DriftwatchError::Query(format!("table not found: {}", table.qualified_name()))
            })
    }
}

impl WarehouseClient for LocalWarehouse {
    fn execute(&self, query: &WarehouseQuery) -> Result<Dataset> {
        match query {
            WarehouseQuery::MaxVersion { table } => {
                let dataset = self.lookup(table)?;
                let idx = dataset.require_column(MODEL_VERSION_COLUMN)?;
                let max = dataset
                    .rows()
                    .map(|r| &r[idx])
                    .filter(|v| !v.is_null())
                    .max_by(compare_versions)
                    .cloned();

                let mut result = Dataset::new(vec![MODEL_VERSION_COLUMN]);
                if let Some(value) = max {
                    result.push_row(vec![value])?;
                }
                Ok(result)
            }
            WarehouseQuery::InferenceHistory {
                table,
                model_version,
                timestamp_column,
                cutoff,
                limit,
            } => {
                let dataset = self.lookup(table)?;
                let version_idx = dataset.require_column(MODEL_VERSION_COLUMN)?;
                let ts_idx = dataset.require_column(timestamp_column)?;

                let filtered = dataset.filtered(|row| {
                    let version_matches = row[version_idx]
                        .canonical_string()
                        .map(|v| v == *model_version)
                        .unwrap_or(false);
                    let in_window = row[ts_idx]
                        .as_timestamp()
                        .map(|ts| ts >= *cutoff)
                        .unwrap_or(false);
                    version_matches && in_window
                });
                filtered.latest(timestamp_column, *limit)
            }
            WarehouseQuery::SelectAll { table } => self.lookup(table),
        }
    }
}

/// Order version values the way the warehouse MAX() would: numerically
/// when both sides are numeric, lexicographically otherwise.
fn compare_versions(a: &&Value, b: &&Value) -> std::cmp::Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => a
            .canonical_string()
            .unwrap_or_default()
            .cmp(&b.canonical_string().unwrap_or_default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn inference_table() -> (TableRef, Dataset) {
        let table = TableRef::new("acme", "churn", "inference_data_history").unwrap();
        let mut ds = Dataset::new(vec![
            "user_id",
            "prediction_timestamp",
            "prediction_value",
            MODEL_VERSION_COLUMN,
        ]);
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        for (user, days, pred, version) in [
            (1i64, 0i64, 0.9, 2i64),
            (2, 1, 0.4, 2),
            (3, 2, 0.7, 1),
            (4, 30, 0.2, 2),
        ] {
            ds.push_row(vec![
                Value::Int(user),
                Value::Timestamp(base + Duration::days(days)),
                Value::Float(pred),
                Value::Int(version),
            ])
            .unwrap();
        }
        (table, ds)
    }

    #[test]
    fn test_max_version() {
        let (table, ds) = inference_table();
        let warehouse = LocalWarehouse::new();
        warehouse.insert_table(&table, ds);

        let result = warehouse
            .execute(&WarehouseQuery::MaxVersion {
                table: table.clone(),
            })
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.value(0, MODEL_VERSION_COLUMN).unwrap(),
            &Value::Int(2)
        );
    }

    #[test]
    fn test_max_version_empty_table_yields_no_rows() {
        let table = TableRef::new("acme", "churn", "empty").unwrap();
        let warehouse = LocalWarehouse::new();
        warehouse.insert_table(
            &table,
            Dataset::new(vec![MODEL_VERSION_COLUMN, "prediction_timestamp"]),
        );

        let result = warehouse
            .execute(&WarehouseQuery::MaxVersion {
                table: table.clone(),
            })
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_inference_history_filters_version_and_window() {
        let (table, ds) = inference_table();
        let warehouse = LocalWarehouse::new();
        warehouse.insert_table(&table, ds);

        let cutoff = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let result = warehouse
            .execute(&WarehouseQuery::InferenceHistory {
                table: table.clone(),
                model_version: "2".to_string(),
                timestamp_column: "prediction_timestamp".to_string(),
                cutoff,
                limit: 10,
            })
            .unwrap();

        // version 1 row excluded; all version-2 rows are inside the window
        assert_eq!(result.len(), 3);
        // newest first
        let first = result
            .value(0, "prediction_timestamp")
            .unwrap()
            .as_timestamp()
            .unwrap();
        assert_eq!(first, cutoff + Duration::days(30));
    }

    #[test]
    fn test_inference_history_respects_limit() {
        let (table, ds) = inference_table();
        let warehouse = LocalWarehouse::new();
        warehouse.insert_table(&table, ds);

        let cutoff = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let result = warehouse
            .execute(&WarehouseQuery::InferenceHistory {
                table: table.clone(),
                model_version: "2".to_string(),
                timestamp_column: "prediction_timestamp".to_string(),
                cutoff,
                limit: 1,
            })
            .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_unknown_table_is_query_error() {
        let warehouse = LocalWarehouse::new();
        let table = TableRef::new("acme", "churn", "missing").unwrap();
        let err = warehouse
            .execute(&WarehouseQuery::SelectAll { table })
            .unwrap_err();
        assert!(matches!(err, DriftwatchError::Query(_)));
    }

    #[test]
    fn test_load_dir_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (table, ds) = inference_table();
        let path = dir.path().join(format!("{}.json", table.qualified_name()));
        std::fs::write(&path, serde_json::to_string(&ds).unwrap()).unwrap();

        let warehouse = LocalWarehouse::load_dir(dir.path()).unwrap();
        assert_eq!(warehouse.table_count(), 1);
        let loaded = warehouse
            .execute(&WarehouseQuery::SelectAll { table })
            .unwrap();
        assert_eq!(loaded.len(), 4);
    }
}
