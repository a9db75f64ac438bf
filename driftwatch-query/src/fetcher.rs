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

//! Historical-inference fetching.

use crate::client::{TableRef, WarehouseClient, WarehouseQuery};
use chrono::{DateTime, Duration, Utc};
use driftwatch_core::{Dataset, Result};
use tracing::info;

/// Fetch previously recorded predictions for one model version.
///
/// The window is `[now - lookback_days, now]`, newest rows first, capped at
/// `limit`. An empty result is a valid terminal state for the run, not an
/// error — the caller decides whether to skip.
pub fn fetch_inference_history(
    client: &dyn WarehouseClient,
    table: &TableRef,
    model_version: &str,
    timestamp_column: &str,
    lookback_days: i64,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<Dataset> {
    let cutoff = now - Duration::days(lookback_days);
    let dataset = client.execute(&WarehouseQuery::InferenceHistory {
        table: table.clone(),
        model_version: model_version.to_string(),
        timestamp_column: timestamp_column.to_string(),
        cutoff,
        limit,
    })?;
    info!(
        table = %table,
        model_version,
        lookback_days,
        rows = dataset.len(),
        "fetched inference history"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MODEL_VERSION_COLUMN;
    use crate::local::LocalWarehouse;
    use chrono::TimeZone;
    use driftwatch_core::Value;

    #[test]
    fn test_lookback_cutoff_applied() {
        let table = TableRef::new("acme", "churn", "inference_data_history").unwrap();
        let mut ds = Dataset::new(vec!["prediction_timestamp", MODEL_VERSION_COLUMN]);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        // one row inside a 30-day window, one outside
        ds.push_row(vec![
            Value::Timestamp(now - Duration::days(5)),
            Value::Int(1),
        ])
        .unwrap();
        ds.push_row(vec![
            Value::Timestamp(now - Duration::days(45)),
            Value::Int(1),
        ])
        .unwrap();

        let warehouse = LocalWarehouse::new();
        warehouse.insert_table(&table, ds);

        let result = fetch_inference_history(
            &warehouse,
            &table,
            "1",
            "prediction_timestamp",
            30,
            100,
            now,
        )
        .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_empty_fetch_is_ok() {
        let table = TableRef::new("acme", "churn", "inference_data_history").unwrap();
        let warehouse = LocalWarehouse::new();
        warehouse.insert_table(
            &table,
            Dataset::new(vec!["prediction_timestamp", MODEL_VERSION_COLUMN]),
        );

        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let result = fetch_inference_history(
            &warehouse,
            &table,
            "1",
            "prediction_timestamp",
            30,
            100,
            now,
        )
        .unwrap();
        assert!(result.is_empty());
    }
}
