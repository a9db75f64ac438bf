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

//! SQL rendering for remote warehouse clients.
//!
//! Identifiers are validated at [`crate::client::TableRef`] construction;
//! the only free-form string reaching a query is the model version, which
//! is escaped here.

use crate::client::{WarehouseQuery, MODEL_VERSION_COLUMN};
use driftwatch_core::Result;

/// Render a typed query to warehouse SQL (backtick-quoted table paths).
pub fn render_sql(query: &WarehouseQuery) -> Result<String> {
    let sql = match query {
        WarehouseQuery::MaxVersion { table } => format!(
            "SELECT MAX({version}) AS {version} FROM `{table}`",
            version = MODEL_VERSION_COLUMN,
            table = table.qualified_name(),
        ),
        WarehouseQuery::InferenceHistory {
            table,
            model_version,
            timestamp_column,
            cutoff,
            limit,
        } => format!(
            "SELECT * FROM `{table}` \
             WHERE {version} = '{value}' \
             AND {ts} >= TIMESTAMP '{cutoff}' \
             ORDER BY {ts} DESC LIMIT {limit}",
            table = table.qualified_name(),
            version = MODEL_VERSION_COLUMN,
            value = escape_literal(model_version),
            ts = timestamp_column,
            cutoff = cutoff.format("%Y-%m-%d %H:%M:%S%.6f UTC"),
            limit = limit,
        ),
        WarehouseQuery::SelectAll { table } => {
            format!("SELECT * FROM `{}`", table.qualified_name())
        }
    };
    Ok(sql)
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::TableRef;
    use chrono::{TimeZone, Utc};

    fn table() -> TableRef {
        TableRef::new("acme-prod", "churn", "inference_data_history").unwrap()
    }

    #[test]
    fn test_max_version_sql() {
        let sql = render_sql(&WarehouseQuery::MaxVersion { table: table() }).unwrap();
        assert_eq!(
            sql,
            "SELECT MAX(model_version) AS model_version \
             FROM `acme-prod.churn.inference_data_history`"
        );
    }

    #[test]
    fn test_inference_history_sql() {
        let cutoff = Utc.with_ymd_and_hms(2023, 1, 15, 6, 30, 0).unwrap();
        let sql = render_sql(&WarehouseQuery::InferenceHistory {
            table: table(),
            model_version: "3".to_string(),
            timestamp_column: "prediction_timestamp".to_string(),
            cutoff,
            limit: 100_000,
        })
        .unwrap();

        assert!(sql.starts_with("SELECT * FROM `acme-prod.churn.inference_data_history`"));
        assert!(sql.contains("model_version = '3'"));
        assert!(sql.contains("prediction_timestamp >= TIMESTAMP '2023-01-15 06:30:00.000000 UTC'"));
        assert!(sql.ends_with("ORDER BY prediction_timestamp DESC LIMIT 100000"));
    }

    #[test]
    fn test_version_literal_is_escaped() {
        let cutoff = Utc.with_ymd_and_hms(2023, 1, 15, 0, 0, 0).unwrap();
        let sql = render_sql(&WarehouseQuery::InferenceHistory {
            table: table(),
            model_version: "v'1".to_string(),
            timestamp_column: "prediction_timestamp".to_string(),
            cutoff,
            limit: 10,
        })
        .unwrap();
        assert!(sql.contains(r"model_version = 'v\'1'"));
    }

    #[test]
    fn test_select_all_sql() {
        let sql = render_sql(&WarehouseQuery::SelectAll { table: table() }).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM `acme-prod.churn.inference_data_history`"
        );
    }
}
