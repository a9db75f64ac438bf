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

//! Run configuration.
//!
//! One explicit struct passed into the evaluation — no module-global or
//! environment-driven state in the evaluation path itself.

use crate::error::{DriftwatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default row cap on inference-history fetches
pub const DEFAULT_DATA_LIMIT: usize = 100_000;

/// Default lookback window in days
pub const DEFAULT_LOOKBACK_DAYS: i64 = 1200;

/// Default reporting table name
pub const DEFAULT_MONITOR_TABLE: &str = "monitor_performance";

/// Fixed prefix for monitoring time-series names
pub const METRIC_PREFIX: &str = "performance";

/// Column names of the inference and ground-truth tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Target variable column (binary label)
    pub target: String,

    /// Series key column identifying the subject
    pub series_id: String,

    /// Prediction timestamp column
    pub timestamp: String,

    /// Predicted value column
    pub prediction: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            target: "target_binary".to_string(),
            series_id: "user_id".to_string(),
            timestamp: "prediction_timestamp".to_string(),
            prediction: "prediction_value".to_string(),
        }
    }
}

/// Full configuration for one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Cloud project ID
    pub project_id: String,

    /// Dataset holding the inference history table
    pub dataset_id: String,

    /// Inference history table ID
    pub table_id: String,

    /// Dataset holding the ground-truth table
    pub ground_truth_dataset: String,

    /// Ground-truth table ID
    pub ground_truth_table: String,

    /// Reporting table the metrics row is appended to
    #[serde(default = "default_monitor_table")]
    pub monitor_table: String,

    /// Row cap for inference-history fetches
    #[serde(default = "default_data_limit")]
    pub data_limit: usize,

    /// Lookback window in days
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    /// Model name used to key sink writes
    pub model_name: String,

    /// Explicit model version; resolved from the inference table when unset
    #[serde(default)]
    pub model_version: Option<String>,

    /// Monitoring backend location
    pub location: String,

    /// Warehouse location
    pub warehouse_location: String,

    /// Pipeline job name attached to monitoring points
    pub pipeline_job_name: String,

    /// Column names for target/series/timestamp/prediction
    #[serde(default)]
    pub columns: ColumnSpec,

    /// Path the HTML report artifact is written to
    pub report_path: PathBuf,
}

fn default_monitor_table() -> String {
    DEFAULT_MONITOR_TABLE.to_string()
}

fn default_data_limit() -> usize {
    DEFAULT_DATA_LIMIT
}

fn default_lookback_days() -> i64 {
    DEFAULT_LOOKBACK_DAYS
}

impl MonitorConfig {
    /// Load from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: MonitorConfig = toml::from_str(&text)
            .map_err(|e| DriftwatchError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot address a table or a model.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("project_id", &self.project_id),
            ("dataset_id", &self.dataset_id),
            ("table_id", &self.table_id),
            ("ground_truth_dataset", &self.ground_truth_dataset),
            ("ground_truth_table", &self.ground_truth_table),
            ("monitor_table", &self.monitor_table),
            ("model_name", &self.model_name),
        ] {
            if value.is_empty() {
                return Err(DriftwatchError::Config(format!("{} must be set", field)));
            }
        }
        if self.lookback_days <= 0 {
            return Err(DriftwatchError::Config(
                "lookback_days must be positive".to_string(),
            ));
        }
        if self.data_limit == 0 {
            return Err(DriftwatchError::Config(
                "data_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MonitorConfig {
        MonitorConfig {
            project_id: "acme-prod".to_string(),
            dataset_id: "churn".to_string(),
            table_id: "inference_data_history".to_string(),
            ground_truth_dataset: "churn".to_string(),
            ground_truth_table: "customer_churn_data".to_string(),
            monitor_table: DEFAULT_MONITOR_TABLE.to_string(),
            data_limit: DEFAULT_DATA_LIMIT,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            model_name: "churn_model".to_string(),
            model_version: None,
            location: "europe-west4".to_string(),
            warehouse_location: "europe-west4".to_string(),
            pipeline_job_name: "churn-eval-2024".to_string(),
            columns: ColumnSpec::default(),
            report_path: PathBuf::from("/tmp/report.html"),
        }
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_model_name() {
        let mut config = sample();
        config.model_name.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_lookback() {
        let mut config = sample();
        config.lookback_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_defaults() {
        let toml_text = r#"
            project_id = "acme-prod"
            dataset_id = "churn"
            table_id = "inference_data_history"
            ground_truth_dataset = "churn"
            ground_truth_table = "customer_churn_data"
            model_name = "churn_model"
            location = "europe-west4"
            warehouse_location = "europe-west4"
            pipeline_job_name = "churn-eval-2024"
            report_path = "/tmp/report.html"
        "#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.toml");
        std::fs::write(&path, toml_text).unwrap();

        let config = MonitorConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.data_limit, DEFAULT_DATA_LIMIT);
        assert_eq!(config.lookback_days, DEFAULT_LOOKBACK_DAYS);
        assert_eq!(config.monitor_table, DEFAULT_MONITOR_TABLE);
        assert_eq!(config.columns, ColumnSpec::default());
        assert!(config.model_version.is_none());
    }
}
