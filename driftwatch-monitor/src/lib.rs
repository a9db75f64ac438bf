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

//! Driftwatch Monitor
//!
//! The performance-evaluation run: resolve the model version, fetch ground
//! truth and inference history, align them, generate the report, and write
//! the metrics to both sinks. Each invocation is a fresh, isolated
//! execution; every step fully completes before the next starts.

use chrono::{DateTime, Utc};
use driftwatch_core::{MonitorConfig, Result, RunOutcome, SkipReason};
use driftwatch_query::{
    align_predictions, fetch_inference_history, resolve_model_version, TableRef, WarehouseClient,
    WarehouseQuery,
};
use driftwatch_report::{extract_metrics, generate_report, save_html};
use driftwatch_store::{MetricsRow, MetricsTableSink};
use driftwatch_telemetry::{MetricLabels, MonitoringSink};
use tracing::info;
use uuid::Uuid;

/// One evaluation run over a warehouse and two sinks.
pub struct PerformanceMonitor<'a> {
    warehouse: &'a dyn WarehouseClient,
    table_sink: &'a dyn MetricsTableSink,
    monitoring: &'a dyn MonitoringSink,
}

impl<'a> PerformanceMonitor<'a> {
    pub fn new(
        warehouse: &'a dyn WarehouseClient,
        table_sink: &'a dyn MetricsTableSink,
        monitoring: &'a dyn MonitoringSink,
    ) -> Self {
        Self {
            warehouse,
            table_sink,
            monitoring,
        }
    }

    /// Evaluate the performance of a model over previous inferences.
    ///
    /// `now` anchors the lookback window and is the timestamp both sink
    /// writes are keyed by. Empty inference history and empty alignment
    /// are successful no-ops; every other failure propagates unhandled.
    pub fn run(&self, config: &MonitorConfig, now: DateTime<Utc>) -> Result<RunOutcome> {
        config.validate()?;
        let run_id = Uuid::new_v4();
        info!(%run_id, model_name = %config.model_name, "starting performance monitoring run");

        let inference_table = TableRef::new(
            config.project_id.as_str(),
            config.dataset_id.as_str(),
            config.table_id.as_str(),
        )?;
        let model_version = resolve_model_version(
            self.warehouse,
            &inference_table,
            config.model_version.as_deref(),
        )?;

        info!("fetching ground truth data from warehouse");
        let ground_truth_table = TableRef::new(
            config.project_id.as_str(),
            config.ground_truth_dataset.as_str(),
            config.ground_truth_table.as_str(),
        )?;
        let ground_truth = self.warehouse.execute(&WarehouseQuery::SelectAll {
            table: ground_truth_table,
        })?;

        info!("fetching inference history data from warehouse");
        let inference = fetch_inference_history(
            self.warehouse,
            &inference_table,
            model_version.as_str(),
            &config.columns.timestamp,
            config.lookback_days,
            config.data_limit,
            now,
        )?;

        if inference.is_empty() {
            info!("no historical inference data available - skipping performance monitoring");
            return Ok(RunOutcome::Skipped {
                run_id,
                reason: SkipReason::NoInferenceHistory,
            });
        }

        let aligned = align_predictions(&ground_truth, &inference, &config.columns)?;
        if aligned.is_empty() {
            info!("no ground truth data for current predictions - skipping performance monitoring");
            return Ok(RunOutcome::Skipped {
                run_id,
                reason: SkipReason::NoAlignedRows,
            });
        }
        info!(datapoints = aligned.len(), "assessing performance");

        let report = generate_report(&aligned, now)?;
        let metrics = extract_metrics(&report);

        save_html(&report, &config.report_path)?;
        for (name, value) in metrics.iter() {
            info!(metric = name, value, "performance metric");
        }

        info!("writing metrics to monitoring table");
        self.table_sink.append(&MetricsRow {
            run_id,
            model_name: config.model_name.clone(),
            model_version: model_version.to_string(),
            timestamp: now,
            metrics: metrics.clone(),
        })?;

        info!("writing metrics to cloud monitoring");
        let labels = MetricLabels::new(config.model_name.as_str(), config.pipeline_job_name.as_str());
        self.monitoring.write_metrics(&labels, now, &metrics)?;

        Ok(RunOutcome::Completed {
            run_id,
            metrics,
            report_path: config.report_path.clone(),
        })
    }
}
