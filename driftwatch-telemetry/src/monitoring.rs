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

//! The monitoring-backend sink.
//!
//! One time-series point per metric, named `<prefix>.<metric>` and labeled
//! with the model and pipeline job. Writes are fire-and-forget: the point
//! is handed to the exporter and the run moves on.

use chrono::{DateTime, Utc};
use driftwatch_core::{MetricSet, Result, METRIC_PREFIX};
use opentelemetry::metrics::Meter;
use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Labels attached to every emitted point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricLabels {
    pub model_name: String,
    pub pipeline_job_name: String,
    pub prefix: String,
}

impl MetricLabels {
    pub fn new(model_name: impl Into<String>, pipeline_job_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            pipeline_job_name: pipeline_job_name.into(),
            prefix: METRIC_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Emits one time-series point per metric at the given timestamp.
pub trait MonitoringSink {
    fn write_metrics(
        &self,
        labels: &MetricLabels,
        timestamp: DateTime<Utc>,
        metrics: &MetricSet,
    ) -> Result<()>;
}

/// OpenTelemetry-backed monitoring sink.
pub struct OtelMonitoringSink {
    meter: Meter,
}

impl OtelMonitoringSink {
    pub fn new(meter: Meter) -> Self {
        Self { meter }
    }
}

impl MonitoringSink for OtelMonitoringSink {
    fn write_metrics(
        &self,
        labels: &MetricLabels,
        timestamp: DateTime<Utc>,
        metrics: &MetricSet,
    ) -> Result<()> {
        // The SDK stamps export time; the run timestamp rides as an
        // attribute so points stay correlated with the table row.
        let attributes = [
            KeyValue::new("model_name", labels.model_name.clone()),
            KeyValue::new("pipeline_job_name", labels.pipeline_job_name.clone()),
            KeyValue::new("run_timestamp", timestamp.to_rfc3339()),
        ];

        for (name, value) in metrics.iter() {
            let instrument = self
                .meter
                .f64_histogram(format!("{}.{}", labels.prefix, name))
                .init();
            instrument.record(value, &attributes);
        }
        debug!(
            model_name = %labels.model_name,
            points = metrics.len(),
            "emitted monitoring points"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use opentelemetry::metrics::MeterProvider;
    use opentelemetry_sdk::metrics::SdkMeterProvider;

    #[test]
    fn test_labels_default_prefix() {
        let labels = MetricLabels::new("churn_model", "churn-eval-2024");
        assert_eq!(labels.prefix, METRIC_PREFIX);
        assert_eq!(
            labels.clone().with_prefix("drift").prefix,
            "drift".to_string()
        );
    }

    #[test]
    fn test_emit_against_noop_meter() {
        let provider = SdkMeterProvider::default();
        let sink = OtelMonitoringSink::new(provider.meter("driftwatch-test"));

        let mut metrics = MetricSet::new();
        metrics.insert("accuracy", 0.9);
        metrics.insert("recall", 0.8);

        let labels = MetricLabels::new("churn_model", "churn-eval-2024");
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        sink.write_metrics(&labels, timestamp, &metrics).unwrap();
    }
}
