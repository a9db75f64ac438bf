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

//! The structured performance report and its metric extraction.

use crate::analyzer::{roc_auc, ClassificationMetrics, ConfusionMatrix};
use chrono::{DateTime, Utc};
use driftwatch_core::{AlignedRecord, DriftwatchError, MetricSet, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Classification threshold applied to prediction scores
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Exactly the scalar metrics a report defines, in extraction order.
///
/// [`extract_metrics`] produces this set — no extras, no omissions — and
/// both sinks receive it unchanged.
pub const REPORT_METRIC_NAMES: [&str; 9] = [
    "accuracy",
    "precision",
    "recall",
    "specificity",
    "f1_score",
    "roc_auc",
    "sample_count",
    "positive_rate",
    "mean_prediction",
];

/// Structured comparison of a model's predictions against ground truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// When the report was generated (the run timestamp)
    pub generated_at: DateTime<Utc>,

    /// Threshold used for the confusion matrix
    pub threshold: f64,

    /// Number of aligned datapoints assessed
    pub sample_count: usize,

    /// Share of positive ground-truth labels
    pub positive_rate: f64,

    /// Mean predicted score
    pub mean_prediction: f64,

    pub confusion: ConfusionMatrix,
    pub metrics: ClassificationMetrics,
    pub roc_auc: f64,
}

/// Build a report from the aligned dataset.
///
/// The aligner guarantees a non-empty input on the happy path; an empty
/// one here is a caller bug and fails the run.
pub fn generate_report(
    records: &[AlignedRecord],
    generated_at: DateTime<Utc>,
) -> Result<PerformanceReport> {
    if records.is_empty() {
        return Err(DriftwatchError::Report(
            "cannot generate a report from an empty aligned dataset".to_string(),
        ));
    }

    let predictions: Vec<(f64, bool)> = records
        .iter()
        .map(|r| (r.prediction, r.is_positive()))
        .collect();

    let confusion = ConfusionMatrix::from_predictions(&predictions, DEFAULT_THRESHOLD);
    let metrics = ClassificationMetrics::from_confusion_matrix(&confusion);
    let auc = roc_auc(&predictions);

    let sample_count = records.len();
    let positive_count = predictions.iter().filter(|(_, p)| *p).count();
    let mean_prediction =
        predictions.iter().map(|(score, _)| score).sum::<f64>() / sample_count as f64;

    debug!(sample_count, auc, "generated performance report");

    Ok(PerformanceReport {
        generated_at,
        threshold: DEFAULT_THRESHOLD,
        sample_count,
        positive_rate: positive_count as f64 / sample_count as f64,
        mean_prediction,
        confusion,
        metrics,
        roc_auc: auc,
    })
}

/// Pull the named scalar metrics out of a report.
///
/// Pure transform: the key set equals [`REPORT_METRIC_NAMES`] exactly.
pub fn extract_metrics(report: &PerformanceReport) -> MetricSet {
    let mut metrics = MetricSet::new();
    metrics.insert("accuracy", report.metrics.accuracy);
    metrics.insert("precision", report.metrics.precision);
    metrics.insert("recall", report.metrics.recall);
    metrics.insert("specificity", report.metrics.specificity);
    metrics.insert("f1_score", report.metrics.f1_score);
    metrics.insert("roc_auc", report.roc_auc);
    metrics.insert("sample_count", report.sample_count as f64);
    metrics.insert("positive_rate", report.positive_rate);
    metrics.insert("mean_prediction", report.mean_prediction);
    metrics
}
