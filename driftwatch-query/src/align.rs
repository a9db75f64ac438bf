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

//! Ground-truth / prediction alignment.
//!
//! Inner join on the series key: for each series, the most recent
//! prediction inside the window is matched with its observed outcome.
//! Rows with NULL keys, labels, predictions or timestamps drop out of the
//! join, the same way they would in a warehouse-side join.

use crate::client::MODEL_VERSION_COLUMN;
use chrono::{DateTime, Utc};
use driftwatch_core::{
    AlignedRecord, ColumnSpec, Dataset, GroundTruthRecord, InferenceRecord, Result,
};
use std::collections::HashMap;
use tracing::debug;

/// Typed view of a ground-truth dataset. Rows with NULL keys or labels are
/// dropped.
pub fn ground_truth_records(
    dataset: &Dataset,
    columns: &ColumnSpec,
) -> Result<Vec<GroundTruthRecord>> {
    let series_idx = dataset.require_column(&columns.series_id)?;
    let target_idx = dataset.require_column(&columns.target)?;

    Ok(dataset
        .rows()
        .filter_map(|row| {
            let series_id = row[series_idx].canonical_string()?;
            let target = row[target_idx].as_f64()?;
            Some(GroundTruthRecord { series_id, target })
        })
        .collect())
}

/// Typed view of an inference-history dataset. Rows with NULL keys,
/// timestamps, predictions or versions are dropped.
pub fn inference_records(dataset: &Dataset, columns: &ColumnSpec) -> Result<Vec<InferenceRecord>> {
    let series_idx = dataset.require_column(&columns.series_id)?;
    let ts_idx = dataset.require_column(&columns.timestamp)?;
    let pred_idx = dataset.require_column(&columns.prediction)?;
    let version_idx = dataset.require_column(MODEL_VERSION_COLUMN)?;

    Ok(dataset
        .rows()
        .filter_map(|row| {
            let series_id = row[series_idx].canonical_string()?;
            let timestamp = row[ts_idx].as_timestamp()?;
            let prediction = row[pred_idx].as_f64()?;
            let model_version = row[version_idx].canonical_string()?;
            Some(InferenceRecord {
                series_id,
                timestamp,
                prediction,
                model_version,
            })
        })
        .collect())
}

/// Join ground truth to predictions, producing the analysis-ready dataset.
///
/// An empty result is a valid terminal state with the same skip semantics
/// as an empty inference fetch.
pub fn align_predictions(
    ground_truth: &Dataset,
    inference: &Dataset,
    columns: &ColumnSpec,
) -> Result<Vec<AlignedRecord>> {
    let truths = ground_truth_records(ground_truth, columns)?;
    let predictions = inference_records(inference, columns)?;

    let mut targets: HashMap<String, f64> = HashMap::with_capacity(truths.len());
    for record in truths {
        targets.insert(record.series_id, record.target);
    }

    // latest prediction per series key
    let mut latest: HashMap<String, (DateTime<Utc>, f64)> = HashMap::new();
    for record in predictions {
        match latest.get(&record.series_id) {
            Some((existing, _)) if *existing >= record.timestamp => {}
            _ => {
                latest.insert(record.series_id, (record.timestamp, record.prediction));
            }
        }
    }

    let mut aligned: Vec<AlignedRecord> = latest
        .into_iter()
        .filter_map(|(series_id, (timestamp, prediction))| {
            targets.get(&series_id).map(|target| AlignedRecord {
                series_id,
                target: *target,
                prediction,
                timestamp,
            })
        })
        .collect();
    aligned.sort_by(|a, b| a.series_id.cmp(&b.series_id));

    debug!(
        ground_truth_rows = ground_truth.len(),
        inference_rows = inference.len(),
        aligned = aligned.len(),
        "aligned predictions with ground truth"
    );
    Ok(aligned)
}
