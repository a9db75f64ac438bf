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

//! Binary classification metrics.
//!
//! The prediction column is a score in [0, 1]; the observed outcome is a
//! binary label. Thresholded metrics come out of the confusion matrix;
//! ROC-AUC is threshold-free, computed from average ranks so tied scores
//! are handled exactly.

use serde::{Deserialize, Serialize};

/// TP/TN/FP/FN counts at a fixed threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Count outcomes over (score, is_positive) pairs. A score at or above
    /// the threshold predicts the positive class.
    pub fn from_predictions(predictions: &[(f64, bool)], threshold: f64) -> Self {
        let mut tp = 0;
        let mut tn = 0;
        let mut fp = 0;
        let mut fn_ = 0;

        for (score, is_positive) in predictions {
            match (*score >= threshold, *is_positive) {
                (true, true) => tp += 1,
                (true, false) => fp += 1,
                (false, true) => fn_ += 1,
                (false, false) => tn += 1,
            }
        }

        Self {
            true_positives: tp,
            true_negatives: tn,
            false_positives: fp,
            false_negatives: fn_,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }
}

/// Scalar metrics derived from a confusion matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub specificity: f64,
    pub f1_score: f64,
}

impl ClassificationMetrics {
    /// Degenerate denominators (no predicted positives, single-class data)
    /// yield 0.0 rather than NaN.
    pub fn from_confusion_matrix(cm: &ConfusionMatrix) -> Self {
        let tp = cm.true_positives as f64;
        let tn = cm.true_negatives as f64;
        let fp = cm.false_positives as f64;
        let fn_ = cm.false_negatives as f64;
        let total = cm.total() as f64;

        let accuracy = if total > 0.0 { (tp + tn) / total } else { 0.0 };
        let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        let specificity = if tn + fp > 0.0 { tn / (tn + fp) } else { 0.0 };
        let f1_score = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            accuracy,
            precision,
            recall,
            specificity,
            f1_score,
        }
    }
}

/// Area under the ROC curve via the rank-sum (Mann-Whitney) formulation.
///
/// Tied scores receive their average rank. Single-class inputs have no
/// defined curve and return the random baseline 0.5.
pub fn roc_auc(predictions: &[(f64, bool)]) -> f64 {
    let n_positive = predictions.iter().filter(|(_, p)| *p).count();
    let n_negative = predictions.len() - n_positive;
    if n_positive == 0 || n_negative == 0 {
        return 0.5;
    }

    let mut indexed: Vec<(f64, bool)> = predictions.to_vec();
    indexed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    // average ranks over tie groups
    let mut rank_sum_positive = 0.0;
    let mut i = 0;
    while i < indexed.len() {
        let mut j = i;
        while j + 1 < indexed.len() && indexed[j + 1].0 == indexed[i].0 {
            j += 1;
        }
        // ranks are 1-based; every member of the tie group gets the mean rank
        let avg_rank = ((i + 1) + (j + 1)) as f64 / 2.0;
        for item in &indexed[i..=j] {
            if item.1 {
                rank_sum_positive += avg_rank;
            }
        }
        i = j + 1;
    }

    let n_pos = n_positive as f64;
    let n_neg = n_negative as f64;
    (rank_sum_positive - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}
