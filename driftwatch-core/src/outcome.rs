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

//! Typed result of one evaluation run.

use crate::metric_set::MetricSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Why a run ended without producing metrics.
///
/// Both cases are successful no-ops, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The inference-history fetch returned no rows
    NoInferenceHistory,

    /// Inference rows exist but none joined with ground truth
    NoAlignedRows,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoInferenceHistory => write!(f, "no historical inference data available"),
            SkipReason::NoAlignedRows => {
                write!(f, "no ground truth data for current predictions")
            }
        }
    }
}

/// Outcome reported back to the hosting pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The run produced metrics and wrote both sinks
    Completed {
        run_id: Uuid,
        metrics: MetricSet,
        report_path: PathBuf,
    },

    /// The run short-circuited on an empty dataset
    Skipped { run_id: Uuid, reason: SkipReason },
}

impl RunOutcome {
    pub fn run_id(&self) -> Uuid {
        match self {
            RunOutcome::Completed { run_id, .. } | RunOutcome::Skipped { run_id, .. } => *run_id,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RunOutcome::Skipped { .. })
    }

    pub fn metrics(&self) -> Option<&MetricSet> {
        match self {
            RunOutcome::Completed { metrics, .. } => Some(metrics),
            RunOutcome::Skipped { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_has_no_metrics() {
        let outcome = RunOutcome::Skipped {
            run_id: Uuid::new_v4(),
            reason: SkipReason::NoInferenceHistory,
        };
        assert!(outcome.is_skipped());
        assert!(outcome.metrics().is_none());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = RunOutcome::Skipped {
            run_id: Uuid::new_v4(),
            reason: SkipReason::NoAlignedRows,
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains(r#""status":"skipped""#));
        assert!(json.contains(r#""reason":"no_aligned_rows""#));
    }
}
