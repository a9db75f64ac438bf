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

//! Typed row views over the monitoring datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed outcome for a subject, keyed by series ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthRecord {
    /// Canonical series key (warehouse value cast to string)
    pub series_id: String,

    /// Binary target label as 0.0/1.0
    pub target: f64,
}

/// One recorded prediction for a (series, timestamp) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRecord {
    pub series_id: String,
    pub timestamp: DateTime<Utc>,
    pub prediction: f64,
    pub model_version: String,
}

/// Join of ground truth and the most recent prediction for a series.
///
/// Exists only transiently between the aligner and the report generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedRecord {
    pub series_id: String,
    pub target: f64,
    pub prediction: f64,
    pub timestamp: DateTime<Utc>,
}

impl AlignedRecord {
    /// Whether the observed outcome is the positive class.
    pub fn is_positive(&self) -> bool {
        self.target >= 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_positive_label() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let rec = AlignedRecord {
            series_id: "42".into(),
            target: 1.0,
            prediction: 0.7,
            timestamp: ts,
        };
        assert!(rec.is_positive());
        assert!(!AlignedRecord { target: 0.0, ..rec }.is_positive());
    }
}
