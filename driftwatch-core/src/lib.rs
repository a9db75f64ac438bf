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

//! Driftwatch Core
//!
//! Fundamental data structures and types for model performance monitoring runs.

pub mod config;
pub mod dataset;
pub mod error;
pub mod metric_set;
pub mod outcome;
pub mod record;
pub mod value;
pub mod version;

pub use config::{
    ColumnSpec, MonitorConfig, DEFAULT_DATA_LIMIT, DEFAULT_LOOKBACK_DAYS, DEFAULT_MONITOR_TABLE,
    METRIC_PREFIX,
};
pub use dataset::Dataset;
pub use error::{DriftwatchError, Result};
pub use metric_set::MetricSet;
pub use outcome::{RunOutcome, SkipReason};
pub use record::{AlignedRecord, GroundTruthRecord, InferenceRecord};
pub use value::Value;
pub use version::ModelVersion;
