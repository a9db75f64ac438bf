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

//! Driftwatch Report Engine
//!
//! Turns an aligned prediction/outcome dataset into a structured
//! performance report: confusion matrix, classification metrics, ROC-AUC,
//! and a distribution summary, plus an HTML rendering of the whole thing.

pub mod analyzer;
pub mod html;
pub mod report;

pub use analyzer::{ClassificationMetrics, ConfusionMatrix, roc_auc};
pub use html::{render_html, save_html};
pub use report::{
    extract_metrics, generate_report, PerformanceReport, DEFAULT_THRESHOLD, REPORT_METRIC_NAMES,
};
