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

//! Driftwatch Query Layer
//!
//! Typed warehouse reads and the evaluation's data-preparation steps:
//! model-version resolution, inference-history fetching, and ground-truth
//! alignment. Everything here is synchronous and blocking.

pub mod align;
pub mod client;
pub mod fetcher;
pub mod local;
pub mod resolver;
pub mod sql;

pub use align::{align_predictions, ground_truth_records, inference_records};
pub use client::{TableRef, WarehouseClient, WarehouseQuery, MODEL_VERSION_COLUMN};
pub use fetcher::fetch_inference_history;
pub use local::LocalWarehouse;
pub use resolver::resolve_model_version;
pub use sql::render_sql;
