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

//! Error types shared across the workspace.
//!
//! There is no local recovery anywhere in the evaluation path: failures
//! propagate to the caller, which marks the run failed. The only conditions
//! handled in place are the empty-dataset skip cases, which are not errors.

use thiserror::Error;

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, DriftwatchError>;

/// Errors produced by the monitoring engine
#[derive(Debug, Error)]
pub enum DriftwatchError {
    /// Warehouse query execution failed
    #[error("query failed: {0}")]
    Query(String),

    /// A query that must yield rows came back empty (e.g. version resolution)
    #[error("query returned no rows: {0}")]
    EmptyResult(String),

    /// A required column is missing from a dataset
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A column value could not be coerced to the required type
    #[error("type mismatch in column '{column}': expected {expected}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
    },

    /// An identifier failed validation before query rendering
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Report generation failed
    #[error("report generation failed: {0}")]
    Report(String),

    /// A sink write failed
    #[error("sink write failed: {0}")]
    Sink(String),

    /// Configuration is invalid or incomplete
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
