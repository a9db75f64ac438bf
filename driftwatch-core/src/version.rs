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

use crate::error::{DriftwatchError, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolved model version tag.
///
/// Either supplied explicitly by the caller or resolved from the maximum
/// version recorded in the inference table. Valid for one run only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelVersion(String);

impl ModelVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// Cast a warehouse value to a version string, the way the warehouse
    /// itself would. Nulls are a data error: they mean the inference table
    /// has no recorded version to resolve.
    pub fn from_value(value: &Value) -> Result<Self> {
        value
            .canonical_string()
            .map(Self)
            .ok_or_else(|| DriftwatchError::EmptyResult("model_version is NULL".to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
