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

//! Model-version resolution.

use crate::client::{TableRef, WarehouseClient, WarehouseQuery, MODEL_VERSION_COLUMN};
use driftwatch_core::{DriftwatchError, ModelVersion, Result};
use tracing::info;

/// Resolve the model version for a run.
///
/// An explicit, non-empty version is taken as-is and the warehouse is never
/// queried. Otherwise the maximum version recorded in the inference table
/// is used; an empty result means there is no history to evaluate against
/// and is propagated as a data error.
pub fn resolve_model_version(
    client: &dyn WarehouseClient,
    table: &TableRef,
    explicit: Option<&str>,
) -> Result<ModelVersion> {
    if let Some(version) = explicit.filter(|v| !v.is_empty()) {
        return Ok(ModelVersion::new(version));
    }

    let result = client.execute(&WarehouseQuery::MaxVersion {
        table: table.clone(),
    })?;
    if result.is_empty() {
        return Err(DriftwatchError::EmptyResult(format!(
            "no recorded {} in {}",
            MODEL_VERSION_COLUMN,
            table.qualified_name()
        )));
    }

    let version = ModelVersion::from_value(result.value(0, MODEL_VERSION_COLUMN)?)?;
    info!(model_version = %version, table = %table, "resolved model version from inference history");
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_core::{Dataset, Value};
    use std::cell::RefCell;

    /// Client double that records every executed query.
    struct Recording {
        queries: RefCell<Vec<WarehouseQuery>>,
        response: Dataset,
    }

    impl Recording {
        fn new(response: Dataset) -> Self {
            Self {
                queries: RefCell::new(Vec::new()),
                response,
            }
        }
    }

    impl WarehouseClient for Recording {
        fn execute(&self, query: &WarehouseQuery) -> Result<Dataset> {
            self.queries.borrow_mut().push(query.clone());
            Ok(self.response.clone())
        }
    }

    fn table() -> TableRef {
        TableRef::new("acme", "churn", "inference_data_history").unwrap()
    }

    #[test]
    fn test_explicit_version_never_queries() {
        let client = Recording::new(Dataset::new(vec![MODEL_VERSION_COLUMN]));
        let version = resolve_model_version(&client, &table(), Some("7")).unwrap();
        assert_eq!(version.as_str(), "7");
        assert!(client.queries.borrow().is_empty());
    }

    #[test]
    fn test_empty_explicit_version_falls_back_to_max() {
        let mut response = Dataset::new(vec![MODEL_VERSION_COLUMN]);
        response.push_row(vec![Value::Int(4)]).unwrap();
        let client = Recording::new(response);

        let version = resolve_model_version(&client, &table(), Some("")).unwrap();
        assert_eq!(version.as_str(), "4");
        assert_eq!(client.queries.borrow().len(), 1);
        assert!(matches!(
            client.queries.borrow()[0],
            WarehouseQuery::MaxVersion { .. }
        ));
    }

    #[test]
    fn test_no_rows_is_data_error() {
        let client = Recording::new(Dataset::new(vec![MODEL_VERSION_COLUMN]));
        let err = resolve_model_version(&client, &table(), None).unwrap_err();
        assert!(matches!(err, DriftwatchError::EmptyResult(_)));
    }
}
