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

//! Metrics table sink.
//!
//! The local implementation is an append-only log with a magic/version
//! header and CRC-framed JSON entries. Each append is one run's metrics
//! row; repeated runs append repeated rows — there is no deduplication,
//! matching the warehouse table the format stands in for.

use chrono::{DateTime, Utc};
use driftwatch_core::{MetricSet, Result};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TABLE_STORE_MAGIC: &[u8; 4] = b"DWMT";
const TABLE_STORE_VERSION: u32 = 1;

/// One appended reporting-table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub run_id: Uuid,
    pub model_name: String,
    pub model_version: String,
    pub timestamp: DateTime<Utc>,
    pub metrics: MetricSet,
}

/// Appends metrics rows to the reporting table.
///
/// Fire-and-forget: a successful return means the row was handed to the
/// backing table; there is no confirmation loop and no rollback.
pub trait MetricsTableSink {
    fn append(&self, row: &MetricsRow) -> Result<()>;
}

/// File-backed reporting table.
pub struct LocalTableStore {
    log_path: PathBuf,
}

impl LocalTableStore {
    /// Open or create the table log under `data_dir`.
    pub fn open(data_dir: impl AsRef<Path>, table_name: &str) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let log_path = data_dir.join(format!("{}.log", table_name));
        if !log_path.exists() {
            let mut file = File::create(&log_path)?;
            file.write_all(TABLE_STORE_MAGIC)?;
            file.write_all(&TABLE_STORE_VERSION.to_le_bytes())?;
            file.flush()?;
        }

        Ok(Self { log_path })
    }

    /// Read back every row in append order. Entries that fail their CRC
    /// are skipped with a warning, not treated as fatal.
    pub fn load_all(&self) -> Result<Vec<MetricsRow>> {
        let mut rows = Vec::new();

        let file = File::open(&self.log_path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        if reader.read_exact(&mut magic).is_err() {
            return Ok(rows); // empty file
        }
        if &magic != TABLE_STORE_MAGIC {
            tracing::warn!("invalid table store magic, treating as empty");
            return Ok(rows);
        }

        let mut version_bytes = [0u8; 4];
        reader.read_exact(&mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != TABLE_STORE_VERSION {
            tracing::warn!(
                "table store version mismatch ({} vs {}), treating as empty",
                version,
                TABLE_STORE_VERSION
            );
            return Ok(rows);
        }

        loop {
            let mut len_bytes = [0u8; 4];
            if reader.read_exact(&mut len_bytes).is_err() {
                break; // EOF
            }
            let len = u32::from_le_bytes(len_bytes) as usize;

            let mut data = vec![0u8; len];
            if reader.read_exact(&mut data).is_err() {
                break;
            }

            let mut crc_bytes = [0u8; 4];
            if reader.read_exact(&mut crc_bytes).is_err() {
                break;
            }
            let stored_crc = u32::from_le_bytes(crc_bytes);
            if stored_crc != crc32fast::hash(&data) {
                tracing::warn!("CRC mismatch in table store, skipping row");
                continue;
            }

            match serde_json::from_slice::<MetricsRow>(&data) {
                Ok(row) => rows.push(row),
                Err(e) => tracing::warn!("undecodable table store row: {}", e),
            }
        }

        Ok(rows)
    }

    /// Rows for one model, newest first.
    pub fn rows_for_model(&self, model_name: &str) -> Result<Vec<MetricsRow>> {
        let mut rows: Vec<MetricsRow> = self
            .load_all()?
            .into_iter()
            .filter(|r| r.model_name == model_name)
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(rows)
    }
}

impl MetricsTableSink for LocalTableStore {
    fn append(&self, row: &MetricsRow) -> Result<()> {
        let file = OpenOptions::new().append(true).open(&self.log_path)?;
        let mut writer = BufWriter::new(file);

        let data = serde_json::to_vec(row)?;
        let crc = crc32fast::hash(&data);

        writer.write_all(&(data.len() as u32).to_le_bytes())?;
        writer.write_all(&data)?;
        writer.write_all(&crc.to_le_bytes())?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(model: &str, day: u32, accuracy: f64) -> MetricsRow {
        let mut metrics = MetricSet::new();
        metrics.insert("accuracy", accuracy);
        metrics.insert("recall", 0.8);
        MetricsRow {
            run_id: Uuid::new_v4(),
            model_name: model.to_string(),
            model_version: "3".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            metrics,
        }
    }

    #[test]
    fn test_append_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalTableStore::open(dir.path(), "monitor_performance").unwrap();

        let first = row("churn_model", 1, 0.9);
        let second = row("churn_model", 2, 0.85);
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        let rows = store.load_all().unwrap();
        assert_eq!(rows, vec![first, second]);
    }

    #[test]
    fn test_repeated_appends_are_not_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalTableStore::open(dir.path(), "monitor_performance").unwrap();

        let same = row("churn_model", 1, 0.9);
        store.append(&same).unwrap();
        store.append(&same).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_rows_for_model_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalTableStore::open(dir.path(), "monitor_performance").unwrap();

        store.append(&row("churn_model", 1, 0.9)).unwrap();
        store.append(&row("other_model", 2, 0.5)).unwrap();
        store.append(&row("churn_model", 3, 0.8)).unwrap();

        let rows = store.rows_for_model("churn_model").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].timestamp > rows[1].timestamp);
    }

    #[test]
    fn test_truncated_tail_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalTableStore::open(dir.path(), "monitor_performance").unwrap();
        store.append(&row("churn_model", 1, 0.9)).unwrap();

        // chop a few bytes off the end to simulate a torn write
        let path = dir.path().join("monitor_performance.log");
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

        // the torn frame is unreadable; loading must not error
        let rows = store.load_all().unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_reopen_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LocalTableStore::open(dir.path(), "monitor_performance").unwrap();
            store.append(&row("churn_model", 1, 0.9)).unwrap();
        }
        let store = LocalTableStore::open(dir.path(), "monitor_performance").unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }
}
