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

//! HTML rendering of the performance report artifact.

use crate::report::{extract_metrics, PerformanceReport};
use driftwatch_core::Result;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Render the report as a standalone HTML document.
pub fn render_html(report: &PerformanceReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>Model Performance Report</title>\n");
    html.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2em; }\n\
         table { border-collapse: collapse; margin: 1em 0; }\n\
         th, td { border: 1px solid #ccc; padding: 0.4em 0.8em; text-align: right; }\n\
         th { background: #f0f0f0; }\n\
         </style>\n",
    );
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(html, "<h1>Model Performance Report</h1>");
    let _ = writeln!(
        html,
        "<p>Generated at {} over {} datapoints (threshold {:.2}).</p>",
        report.generated_at.to_rfc3339(),
        report.sample_count,
        report.threshold
    );

    html.push_str("<h2>Metrics</h2>\n<table>\n<tr><th>Metric</th><th>Value</th></tr>\n");
    for (name, value) in extract_metrics(report).iter() {
        let _ = writeln!(html, "<tr><td>{}</td><td>{:.6}</td></tr>", name, value);
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Confusion Matrix</h2>\n<table>\n");
    html.push_str("<tr><th></th><th>Predicted positive</th><th>Predicted negative</th></tr>\n");
    let _ = writeln!(
        html,
        "<tr><th>Actual positive</th><td>{}</td><td>{}</td></tr>",
        report.confusion.true_positives, report.confusion.false_negatives
    );
    let _ = writeln!(
        html,
        "<tr><th>Actual negative</th><td>{}</td><td>{}</td></tr>",
        report.confusion.false_positives, report.confusion.true_negatives
    );
    html.push_str("</table>\n");

    html.push_str("</body>\n</html>\n");
    html
}

/// Write the rendered report to `path`, creating parent directories.
pub fn save_html(report: &PerformanceReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_html(report))?;
    info!(path = %path.display(), "saved report artifact");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{generate_report, REPORT_METRIC_NAMES};
    use chrono::{TimeZone, Utc};
    use driftwatch_core::AlignedRecord;

    fn report() -> PerformanceReport {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let records = vec![
            AlignedRecord {
                series_id: "1".into(),
                target: 1.0,
                prediction: 0.9,
                timestamp: ts,
            },
            AlignedRecord {
                series_id: "2".into(),
                target: 0.0,
                prediction: 0.2,
                timestamp: ts,
            },
        ];
        generate_report(&records, ts).unwrap()
    }

    #[test]
    fn test_html_contains_every_metric() {
        let html = render_html(&report());
        assert!(html.starts_with("<!DOCTYPE html>"));
        for name in REPORT_METRIC_NAMES {
            assert!(html.contains(name), "missing metric {}", name);
        }
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts").join("report.html");
        save_html(&report(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Confusion Matrix"));
    }
}
