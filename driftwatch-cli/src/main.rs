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

//! Driftwatch CLI
//!
//! Pipeline entry point for model performance monitoring runs.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use driftwatch_core::{
    ColumnSpec, MonitorConfig, RunOutcome, DEFAULT_DATA_LIMIT, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_MONITOR_TABLE,
};
use driftwatch_monitor::PerformanceMonitor;
use driftwatch_query::{resolve_model_version, LocalWarehouse, TableRef};
use driftwatch_store::LocalTableStore;
use driftwatch_telemetry::{init_telemetry, OtelMonitoringSink};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "driftwatch")]
#[command(about = "Driftwatch - model performance monitoring", long_about = None)]
struct Cli {
    /// Data directory (local warehouse tables and the reporting table)
    #[arg(short, long, default_value = "./driftwatch-data")]
    data_dir: PathBuf,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    /// Output as JSON (machine-readable)
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one performance evaluation
    Run {
        /// Project ID
        #[arg(long)]
        project_id: String,

        /// Dataset holding the inference history table
        #[arg(long)]
        dataset_id: String,

        /// Inference history table ID
        #[arg(long)]
        table_id: String,

        /// Dataset holding the ground-truth table
        #[arg(long)]
        ground_truth_dataset: String,

        /// Ground-truth table ID
        #[arg(long)]
        ground_truth_table: String,

        /// Model name
        #[arg(long)]
        model_name: String,

        /// Model version (resolved from the inference table when omitted)
        #[arg(long)]
        model_version: Option<String>,

        /// Row cap for inference-history fetches
        #[arg(long, default_value_t = DEFAULT_DATA_LIMIT)]
        data_limit: usize,

        /// Lookback window in days
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS)]
        lookback_days: i64,

        /// Monitoring backend location
        #[arg(long, default_value = "europe-west4")]
        location: String,

        /// Warehouse location
        #[arg(long, default_value = "europe-west4")]
        warehouse_location: String,

        /// Pipeline job name attached to monitoring points
        #[arg(long)]
        pipeline_job_name: String,

        /// Target variable column
        #[arg(long, default_value = "target_binary")]
        target_column: String,

        /// Series key column
        #[arg(long, default_value = "user_id")]
        series_id_column: String,

        /// Prediction timestamp column
        #[arg(long, default_value = "prediction_timestamp")]
        timestamp_column: String,

        /// Predicted value column
        #[arg(long, default_value = "prediction_value")]
        prediction_column: String,

        /// Path the HTML report artifact is written to
        #[arg(long, default_value = "./report.html")]
        report: PathBuf,

        /// OTLP endpoint for the monitoring backend (no-op when omitted)
        #[arg(long)]
        otlp_endpoint: Option<String>,
    },

    /// Resolve the model version the way a run would
    ResolveVersion {
        #[arg(long)]
        project_id: String,

        #[arg(long)]
        dataset_id: String,

        #[arg(long)]
        table_id: String,
    },

    /// Show rows of the local reporting table
    ShowTable {
        /// Filter by model name
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Run {
            project_id,
            dataset_id,
            table_id,
            ground_truth_dataset,
            ground_truth_table,
            model_name,
            model_version,
            data_limit,
            lookback_days,
            location,
            warehouse_location,
            pipeline_job_name,
            target_column,
            series_id_column,
            timestamp_column,
            prediction_column,
            report,
            otlp_endpoint,
        } => {
            let config = MonitorConfig {
                project_id,
                dataset_id,
                table_id,
                ground_truth_dataset,
                ground_truth_table,
                monitor_table: DEFAULT_MONITOR_TABLE.to_string(),
                data_limit,
                lookback_days,
                model_name,
                model_version,
                location,
                warehouse_location,
                pipeline_job_name,
                columns: ColumnSpec {
                    target: target_column,
                    series_id: series_id_column,
                    timestamp: timestamp_column,
                    prediction: prediction_column,
                },
                report_path: report,
            };

            let warehouse = LocalWarehouse::load_dir(cli.data_dir.join("tables"))
                .context("Failed to load local warehouse tables")?;
            let table_store =
                LocalTableStore::open(cli.data_dir.join("monitor"), &config.monitor_table)
                    .context("Failed to open reporting table")?;

            let telemetry = init_telemetry("driftwatch", otlp_endpoint.as_deref())
                .context("Failed to initialize telemetry")?;
            let monitoring = OtelMonitoringSink::new(telemetry.meter.clone());

            let monitor = PerformanceMonitor::new(&warehouse, &table_store, &monitoring);
            let outcome = monitor
                .run(&config, Utc::now())
                .context("Performance monitoring run failed")?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                match &outcome {
                    RunOutcome::Completed {
                        run_id,
                        metrics,
                        report_path,
                    } => {
                        println!("✓ Run {} completed", run_id);
                        for (name, value) in metrics.iter() {
                            println!("  {}: {:.6}", name, value);
                        }
                        println!("  Report: {}", report_path.display());
                    }
                    RunOutcome::Skipped { run_id, reason } => {
                        println!("✓ Run {} skipped: {}", run_id, reason);
                    }
                }
            }

            telemetry.shutdown().context("Failed to flush telemetry")?;
        }

        Commands::ResolveVersion {
            project_id,
            dataset_id,
            table_id,
        } => {
            let warehouse = LocalWarehouse::load_dir(cli.data_dir.join("tables"))
                .context("Failed to load local warehouse tables")?;
            let table = TableRef::new(project_id, dataset_id, table_id)?;
            let version = resolve_model_version(&warehouse, &table, None)?;

            if cli.json {
                println!("{}", serde_json::json!({ "model_version": version.as_str() }));
            } else {
                println!("{}", version);
            }
        }

        Commands::ShowTable { model } => {
            let store = LocalTableStore::open(cli.data_dir.join("monitor"), DEFAULT_MONITOR_TABLE)
                .context("Failed to open reporting table")?;
            let rows = match &model {
                Some(name) => store.rows_for_model(name)?,
                None => store.load_all()?,
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No metrics rows recorded.");
            } else {
                println!("Metrics rows ({}):", rows.len());
                for row in &rows {
                    println!(
                        "  {} {} v{} @ {}",
                        row.run_id, row.model_name, row.model_version, row.timestamp
                    );
                    for (name, value) in row.metrics.iter() {
                        println!("    {}: {:.6}", name, value);
                    }
                }
            }
        }
    }

    Ok(())
}
