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

//! Driftwatch telemetry (monitoring-backend metrics).

pub mod monitoring;

use opentelemetry::metrics::{Meter, MeterProvider};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;

pub use monitoring::{MetricLabels, MonitoringSink, OtelMonitoringSink};

/// Handle over the metrics pipeline. Dropping it without [`Telemetry::shutdown`]
/// may lose the final export batch.
pub struct Telemetry {
    pub meter: Meter,
    provider: SdkMeterProvider,
}

impl Telemetry {
    /// Flush and shut down the exporter.
    pub fn shutdown(self) -> anyhow::Result<()> {
        self.provider.shutdown()?;
        Ok(())
    }
}

/// Initialize the metrics pipeline.
///
/// With an OTLP endpoint, points are batch-exported over gRPC (this is the
/// only place in the workspace that needs a tokio runtime). Without one, a
/// no-op meter provider is used, which keeps local runs dependency-free.
pub fn init_telemetry(service_name: &str, otlp_endpoint: Option<&str>) -> anyhow::Result<Telemetry> {
    let provider = if let Some(endpoint) = otlp_endpoint {
        opentelemetry_otlp::new_pipeline()
            .metrics(opentelemetry_sdk::runtime::Tokio)
            .with_exporter(
                opentelemetry_otlp::new_exporter()
                    .tonic()
                    .with_endpoint(endpoint),
            )
            .build()?
    } else {
        SdkMeterProvider::default()
    };

    let meter = provider.meter(service_name.to_string());
    Ok(Telemetry { meter, provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_without_endpoint_is_noop_provider() {
        let telemetry = init_telemetry("driftwatch", None).unwrap();
        telemetry.shutdown().unwrap();
    }
}
