//! Sensor data command handlers.

use tabled::Tabled;
use tracing::info;

use aretas_core::AretasClient;
use aretas_core::models::{ChartImageQuery, Mac, SensorDataQuery, SensorDatum};

use crate::cli::{DataArgs, DataCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "MAC")]
    mac: Mac,
    #[tabled(rename = "Type")]
    sensor_type: i64,
    #[tabled(rename = "Value")]
    data: f64,
}

impl From<&SensorDatum> for ReadingRow {
    fn from(d: &SensorDatum) -> Self {
        Self {
            time: output::format_millis(d.timestamp),
            mac: d.mac,
            sensor_type: d.sensor_type,
            data: d.data,
        }
    }
}

pub async fn handle(client: &AretasClient, args: DataArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DataCommand::Range {
            mac,
            range,
            types,
            limit,
        } => {
            let (begin, end) = util::time_window(&range)?;
            let mut query = SensorDataQuery::new(Mac(mac), begin, end).with_types(types);
            if let Some(limit) = limit {
                query.limit = limit;
            }

            let readings = util::require(client.sensor_data_by_range(&query).await?, "sensor data")?;
            let out = output::render_list(
                &global.output,
                &readings,
                |d| ReadingRow::from(d),
                |d| format!("{}\t{}\t{}", d.timestamp, d.sensor_type, d.data),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DataCommand::Chart {
            mac,
            range,
            types,
            width,
            height,
            file,
        } => {
            let (begin, end) = util::time_window(&range)?;
            let mut query = ChartImageQuery::new(Mac(mac), begin, end).with_size(width, height);
            query.range.types = types;

            let png = util::require(client.chart_image(&query).await?, "chart image")?;
            tokio::fs::write(&file, &png).await?;
            info!(bytes = png.len(), path = %file.display(), "chart written");
            if !global.quiet {
                eprintln!("Chart written to {}", file.display());
            }
            Ok(())
        }

        DataCommand::Latest { macs } => {
            let macs: Vec<Mac> = macs.into_iter().map(Mac).collect();
            let latest = util::require(client.latest_sensor_data(&macs).await?, "latest sensor data")?;
            let out = output::render_single(
                &global.output,
                &latest,
                |v| serde_json::to_string_pretty(v).unwrap_or_default(),
                |v| v.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
