//! Location and sensor command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use aretas_core::models::{Location, LocationSensorView, Mac, Sensor, now_millis};
use aretas_core::{AretasClient, LocationDirectory};

use crate::cli::{GlobalOpts, LocationsArgs, LocationsCommand};
use crate::error::CliError;
use crate::output;

const HOUR_MS: i64 = 60 * 60 * 1000;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Country")]
    country: String,
}

impl From<&Location> for LocationRow {
    fn from(l: &Location) -> Self {
        Self {
            id: l.id.clone(),
            description: l.description.clone(),
            city: l.city.clone(),
            country: l.country.clone(),
        }
    }
}

#[derive(Tabled)]
struct ActiveRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Sensors")]
    sensors: usize,
    #[tabled(rename = "Maps")]
    maps: usize,
    #[tabled(rename = "Last Report")]
    last_report: String,
}

impl From<&LocationSensorView> for ActiveRow {
    fn from(v: &LocationSensorView) -> Self {
        Self {
            id: v.location.id.clone(),
            description: v.location.description.clone(),
            sensors: v.sensor_list.len(),
            maps: v.building_map_list.len(),
            last_report: output::format_millis(v.last_sensor_report_time),
        }
    }
}

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "MAC")]
    mac: Mac,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Last Report")]
    last_report: String,
}

impl From<&Sensor> for SensorRow {
    fn from(s: &Sensor) -> Self {
        Self {
            mac: s.mac,
            id: s.id.clone(),
            description: s.description.clone(),
            last_report: output::format_millis(s.last_report_time),
        }
    }
}

fn sensor_detail(s: &Sensor) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "MAC:          {}", s.mac);
    let _ = writeln!(out, "ID:           {}", s.id);
    let _ = writeln!(out, "Description:  {}", s.description);
    let _ = writeln!(out, "Owner:        {}", s.owner);
    let _ = writeln!(out, "Coordinates:  {}, {}", s.lat, s.lon);
    if let Some(ref map_id) = s.building_map_id {
        let _ = writeln!(out, "Building map: {map_id} ({}, {})", s.img_map_x, s.img_map_y);
    }
    let _ = writeln!(out, "Status:       {}", s.status.status);
    let _ = write!(out, "Last report:  {}", output::format_millis(s.last_report_time));
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &AretasClient,
    args: LocationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let directory = LocationDirectory::new(client.clone());
    if args.refresh {
        directory.refresh(true).await?;
    }

    match args.command {
        LocationsCommand::List => {
            let locations = directory.locations().await?;
            let out = output::render_list(
                &global.output,
                &locations,
                |l| LocationRow::from(l),
                |l| l.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LocationsCommand::Active => {
            let active = directory.active_locations().await?;
            let out = output::render_list(
                &global.output,
                &active,
                |v| ActiveRow::from(v),
                |v| v.location.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LocationsCommand::Sensors {
            location,
            active_within,
        } => {
            let mut sensors = match location {
                Some(id) => {
                    directory
                        .location_by_id(&id)
                        .await?
                        .ok_or_else(|| CliError::NotFound {
                            resource_type: "location".into(),
                            identifier: id,
                            list_command: "locations list".into(),
                        })?
                        .sensor_list
                }
                None => directory.view().await?.sensors().cloned().collect(),
            };

            if let Some(hours) = active_within {
                let active: Vec<Mac> = directory
                    .active_devices(i64::from(hours) * HOUR_MS, now_millis())
                    .await?
                    .iter()
                    .map(|s| s.mac)
                    .collect();
                sensors.retain(|s| active.contains(&s.mac));
            }

            let out = output::render_list(
                &global.output,
                &sensors,
                |s| SensorRow::from(s),
                |s| s.mac.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LocationsCommand::Sensor { mac } => {
            let sensor = directory
                .sensor_by_mac(Mac(mac))
                .await?
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "sensor".into(),
                    identifier: mac.to_string(),
                    list_command: "locations sensors".into(),
                })?;
            let out = output::render_single(&global.output, &sensor, sensor_detail, |s| {
                s.mac.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
