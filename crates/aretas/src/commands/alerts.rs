//! Alert command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use aretas_core::models::{Alert, Mac};
use aretas_core::{AretasClient, EnrichedAlertHistory, LocationDirectory, fetch_enriched_alert_history};

use crate::cli::{AlertsArgs, AlertsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    sensor_type: i64,
    #[tabled(rename = "Sensors")]
    sensors: String,
    #[tabled(rename = "Disabled")]
    disabled: String,
}

impl From<&Alert> for AlertRow {
    fn from(a: &Alert) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone().unwrap_or_default(),
            sensor_type: a.sensor_type,
            sensors: util::join(&a.macs()),
            disabled: output::yes_no(a.is_disabled()),
        }
    }
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Event")]
    event_id: i64,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Sensor")]
    sensor: String,
    #[tabled(rename = "MAC")]
    mac: Mac,
    #[tabled(rename = "Type")]
    sensor_type: i64,
    #[tabled(rename = "Value")]
    value: f64,
    #[tabled(rename = "Resolved")]
    resolved: String,
    #[tabled(rename = "Dismissed")]
    dismissed: String,
}

impl From<&EnrichedAlertHistory> for HistoryRow {
    fn from(e: &EnrichedAlertHistory) -> Self {
        Self {
            event_id: e.record.event_id,
            time: output::format_millis(e.record.timestamp),
            sensor: e.sensor.description.clone(),
            mac: e.record.mac,
            sensor_type: e.record.sensor_type,
            value: e.record.sensor_data,
            resolved: output::yes_no(e.record.is_resolved),
            dismissed: output::yes_no(e.record.is_dismissed),
        }
    }
}

fn detail(a: &Alert) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", a.id);
    let _ = writeln!(out, "Name:        {}", a.name.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Description: {}", a.description.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Sensor type: {}", a.sensor_type);
    let _ = writeln!(out, "Sensors:     {}", util::join(&a.macs()));
    if let Some(threshold) = a.threshold_a {
        let _ = writeln!(out, "Threshold A: {threshold}");
    }
    if let Some(threshold) = a.threshold_b {
        let _ = writeln!(out, "Threshold B: {threshold}");
    }
    let _ = write!(out, "Disabled:    {}", output::yes_no(a.is_disabled()));
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &AretasClient,
    args: AlertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AlertsCommand::List => {
            let alerts = util::require(client.list_alerts().await?, "alert list")?;
            let out = output::render_list(&global.output, &alerts, |a| AlertRow::from(a), |a| a.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Get { id } => {
            let alert = client
                .find_alert(&id)
                .await?
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "alert".into(),
                    identifier: id,
                    list_command: "alerts list".into(),
                })?;
            let out = output::render_single(&global.output, &alert, detail, |a| a.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::History { ids, show_dismissed } => {
            let ids = if ids.is_empty() {
                util::require(client.list_alerts().await?, "alert list")?
                    .into_iter()
                    .map(|a| a.id)
                    .collect()
            } else {
                ids
            };

            let directory = LocationDirectory::new(client.clone());
            let view = directory.view().await?;
            let history = fetch_enriched_alert_history(client, &ids, &view, show_dismissed).await?;

            let out = output::render_list(&global.output, &history, |e| HistoryRow::from(e), |e| {
                e.record.event_id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AlertsCommand::Dismiss {
            mac,
            sensor_type,
            alert_id,
        } => {
            let dismissed = client
                .dismiss_alert_history_object(Mac(mac), sensor_type, &alert_id)
                .await?;
            if !dismissed {
                return Err(CliError::ApiError {
                    message: format!("the API refused to dismiss alert {alert_id} for sensor {mac}"),
                });
            }
            if !global.quiet {
                eprintln!("Alert event dismissed");
            }
            Ok(())
        }
    }
}
