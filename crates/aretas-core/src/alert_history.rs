// ── Alert history enrichment ──
//
// Joins alert events with the sensor that raised them and precomputes what
// a UI needs to drill into an event: an analytics window around it and the
// parameters for dismissing it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use aretas_api::AretasClient;
use aretas_api::models::{AlertHistoryRecord, ClientLocationView, Mac, Sensor};

use crate::error::CoreError;

/// Half-width of the analytics window around an alert event: 30 minutes.
pub const ANALYTICS_HALF_WINDOW_MS: i64 = 30 * 60 * 1000;

/// Arguments for `dismiss_alert_history_object`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DismissParams {
    pub mac: Mac,
    pub sensor_type: i64,
    pub alert_id: String,
}

/// An alert event joined with its sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedAlertHistory {
    pub record: AlertHistoryRecord,
    pub sensor: Sensor,
    pub analytics_start_time: i64,
    pub analytics_end_time: i64,
    pub dismiss: DismissParams,
}

impl EnrichedAlertHistory {
    fn new(record: AlertHistoryRecord, sensor: Sensor) -> Self {
        let dismiss = DismissParams {
            mac: record.mac,
            sensor_type: record.sensor_type,
            alert_id: record.alert_id.clone(),
        };
        Self {
            analytics_start_time: record.timestamp - ANALYTICS_HALF_WINDOW_MS,
            analytics_end_time: record.timestamp + ANALYTICS_HALF_WINDOW_MS,
            record,
            sensor,
            dismiss,
        }
    }
}

/// Join records with the sensors in `view`. Records whose MAC is not in
/// the view are dropped; the rest keep their order.
pub fn enrich_alert_history(
    records: Vec<AlertHistoryRecord>,
    view: &ClientLocationView,
) -> Vec<EnrichedAlertHistory> {
    let sensors: HashMap<Mac, &Sensor> = view.sensors().map(|s| (s.mac, s)).collect();

    records
        .into_iter()
        .filter_map(|record| match sensors.get(&record.mac) {
            Some(sensor) => Some(EnrichedAlertHistory::new(record, (*sensor).clone())),
            None => {
                debug!(mac = %record.mac, event_id = record.event_id, "sensor not in client location view");
                None
            }
        })
        .collect()
}

/// Fetch alert history for `alert_ids` and enrich it against `view`.
/// A failed fetch yields an empty list.
pub async fn fetch_enriched_alert_history(
    client: &AretasClient,
    alert_ids: &[String],
    view: &ClientLocationView,
    show_dismissed: bool,
) -> Result<Vec<EnrichedAlertHistory>, CoreError> {
    let records = client
        .list_alert_history(alert_ids, show_dismissed)
        .await?
        .unwrap_or_default();
    Ok(enrich_alert_history(records, view))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aretas_api::models::LocationSensorView;

    fn record(event_id: i64, mac: i64) -> AlertHistoryRecord {
        AlertHistoryRecord {
            event_id,
            mac: Mac(mac),
            timestamp: 10_000_000,
            rtn_timestamp: 10_500_000,
            sensor_type: 248,
            sensor_data: 31.5,
            alert_id: "al-1".into(),
            monitor_location: None,
            monitor_description: None,
            is_new: true,
            is_dismissed: false,
            is_resolved: false,
        }
    }

    #[test]
    fn enrichment_joins_by_mac_and_drops_unknown_sensors() {
        let view = ClientLocationView {
            location_sensor_views: vec![LocationSensorView {
                sensor_list: vec![Sensor {
                    mac: Mac(1001),
                    description: "Kitchen".into(),
                    ..Sensor::default()
                }],
                ..LocationSensorView::default()
            }],
            ..ClientLocationView::default()
        };

        let enriched = enrich_alert_history(vec![record(1, 1001), record(2, 4242)], &view);

        assert_eq!(enriched.len(), 1);
        let first = &enriched[0];
        assert_eq!(first.sensor.description, "Kitchen");
        assert_eq!(first.analytics_start_time, 10_000_000 - 1_800_000);
        assert_eq!(first.analytics_end_time, 10_000_000 + 1_800_000);
        assert_eq!(
            first.dismiss,
            DismissParams {
                mac: Mac(1001),
                sensor_type: 248,
                alert_id: "al-1".into()
            }
        );
    }
}
