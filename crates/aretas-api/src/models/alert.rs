// Alert and alert-history entities
//
// Alerts are threshold rules attached to a sensor type; alert-history
// records are the events those rules produced. Optional alert fields are
// omitted from outbound payloads when unset.

use serde::{Deserialize, Serialize};

use super::common::{Mac, Payload};

// ── Alert ────────────────────────────────────────────────────────────

/// A threshold alert rule. `id` and `sensor_type` are required on decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub sensor_type: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Comma-separated MAC list, exactly as the API stores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_macs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_to_normal_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_b_end_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_b_start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_emails: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_trigger: Option<i64>,
    #[serde(
        rename = "alertSMSes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alert_smses: Option<String>,
    #[serde(
        rename = "alertTriggerTTL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alert_trigger_ttl: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_frequency: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_num_alerts: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_a: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_a_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_b: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_b_type: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_strategy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exceeded_command: Option<String>,
}

impl Alert {
    pub fn new(id: impl Into<String>, sensor_type: i64) -> Self {
        Self {
            id: id.into(),
            sensor_type,
            ..Self::default()
        }
    }

    /// MACs parsed out of [`sensor_macs`](Self::sensor_macs). Entries that
    /// are not integers are ignored.
    pub fn macs(&self) -> Vec<Mac> {
        self.sensor_macs
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse::<i64>().ok())
            .map(Mac)
            .collect()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }
}

impl Payload for Alert {}

// ── Alert history ────────────────────────────────────────────────────

/// One alert event. Every field except the monitor labels is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertHistoryRecord {
    pub event_id: i64,
    pub mac: Mac,
    /// Epoch milliseconds when the threshold was crossed.
    pub timestamp: i64,
    /// Epoch milliseconds when the reading returned to normal.
    pub rtn_timestamp: i64,
    pub sensor_type: i64,
    pub sensor_data: f64,
    pub alert_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_description: Option<String>,
    pub is_new: bool,
    pub is_dismissed: bool,
    pub is_resolved: bool,
}
