// Location, sensor, and building-map entities
//
// The client location view is a strict tree: one view owns its location
// sensor views, each of which owns a location, its building maps and its
// sensors. Every field carries the API's default when absent, so a sparse
// payload still decodes.

use serde::{Deserialize, Serialize};

use super::common::{Mac, Payload, lenient_string};

/// Sentinel the API uses for "no sensor has ever reported here".
pub const NEVER_REPORTED: i64 = -1;

// ── Leaf records ─────────────────────────────────────────────────────

/// Last-known device status block embedded in a [`Sensor`].
///
/// The API prefixes these keys with an underscore and is loose about their
/// types, so every field is kept as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "_mac", default, deserialize_with = "lenient_string")]
    pub mac: String,
    #[serde(rename = "_status", default, deserialize_with = "lenient_string")]
    pub status: String,
    #[serde(rename = "_timestamp", default, deserialize_with = "lenient_string")]
    pub timestamp: String,
    #[serde(rename = "_type", default, deserialize_with = "lenient_string")]
    pub kind: String,
}

/// Occupancy hints for the area a sensor monitors. `-1` means "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaUsageHints {
    pub ceiling_height: f64,
    pub floor_area: f64,
    pub has_opening_windows: i64,
    pub has_people: i64,
    pub occupant_count_hint: i64,
}

impl Default for AreaUsageHints {
    fn default() -> Self {
        Self {
            ceiling_height: -1.0,
            floor_area: -1.0,
            has_opening_windows: -1,
            has_people: -1,
            occupant_count_hint: -1,
        }
    }
}

// ── Sensor ───────────────────────────────────────────────────────────

/// A physical sensor (device) registered to a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sensor {
    pub area_type: i64,
    pub area_usage_hints: AreaUsageHints,
    pub building_map_id: Option<String>,
    pub description: String,
    pub down_interval: i64,
    pub id: String,
    pub img_map_x: f64,
    pub img_map_y: f64,
    pub is_shared: bool,
    pub is_shared_public: bool,
    /// Epoch milliseconds of the last report, `0` if unknown.
    pub last_report_time: i64,
    pub lat: f64,
    pub lon: f64,
    pub mac: Mac,
    pub notify_if_down: bool,
    pub owner: String,
    pub owner_client_id: String,
    pub status: Status,
}

// ── Location ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub description: String,
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub owner: String,
    pub state: String,
    pub street_address: String,
    pub zip_code: String,
}

// ── Building map ─────────────────────────────────────────────────────

/// A floor plan image attached to a location, with its physical
/// dimensions and placement offsets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildingMap {
    pub actual_depth: f64,
    pub actual_height: f64,
    pub actual_width: f64,
    pub computed_height: f64,
    pub computed_width: f64,
    pub description: String,
    pub id: String,
    pub mime_type: String,
    pub name: String,
    pub offset_x: f64,
    pub offset_y: f64,
    pub offset_z: f64,
    pub owner: String,
    pub owner_client_id: String,
}

impl Payload for BuildingMap {}

// ── Composite views ──────────────────────────────────────────────────

/// One location together with its building maps and sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationSensorView {
    pub building_map_list: Vec<BuildingMap>,
    /// Epoch milliseconds, or [`NEVER_REPORTED`].
    pub last_sensor_report_time: i64,
    pub location: Location,
    pub sensor_list: Vec<Sensor>,
}

impl Default for LocationSensorView {
    fn default() -> Self {
        Self {
            building_map_list: Vec::new(),
            last_sensor_report_time: NEVER_REPORTED,
            location: Location::default(),
            sensor_list: Vec::new(),
        }
    }
}

impl LocationSensorView {
    /// Whether any sensor at this location has ever reported.
    pub fn is_active(&self) -> bool {
        self.last_sensor_report_time != NEVER_REPORTED
    }
}

/// The whole tenant tree from `client/locationview`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientLocationView {
    pub all_macs: Vec<Mac>,
    pub id: String,
    pub location_sensor_views: Vec<LocationSensorView>,
}

impl ClientLocationView {
    /// Iterate over every sensor in every location, in view order.
    pub fn sensors(&self) -> impl Iterator<Item = &Sensor> {
        self.location_sensor_views
            .iter()
            .flat_map(|lsv| lsv.sensor_list.iter())
    }
}
