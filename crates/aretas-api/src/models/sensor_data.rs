// Sensor readings and the query builders for retrieving them
//
// `SensorDataQuery` and `ChartImageQuery` carry the server-side filtering
// knobs (downsampling, moving average, IQR filtering, interpolation). A
// knob group is only put on the wire when it is enabled, so the server
// applies its own defaults otherwise.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{Mac, lenient_i64};

pub(crate) type QueryPairs = Vec<(&'static str, String)>;

// ── Readings ─────────────────────────────────────────────────────────

/// A single sensor reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorDatum {
    #[serde(default)]
    pub mac: Mac,
    #[serde(rename = "type")]
    pub sensor_type: i64,
    /// Epoch milliseconds. `0` when the reading has not been stamped.
    #[serde(default)]
    pub timestamp: i64,
    pub data: f64,
}

impl SensorDatum {
    pub fn new(mac: Mac, sensor_type: i64, timestamp: i64, data: f64) -> Self {
        Self {
            mac,
            sensor_type,
            timestamp,
            data,
        }
    }

    /// Whether the reading carries its own timestamp.
    pub fn is_stamped(&self) -> bool {
        self.timestamp > 0
    }

    /// Split readings into one series per sensor type, ordered by type.
    /// Readings keep their original order inside each series.
    pub fn group_by_type(data: &[SensorDatum]) -> Vec<SensorDataByType> {
        let mut grouped: BTreeMap<i64, Vec<SensorBit>> = BTreeMap::new();
        for datum in data {
            grouped.entry(datum.sensor_type).or_default().push(SensorBit {
                timestamp: datum.timestamp,
                data: datum.data,
            });
        }
        grouped
            .into_iter()
            .map(|(sensor_type, sensor_data)| SensorDataByType {
                sensor_type,
                sensor_data,
            })
            .collect()
    }
}

/// A timestamp/value pair inside a per-type series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorBit {
    pub timestamp: i64,
    pub data: f64,
}

/// All readings of one sensor type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDataByType {
    pub sensor_type: i64,
    pub sensor_data: Vec<SensorBit>,
}

// ── Ingest policies ──────────────────────────────────────────────────

/// Which timestamp `send_datum` puts on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// Replace the reading's timestamp with the current time.
    #[default]
    Overwrite,
    /// Send the reading's own timestamp.
    Preserve,
}

/// What `send_data` does with readings that carry no timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingTimestamp {
    /// Stamp them with the time they are sent.
    #[default]
    Now,
    /// Stamp them with a fixed epoch-millisecond value.
    Fixed(i64),
    /// Do not send them.
    Skip,
}

/// Outcome counts for a batch ingest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub skipped: usize,
}

// ── Filter knobs ─────────────────────────────────────────────────────

/// Server-side post-processing shared by range, chart, and labelled-data
/// queries.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFilters {
    pub downsample: bool,
    pub threshold: u64,
    pub moving_average: bool,
    pub window_size: u32,
    pub moving_average_type: u32,
    /// Interquartile filtering range. Only sent when positive.
    pub iq_range: f64,
    pub interpolate: bool,
    pub interpolate_timestep: u64,
    /// 0 = Akima, 1 = linear.
    pub interpolate_type: u32,
}

impl DataFilters {
    /// Defaults used by the sensor-data and chart endpoints.
    pub fn for_sensor_data() -> Self {
        Self {
            downsample: false,
            threshold: 100,
            moving_average: false,
            window_size: 1,
            moving_average_type: 0,
            iq_range: -1.0,
            interpolate: false,
            interpolate_timestep: 30_000,
            interpolate_type: 0,
        }
    }

    /// Defaults used by the labelled-data export.
    pub fn for_labelled_data() -> Self {
        Self {
            threshold: 300,
            window_size: 10,
            ..Self::for_sensor_data()
        }
    }

    pub(crate) fn append_to(&self, query: &mut QueryPairs) {
        if self.downsample {
            query.push(("downsample", "true".into()));
            query.push(("threshold", self.threshold.to_string()));
        }
        if self.moving_average {
            query.push(("movingAverage", "true".into()));
            query.push(("windowSize", self.window_size.to_string()));
            query.push(("movingAverageType", self.moving_average_type.to_string()));
        }
        if self.iq_range > 0.0 {
            query.push(("iqRange", self.iq_range.to_string()));
        }
        if self.interpolate {
            query.push(("interpolateData", "true".into()));
            query.push(("interpolateTimestep", self.interpolate_timestep.to_string()));
            query.push(("interpolateType", self.interpolate_type.to_string()));
        }
    }
}

impl Default for DataFilters {
    fn default() -> Self {
        Self::for_sensor_data()
    }
}

// ── Range query ──────────────────────────────────────────────────────

/// Parameters for `sensordata/byrange`.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorDataQuery {
    pub mac: Mac,
    pub begin: i64,
    pub end: i64,
    /// Sensor types to return; empty means all.
    pub types: Vec<i64>,
    pub limit: u64,
    pub offset_data: bool,
    pub filters: DataFilters,
}

impl SensorDataQuery {
    pub fn new(mac: Mac, begin: i64, end: i64) -> Self {
        Self {
            mac,
            begin,
            end,
            types: Vec::new(),
            limit: 2_000_000,
            offset_data: false,
            filters: DataFilters::for_sensor_data(),
        }
    }

    pub fn with_types(mut self, types: impl Into<Vec<i64>>) -> Self {
        self.types = types.into();
        self
    }

    pub fn with_filters(mut self, filters: DataFilters) -> Self {
        self.filters = filters;
        self
    }

    pub(crate) fn to_query(&self) -> QueryPairs {
        let mut query: QueryPairs = vec![
            ("mac", self.mac.to_string()),
            ("begin", self.begin.to_string()),
            ("end", self.end.to_string()),
            ("limit", self.limit.to_string()),
            ("offsetData", self.offset_data.to_string()),
        ];
        query.extend(self.types.iter().map(|t| ("type", t.to_string())));
        self.filters.append_to(&mut query);
        query
    }
}

// ── Chart query ──────────────────────────────────────────────────────

/// Parameters for `sensordata/chartimage`, which renders a PNG server-side.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImageQuery {
    pub range: SensorDataQuery,
    pub width: u32,
    pub height: u32,
    /// Indoor environmental quality indexes to overlay. Sent together with
    /// `ieq_assumptions`, and only when non-empty.
    pub requested_indexes: Vec<i64>,
    pub ieq_assumptions: Vec<f64>,
}

impl ChartImageQuery {
    pub fn new(mac: Mac, begin: i64, end: i64) -> Self {
        Self {
            range: SensorDataQuery::new(mac, begin, end),
            width: 800,
            height: 600,
            requested_indexes: Vec::new(),
            ieq_assumptions: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub(crate) fn to_query(&self) -> QueryPairs {
        let mut query: QueryPairs = vec![
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
        ];
        query.extend(self.range.to_query());
        if !self.requested_indexes.is_empty() {
            query.extend(
                self.requested_indexes
                    .iter()
                    .map(|i| ("requestedIndexes", i.to_string())),
            );
            query.extend(
                self.ieq_assumptions
                    .iter()
                    .map(|a| ("arrIEQAssumptions", a.to_string())),
            );
        }
        query
    }
}

// ── Labelled data ────────────────────────────────────────────────────

/// Parameters for `labelleddata/exportjson`.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledDataQuery {
    pub classifier_id: String,
    /// Restrict returned columns to the classifier's required types.
    pub restrict_types: bool,
    pub record_limit: u64,
    /// Maximum spread, in milliseconds, of the timestamps merged into one
    /// aligned row.
    pub max_time_align_diff: u64,
    pub filters: DataFilters,
}

impl LabelledDataQuery {
    pub fn new(classifier_id: impl Into<String>) -> Self {
        Self {
            classifier_id: classifier_id.into(),
            restrict_types: true,
            record_limit: 100_000_000,
            max_time_align_diff: 100_000,
            filters: DataFilters::for_labelled_data(),
        }
    }

    pub(crate) fn to_query(&self) -> QueryPairs {
        let mut query: QueryPairs = vec![
            ("classifierId", self.classifier_id.clone()),
            ("restrict_types", self.restrict_types.to_string()),
            ("maxTimeAlignDiff", self.max_time_align_diff.to_string()),
            ("recordLimit", self.record_limit.to_string()),
        ];
        self.filters.append_to(&mut query);
        query
    }
}

/// One aligned row of labelled data: a timestamp and a value per sensor
/// type present at that instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledRow {
    #[serde(deserialize_with = "lenient_i64")]
    pub key: i64,
    #[serde(default)]
    pub value: BTreeMap<i64, f64>,
}
