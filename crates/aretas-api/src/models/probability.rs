// Histogram and probability entities
//
// Univariate histograms bin a sensor type's values; temporal histograms
// add a time-of-day (or time-of-week) axis, giving a matrix of 2D bins.

use serde::{Deserialize, Serialize};

use super::common::Mac;
use super::sensor_data::QueryPairs;

// ── 1D ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin1D {
    pub bin_size: f64,
    pub min: f64,
    pub max: f64,
    pub count: i64,
    pub probability: f64,
    pub density: f64,
    pub index: i64,
    pub sum: f64,
}

/// Descriptive statistics over the values behind a histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    pub min_time: f64,
    pub max_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram1D {
    #[serde(rename = "XIncr")]
    pub x_incr: f64,
    #[serde(rename = "XMax")]
    pub x_max: f64,
    #[serde(rename = "XMin")]
    pub x_min: f64,
    #[serde(rename = "frequencyBins")]
    pub bins: Vec<Bin1D>,
    #[serde(rename = "summaryStats")]
    pub statistics: SummaryStats,
}

// ── 2D ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin2D {
    pub x_bin_size: f64,
    pub y_bin_size: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub count: i64,
    pub probability: f64,
    pub density: f64,
}

/// Value-by-time histogram: `matrix[time_bin][value_bin]`, with one
/// statistics block per time bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalHistogram {
    pub matrix: Vec<Vec<Bin2D>>,
    pub stats: Vec<SummaryStats>,
}

// ── Query ────────────────────────────────────────────────────────────

/// Time axis of a temporal histogram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangeType {
    #[default]
    HourOfDay,
    HourOfWeek,
}

impl RangeType {
    pub fn code(self) -> u8 {
        match self {
            Self::HourOfDay => 0,
            Self::HourOfWeek => 1,
        }
    }
}

/// Common parameters of every `probability/*` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramQuery {
    pub macs: Vec<Mac>,
    pub sensor_type: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub record_limit: u64,
    pub n_bins: u32,
    /// Only used by the temporal endpoints.
    pub range_type: RangeType,
}

impl HistogramQuery {
    pub fn new(macs: impl Into<Vec<Mac>>, sensor_type: i64, start_time: i64, end_time: i64) -> Self {
        Self {
            macs: macs.into(),
            sensor_type,
            start_time,
            end_time,
            record_limit: 100_000,
            n_bins: 20,
            range_type: RangeType::HourOfDay,
        }
    }

    pub fn with_bins(mut self, n_bins: u32) -> Self {
        self.n_bins = n_bins;
        self
    }

    pub fn with_range_type(mut self, range_type: RangeType) -> Self {
        self.range_type = range_type;
        self
    }

    pub(crate) fn to_query(&self, temporal: bool) -> QueryPairs {
        let mut query: QueryPairs = vec![
            ("type", self.sensor_type.to_string()),
            ("startTime", self.start_time.to_string()),
            ("endTime", self.end_time.to_string()),
            ("recordLimit", self.record_limit.to_string()),
            ("nBins", self.n_bins.to_string()),
        ];
        if temporal {
            query.push(("rangeType", self.range_type.code().to_string()));
        }
        query.extend(self.macs.iter().map(|m| ("macs", m.to_string())));
        query
    }
}
