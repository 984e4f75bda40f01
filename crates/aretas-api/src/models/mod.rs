// Typed entities for the Aretas API
//
// Every entity decodes through serde with per-field defaults; required
// fields have no default and fail the decode when absent.

pub mod alert;
pub mod classifier;
pub mod common;
pub mod location;
pub mod probability;
pub mod sensor_data;

pub use alert::{Alert, AlertHistoryRecord};
pub use classifier::{DataClassifier, DataClassifierRecord};
pub use common::{LatLng, Mac, Payload, Point, WebServiceBoolean, WriteIntent, now_millis};
pub use location::{
    AreaUsageHints, BuildingMap, ClientLocationView, Location, LocationSensorView, NEVER_REPORTED,
    Sensor, Status,
};
pub use probability::{
    Bin1D, Bin2D, Histogram1D, HistogramQuery, RangeType, SummaryStats, TemporalHistogram,
};
pub use sensor_data::{
    ChartImageQuery, DataFilters, IngestSummary, LabelledDataQuery, LabelledRow, MissingTimestamp,
    SensorBit, SensorDataByType, SensorDataQuery, SensorDatum, TimestampPolicy,
};
