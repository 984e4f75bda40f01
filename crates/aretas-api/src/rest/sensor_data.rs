// Sensor data retrieval and ingest
//
// Range queries, server-rendered charts, latest readings, labelled-data
// export, and the single-reading ingest endpoint. Ingest authenticates
// twice: the bearer token plus `X-AIR-Token` carrying the reporting MAC.

use bytes::Bytes;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::call::ApiRequest;
use super::client::AretasClient;
use crate::error::Error;
use crate::models::{
    ChartImageQuery, IngestSummary, LabelledDataQuery, LabelledRow, Mac, MissingTimestamp,
    SensorDataQuery, SensorDatum, TimestampPolicy, now_millis,
};

impl AretasClient {
    /// `GET sensordata/byrange`
    pub async fn sensor_data_by_range(
        &self,
        query: &SensorDataQuery,
    ) -> Result<Option<Vec<SensorDatum>>, Error> {
        let req = ApiRequest::get("sensordata/byrange").query_pairs(query.to_query());
        let data: Option<Vec<SensorDatum>> = self.fetch_list(&req).await?;
        // The endpoint omits the MAC on each reading; it is the queried one.
        Ok(data.map(|mut data| {
            for datum in &mut data {
                if datum.mac == Mac::default() {
                    datum.mac = query.mac;
                }
            }
            data
        }))
    }

    /// A PNG chart of the query's readings, rendered server-side.
    ///
    /// `GET sensordata/chartimage`
    pub async fn chart_image(&self, query: &ChartImageQuery) -> Result<Option<Bytes>, Error> {
        let req = ApiRequest::get("sensordata/chartimage").query_pairs(query.to_query());
        self.fetch_bytes(&req).await
    }

    /// Latest report for each MAC, as loosely-typed JSON.
    ///
    /// `POST sensorreport/latest` with the MACs as a JSON array body.
    pub async fn latest_sensor_data(&self, macs: &[Mac]) -> Result<Option<Value>, Error> {
        let req = ApiRequest::post("sensorreport/latest").json(json!(macs));
        self.fetch(&req).await
    }

    /// Export the rows labelled by a classifier, aligned by timestamp.
    ///
    /// `GET labelleddata/exportjson`
    pub async fn labelled_data(
        &self,
        query: &LabelledDataQuery,
    ) -> Result<Option<Vec<LabelledRow>>, Error> {
        let req = ApiRequest::get("labelleddata/exportjson").query_pairs(query.to_query());
        self.fetch_list(&req).await
    }

    // ── Ingest ───────────────────────────────────────────────────────

    /// Send one reading. `true` when the server accepted it.
    ///
    /// `GET ingest/secured/std/get?t=&m=&st=&d=`
    pub async fn send_datum(
        &self,
        datum: &SensorDatum,
        policy: TimestampPolicy,
    ) -> Result<bool, Error> {
        let timestamp = match policy {
            TimestampPolicy::Overwrite => now_millis(),
            TimestampPolicy::Preserve => datum.timestamp,
        };
        let req = ApiRequest::get("ingest/secured/std/get")
            .query("t", timestamp)
            .query("m", datum.mac)
            .query("st", datum.sensor_type)
            .query("d", datum.data)
            .header("X-AIR-Token", datum.mac);
        self.acknowledge(&req).await
    }

    /// Send readings one after another, keeping their own timestamps.
    ///
    /// Readings without a timestamp are handled per `missing`. A rejected
    /// reading does not stop the batch; transport errors do.
    pub async fn send_data(
        &self,
        data: &[SensorDatum],
        missing: MissingTimestamp,
    ) -> Result<IngestSummary, Error> {
        let mut summary = IngestSummary::default();
        for datum in data {
            let mut datum = *datum;
            if !datum.is_stamped() {
                match missing {
                    MissingTimestamp::Now => datum.timestamp = now_millis(),
                    MissingTimestamp::Fixed(ts) => datum.timestamp = ts,
                    MissingTimestamp::Skip => {
                        debug!(mac = %datum.mac, sensor_type = datum.sensor_type, "skipping unstamped reading");
                        summary.skipped += 1;
                        continue;
                    }
                }
            }
            if self.send_datum(&datum, TimestampPolicy::Preserve).await? {
                summary.accepted += 1;
            } else {
                warn!(mac = %datum.mac, sensor_type = datum.sensor_type, "reading rejected");
                summary.rejected += 1;
            }
        }
        Ok(summary)
    }
}
