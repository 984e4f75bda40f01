// Alert rule endpoints
//
// CRUD over threshold alerts plus the single alert-log lookup. Writes are
// POSTs of the alert body and answer with the result envelope.

use tracing::debug;

use super::call::ApiRequest;
use super::client::AretasClient;
use crate::error::Error;
use crate::models::{Alert, AlertHistoryRecord, Payload, WebServiceBoolean, WriteIntent};

impl AretasClient {
    /// List every alert rule visible to the account.
    ///
    /// `GET alert/list`
    pub async fn list_alerts(&self) -> Result<Option<Vec<Alert>>, Error> {
        self.fetch_list(&ApiRequest::get("alert/list")).await
    }

    /// Find one alert rule by id. Lists all alerts and filters locally.
    pub async fn find_alert(&self, id: &str) -> Result<Option<Alert>, Error> {
        let alerts = self.list_alerts().await?.unwrap_or_default();
        Ok(alerts.into_iter().find(|a| a.id == id))
    }

    /// Create a new alert rule. The server assigns the id.
    ///
    /// `POST alert/save`
    pub async fn save_alert(&self, alert: &Alert) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::post("alert/save").json(alert.to_payload(WriteIntent::Create)?);
        self.submit(&req, "save alert").await
    }

    /// `POST alert/update`
    pub async fn update_alert(&self, alert: &Alert) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::post("alert/update").json(alert.to_payload(WriteIntent::Update)?);
        self.submit(&req, "update alert").await
    }

    /// `POST alert/remove`
    pub async fn remove_alert(&self, alert: &Alert) -> Result<WebServiceBoolean, Error> {
        let req = ApiRequest::post("alert/remove").json(alert.to_payload(WriteIntent::Delete)?);
        self.submit(&req, "remove alert").await
    }

    /// Look up a single alert event by its event id.
    ///
    /// `GET alertlog/getbyeventid?eventId=`
    pub async fn get_alert_history_record(
        &self,
        event_id: i64,
    ) -> Result<Option<AlertHistoryRecord>, Error> {
        debug!(event_id, "fetching alert history record");
        let req = ApiRequest::get("alertlog/getbyeventid").query("eventId", event_id);
        self.fetch(&req).await
    }
}
