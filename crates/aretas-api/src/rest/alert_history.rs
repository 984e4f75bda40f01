use serde_json::json;
use tracing::info;

use super::call::ApiRequest;
use super::client::AretasClient;
use crate::error::Error;
use crate::models::{AlertHistoryRecord, Mac};

impl AretasClient {
    /// Alert events produced by the given alert rules.
    ///
    /// `POST alerthistory/list` with the ids as a JSON array body. Dismissed
    /// events are only included when `show_dismissed` is set. Records that
    /// fail to decode are dropped.
    pub async fn list_alert_history(
        &self,
        alert_ids: &[String],
        show_dismissed: bool,
    ) -> Result<Option<Vec<AlertHistoryRecord>>, Error> {
        let mut req = ApiRequest::post("alerthistory/list").json(json!(alert_ids));
        if show_dismissed {
            req = req.query("showDismissed", true);
        }
        self.fetch_list(&req).await
    }

    /// Mark an alert event as read. `true` only when the server answered 200.
    ///
    /// `GET alerthistory/dismiss?mac=&type=&alertId=`
    pub async fn dismiss_alert_history_object(
        &self,
        mac: Mac,
        sensor_type: i64,
        alert_id: &str,
    ) -> Result<bool, Error> {
        info!(%mac, sensor_type, alert_id, "dismissing alert history");
        let req = ApiRequest::get("alerthistory/dismiss")
            .query("mac", mac)
            .query("type", sensor_type)
            .query("alertId", alert_id);
        self.acknowledge(&req).await
    }
}
