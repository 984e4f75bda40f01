// Authenticated-call protocol
//
// Every endpoint goes through `AretasClient::execute`: attach the cached
// bearer token, send, and on 401 force one token refresh and retry exactly
// once. Anything other than 200 (or a 401 that survives the refresh) ends
// the call as `CallOutcome::Failed`. The decode helpers below turn an
// outcome into the shape each endpoint returns.

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::client::AretasClient;
use crate::error::Error;
use crate::models::WebServiceBoolean;
use crate::models::sensor_data::QueryPairs;

// ── Request description ──────────────────────────────────────────────

/// A request that can be sent more than once (the 401 retry rebuilds it).
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: &'static str,
    query: QueryPairs,
    body: Option<Value>,
    headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
    fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub(crate) fn get(path: &'static str) -> Self {
        Self::new(Method::GET, path)
    }

    pub(crate) fn post(path: &'static str) -> Self {
        Self::new(Method::POST, path)
    }

    pub(crate) fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    pub(crate) fn query_pairs(mut self, pairs: QueryPairs) -> Self {
        self.query.extend(pairs);
        self
    }

    pub(crate) fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub(crate) fn header(mut self, name: &'static str, value: impl ToString) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }
}

/// Terminal state of one authenticated call.
#[derive(Debug)]
pub(crate) enum CallOutcome {
    Success(Bytes),
    Failed {
        status: StatusCode,
        after_refresh: bool,
    },
}

// ── Protocol ─────────────────────────────────────────────────────────

impl AretasClient {
    async fn send(
        &self,
        req: &ApiRequest,
        token: &SecretString,
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(req.path)?;
        debug!("{} {url}", req.method);

        let mut builder = self
            .http
            .request(req.method.clone(), url)
            .bearer_auth(token.expose_secret());
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        for (name, value) in &req.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Run `req` under the token-refresh-and-retry protocol.
    ///
    /// At most two requests are sent. A rejected login, up front or during
    /// the refresh, ends the call as failed; transport errors propagate.
    pub(crate) async fn execute(&self, req: &ApiRequest) -> Result<CallOutcome, Error> {
        let token = match self.auth.get_token(false).await {
            Ok(token) => token,
            Err(e) if e.is_auth_failure() => {
                error!(path = req.path, error = %e, "no access token, request not sent");
                return Ok(CallOutcome::Failed {
                    status: StatusCode::UNAUTHORIZED,
                    after_refresh: false,
                });
            }
            Err(e) => return Err(e),
        };
        let resp = self.send(req, &token).await?;
        let status = resp.status();

        if status == StatusCode::OK {
            return Ok(CallOutcome::Success(resp.bytes().await?));
        }
        if status != StatusCode::UNAUTHORIZED {
            warn!(%status, path = req.path, "request failed");
            return Ok(CallOutcome::Failed {
                status,
                after_refresh: false,
            });
        }

        warn!(path = req.path, "unauthorized, refreshing token and retrying");
        let token = match self.auth.refresh_token().await {
            Ok(token) => token,
            Err(e) if e.is_auth_failure() => {
                error!(path = req.path, error = %e, "token refresh failed, giving up");
                return Ok(CallOutcome::Failed {
                    status,
                    after_refresh: true,
                });
            }
            Err(e) => return Err(e),
        };

        let resp = self.send(req, &token).await?;
        let status = resp.status();
        if status == StatusCode::OK {
            return Ok(CallOutcome::Success(resp.bytes().await?));
        }

        error!(%status, path = req.path, "request failed after token refresh");
        Ok(CallOutcome::Failed {
            status,
            after_refresh: true,
        })
    }

    // ── Decode strategies ────────────────────────────────────────────

    /// Decode a single object. A malformed body is an error; a failed call
    /// is `None`.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        req: &ApiRequest,
    ) -> Result<Option<T>, Error> {
        match self.execute(req).await? {
            CallOutcome::Success(body) => serde_json::from_slice(&body)
                .map(Some)
                .map_err(|e| Error::decode(&e, &body)),
            CallOutcome::Failed { .. } => Ok(None),
        }
    }

    /// Decode a single object, treating a body that does not fit `T` as
    /// "no result" rather than an error.
    pub(crate) async fn fetch_lenient<T: DeserializeOwned>(
        &self,
        req: &ApiRequest,
    ) -> Result<Option<T>, Error> {
        match self.execute(req).await? {
            CallOutcome::Success(body) => match serde_json::from_slice(&body) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    warn!(path = req.path, error = %e, "response carried no usable result");
                    Ok(None)
                }
            },
            CallOutcome::Failed { .. } => Ok(None),
        }
    }

    /// Decode a JSON array record by record. Records that fail to decode
    /// are skipped; the rest keep their order. A body that is not an array
    /// is an error.
    pub(crate) async fn fetch_list<T: DeserializeOwned>(
        &self,
        req: &ApiRequest,
    ) -> Result<Option<Vec<T>>, Error> {
        match self.execute(req).await? {
            CallOutcome::Success(body) => decode_records(&body).map(Some),
            CallOutcome::Failed { .. } => Ok(None),
        }
    }

    /// Raw response bytes (images).
    pub(crate) async fn fetch_bytes(&self, req: &ApiRequest) -> Result<Option<Bytes>, Error> {
        match self.execute(req).await? {
            CallOutcome::Success(body) => Ok(Some(body)),
            CallOutcome::Failed { .. } => Ok(None),
        }
    }

    /// Response body as text.
    pub(crate) async fn fetch_text(&self, req: &ApiRequest) -> Result<Option<String>, Error> {
        match self.execute(req).await? {
            CallOutcome::Success(body) => Ok(Some(String::from_utf8_lossy(&body).into_owned())),
            CallOutcome::Failed { .. } => Ok(None),
        }
    }

    /// Mutating call answered by the `{booleanResponse, message}` envelope.
    /// Failed calls synthesize `Failed to <action>[ after token refresh]`.
    pub(crate) async fn submit(
        &self,
        req: &ApiRequest,
        action: &str,
    ) -> Result<WebServiceBoolean, Error> {
        match self.execute(req).await? {
            CallOutcome::Success(body) => {
                serde_json::from_slice(&body).map_err(|e| Error::decode(&e, &body))
            }
            CallOutcome::Failed {
                status,
                after_refresh,
            } => {
                debug!(%status, action, "synthesizing failure envelope");
                Ok(WebServiceBoolean::failed(failure_message(action, after_refresh)))
            }
        }
    }

    /// Call whose only result is whether the server answered 200.
    pub(crate) async fn acknowledge(&self, req: &ApiRequest) -> Result<bool, Error> {
        Ok(matches!(self.execute(req).await?, CallOutcome::Success(_)))
    }
}

pub(crate) fn failure_message(action: &str, after_refresh: bool) -> String {
    if after_refresh {
        format!("Failed to {action} after token refresh")
    } else {
        format!("Failed to {action}")
    }
}

pub(crate) fn decode_records<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, Error> {
    let raw: Vec<Value> = serde_json::from_slice(body).map_err(|e| Error::decode(&e, body))?;
    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!(index = i, error = %e, "skipping record that failed to decode");
                None
            }
        })
        .collect();
    if records.len() < total {
        debug!(kept = records.len(), total, "decoded list with skipped records");
    }
    Ok(records)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::AlertHistoryRecord;

    #[test]
    fn failure_messages_name_the_action() {
        assert_eq!(failure_message("save alert", false), "Failed to save alert");
        assert_eq!(
            failure_message("save alert", true),
            "Failed to save alert after token refresh"
        );
    }

    #[test]
    fn bad_records_are_skipped_in_order() {
        let body = br#"[
            {"eventId":1,"mac":10,"timestamp":1,"rtnTimestamp":2,"sensorType":248,
             "sensorData":1.0,"alertId":"a1","isNew":true,"isDismissed":false,"isResolved":false},
            {"eventId":2,"mac":10},
            {"eventId":3,"mac":11,"timestamp":1,"rtnTimestamp":2,"sensorType":248,
             "sensorData":2.0,"alertId":"a2","isNew":false,"isDismissed":false,"isResolved":true}
        ]"#;
        let records: Vec<AlertHistoryRecord> = decode_records(body).unwrap();
        let ids: Vec<i64> = records.iter().map(|r| r.event_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn non_array_body_is_a_decode_error() {
        let err = decode_records::<AlertHistoryRecord>(br#"{"oops":true}"#).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }
}
