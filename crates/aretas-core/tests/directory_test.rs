#![allow(clippy::unwrap_used)]
// Integration tests for the location directory and alert-history
// enrichment against a wiremock server.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aretas_core::models::Mac;
use aretas_core::{AretasClient, CoreError, Credentials, LocationDirectory, fetch_enriched_alert_history};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, AretasClient) {
    let server = MockServer::start().await;
    let client = AretasClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("{}/rest/", server.uri())).unwrap(),
        Credentials::Token(SecretString::from("tok-123")),
    );
    (server, client)
}

fn view_body() -> serde_json::Value {
    json!({
        "id": "client-1",
        "allMacs": [1001, 1002],
        "locationSensorViews": [
            {
                "location": { "id": "hq", "description": "Head office" },
                "lastSensorReportTime": 1_700_000_000_000_i64,
                "sensorList": [
                    { "id": "s-1", "mac": 1001, "description": "Kitchen", "lastReportTime": 1_700_000_000_000_i64 }
                ],
                "buildingMapList": [ { "id": "map-1", "name": "Ground floor" } ]
            },
            {
                "location": { "id": "annex" },
                "lastSensorReportTime": -1,
                "sensorList": [ { "id": "s-2", "mac": 1002 } ]
            }
        ]
    })
}

// ── Directory ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_view_is_fetched_once_then_cached() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/client/locationview"))
        .and(query_param("invalidateCache", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(view_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = LocationDirectory::new(client);
    assert!(dir.snapshot().is_none());

    assert_eq!(dir.locations().await.unwrap().len(), 2);
    let active = dir.active_locations().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].location.id, "hq");
    assert_eq!(dir.sensor_by_mac(Mac(1002)).await.unwrap().unwrap().id, "s-2");
    assert!(dir.last_refresh().is_some());
}

#[tokio::test]
async fn test_refresh_with_invalidation_replaces_snapshot() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/client/locationview"))
        .and(query_param("invalidateCache", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(view_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = LocationDirectory::new(client);
    let mut rx = dir.subscribe();

    let view = dir.refresh(true).await.unwrap();
    assert_eq!(view.id, "client-1");
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().as_ref().unwrap().all_macs.len(), 2);
}

#[tokio::test]
async fn test_failed_view_fetch_is_unavailable() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/client/locationview"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = LocationDirectory::new(client);
    let err = dir.locations().await.unwrap_err();
    assert!(matches!(err, CoreError::Unavailable { .. }), "got {err:?}");
    assert!(dir.snapshot().is_none());
}

// ── Alert history ───────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_enriched_alert_history() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rest/client/locationview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(view_body()))
        .mount(&server)
        .await;

    let record = |event_id: i64, mac: i64| {
        json!({
            "eventId": event_id, "mac": mac, "timestamp": 5_000_000, "rtnTimestamp": 5_100_000,
            "sensorType": 248, "sensorData": 30.5, "alertId": "al-1",
            "isNew": true, "isDismissed": false, "isResolved": false
        })
    };
    Mock::given(method("POST"))
        .and(path("/rest/alerthistory/list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([record(1, 1001), record(2, 9999)])),
        )
        .mount(&server)
        .await;

    let dir = LocationDirectory::new(client.clone());
    let view = dir.view().await.unwrap();
    let enriched = fetch_enriched_alert_history(&client, &["al-1".to_string()], &view, false)
        .await
        .unwrap();

    assert_eq!(enriched.len(), 1);
    assert_eq!(enriched[0].sensor.description, "Kitchen");
    assert_eq!(enriched[0].analytics_start_time, 5_000_000 - 1_800_000);
    assert_eq!(enriched[0].dismiss.mac, Mac(1001));
}

#[tokio::test]
async fn test_failed_history_fetch_yields_empty_list() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/rest/alerthistory/list"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let view = aretas_core::models::ClientLocationView::default();
    let enriched = fetch_enriched_alert_history(&client, &["al-1".to_string()], &view, true)
        .await
        .unwrap();
    assert!(enriched.is_empty());
}
