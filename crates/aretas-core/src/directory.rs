// ── Location directory ──
//
// Lookups over the account's client location view. The view is fetched on
// first use and kept until `refresh` replaces it. Snapshots are published
// through a `watch` channel so long-lived consumers can follow refreshes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tokio::sync::watch;
use tracing::{debug, warn};

use aretas_api::AretasClient;
use aretas_api::models::{ClientLocationView, Location, LocationSensorView, Mac, Sensor};

use crate::error::CoreError;

/// Default window for [`LocationDirectory::active_devices`]: 24 hours.
pub const DEFAULT_ACTIVE_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Cached, queryable view of an account's locations and sensors.
pub struct LocationDirectory {
    client: AretasClient,
    view: watch::Sender<Option<Arc<ClientLocationView>>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl LocationDirectory {
    /// An empty directory; the view is fetched on the first lookup.
    pub fn new(client: AretasClient) -> Self {
        let (view, _) = watch::channel(None);
        let (last_refresh, _) = watch::channel(None);
        Self {
            client,
            view,
            last_refresh,
        }
    }

    /// A directory pre-seeded with an already fetched view.
    pub fn with_view(client: AretasClient, view: ClientLocationView) -> Self {
        let directory = Self::new(client);
        directory.store(view);
        directory
    }

    fn store(&self, view: ClientLocationView) -> Arc<ClientLocationView> {
        let view = Arc::new(view);
        self.view.send_replace(Some(Arc::clone(&view)));
        self.last_refresh.send_replace(Some(Utc::now()));
        view
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Fetch the view from the API and replace the cached one.
    ///
    /// With `invalidate_cache` the server rebuilds the view rather than
    /// serving its own cached copy.
    pub async fn refresh(&self, invalidate_cache: bool) -> Result<Arc<ClientLocationView>, CoreError> {
        debug!(invalidate_cache, "refreshing client location view");
        let view = self
            .client
            .get_client_location_view(invalidate_cache)
            .await?
            .ok_or_else(|| CoreError::unavailable("client location view"))?;
        Ok(self.store(view))
    }

    /// The cached view, fetching it first if nothing is cached.
    pub async fn view(&self) -> Result<Arc<ClientLocationView>, CoreError> {
        if let Some(view) = self.snapshot() {
            return Ok(view);
        }
        self.refresh(false).await
    }

    /// The cached view, without any network traffic.
    pub fn snapshot(&self) -> Option<Arc<ClientLocationView>> {
        self.view.borrow().clone()
    }

    /// Follow view replacements.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ClientLocationView>>> {
        self.view.subscribe()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// Every location, in view order.
    pub async fn locations(&self) -> Result<Vec<Location>, CoreError> {
        let view = self.view().await?;
        Ok(view
            .location_sensor_views
            .iter()
            .map(|lsv| lsv.location.clone())
            .collect())
    }

    /// Locations where at least one sensor has ever reported.
    pub async fn active_locations(&self) -> Result<Vec<LocationSensorView>, CoreError> {
        let view = self.view().await?;
        Ok(view
            .location_sensor_views
            .iter()
            .filter(|lsv| lsv.is_active())
            .cloned()
            .collect())
    }

    /// Sensors in active locations that reported within `window_ms` of
    /// `now_ms`.
    pub async fn active_devices(&self, window_ms: i64, now_ms: i64) -> Result<Vec<Sensor>, CoreError> {
        let active = self.active_locations().await?;
        Ok(active
            .into_iter()
            .flat_map(|lsv| lsv.sensor_list)
            .filter(|sensor| now_ms - sensor.last_report_time < window_ms)
            .collect())
    }

    pub async fn location_by_id(&self, location_id: &str) -> Result<Option<LocationSensorView>, CoreError> {
        let view = self.view().await?;
        Ok(view
            .location_sensor_views
            .iter()
            .find(|lsv| lsv.location.id == location_id)
            .cloned())
    }

    pub async fn device_by_id(&self, device_id: &str) -> Result<Option<Sensor>, CoreError> {
        let view = self.view().await?;
        Ok(view.sensors().find(|s| s.id == device_id).cloned())
    }

    pub async fn sensor_by_mac(&self, mac: Mac) -> Result<Option<Sensor>, CoreError> {
        let view = self.view().await?;
        let sensor = view.sensors().find(|s| s.mac == mac).cloned();
        if sensor.is_none() {
            warn!(%mac, "sensor not found in client location view");
        }
        Ok(sensor)
    }

    /// A uniformly random location that has at least one building map.
    pub async fn random_location_with_building_map(
        &self,
    ) -> Result<Option<LocationSensorView>, CoreError> {
        let view = self.view().await?;
        let candidates: Vec<&LocationSensorView> = view
            .location_sensor_views
            .iter()
            .filter(|lsv| !lsv.building_map_list.is_empty())
            .collect();
        let choice = candidates.choose(&mut rand::thread_rng()).map(|lsv| (*lsv).clone());
        if choice.is_none() {
            warn!("no locations with building maps found");
        }
        Ok(choice)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aretas_api::Credentials;
    use aretas_api::models::BuildingMap;
    use secrecy::SecretString;

    fn offline_client() -> AretasClient {
        AretasClient::with_client(
            reqwest::Client::new(),
            url::Url::parse("http://127.0.0.1:9/").unwrap(),
            Credentials::Token(SecretString::from("tok")),
        )
    }

    fn sensor(id: &str, mac: i64, last_report_time: i64) -> Sensor {
        Sensor {
            id: id.into(),
            mac: Mac(mac),
            last_report_time,
            ..Sensor::default()
        }
    }

    fn fixture() -> ClientLocationView {
        let mut hq = LocationSensorView {
            last_sensor_report_time: 9_000,
            sensor_list: vec![sensor("s-1", 1, 9_000), sensor("s-2", 2, 1_000)],
            building_map_list: vec![BuildingMap {
                id: "map-1".into(),
                ..BuildingMap::default()
            }],
            ..LocationSensorView::default()
        };
        hq.location.id = "hq".into();

        let mut shed = LocationSensorView {
            sensor_list: vec![sensor("s-3", 3, 9_500)],
            ..LocationSensorView::default()
        };
        shed.location.id = "shed".into();

        ClientLocationView {
            id: "c-1".into(),
            all_macs: vec![Mac(1), Mac(2), Mac(3)],
            location_sensor_views: vec![hq, shed],
        }
    }

    #[tokio::test]
    async fn active_filters_follow_report_times() {
        let dir = LocationDirectory::with_view(offline_client(), fixture());

        let active = dir.active_locations().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].location.id, "hq");

        // The shed never reported as a location, so its sensor is excluded
        // even though it is recent.
        let devices = dir.active_devices(5_000, 10_000).await.unwrap();
        let ids: Vec<_> = devices.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s-1"]);
    }

    #[tokio::test]
    async fn lookups_by_id_and_mac() {
        let dir = LocationDirectory::with_view(offline_client(), fixture());

        assert_eq!(dir.locations().await.unwrap().len(), 2);
        assert!(dir.location_by_id("shed").await.unwrap().is_some());
        assert!(dir.location_by_id("attic").await.unwrap().is_none());
        assert_eq!(dir.device_by_id("s-3").await.unwrap().unwrap().mac, Mac(3));
        assert_eq!(dir.sensor_by_mac(Mac(2)).await.unwrap().unwrap().id, "s-2");
        assert!(dir.sensor_by_mac(Mac(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn random_pick_only_returns_locations_with_maps() {
        let dir = LocationDirectory::with_view(offline_client(), fixture());
        for _ in 0..10 {
            let pick = dir.random_location_with_building_map().await.unwrap().unwrap();
            assert_eq!(pick.location.id, "hq");
        }
    }

    #[test]
    fn seeded_directory_exposes_snapshot() {
        let dir = LocationDirectory::with_view(offline_client(), fixture());
        assert_eq!(dir.snapshot().unwrap().id, "c-1");
        assert!(dir.last_refresh().is_some());
    }
}
