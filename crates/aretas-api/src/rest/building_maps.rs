// Building map endpoints
//
// Map writes answer with `{success, message}`; only the flag is surfaced.
// Images come back as raw bytes in whatever format the map was uploaded in.

use bytes::Bytes;
use serde_json::json;

use super::call::ApiRequest;
use super::client::AretasClient;
use crate::error::Error;
use crate::models::{BuildingMap, Payload, Point, WriteIntent};

impl AretasClient {
    /// `POST buildingmaps/create`. The server assigns the id.
    pub async fn create_building_map(&self, map: &BuildingMap) -> Result<bool, Error> {
        let req = ApiRequest::post("buildingmaps/create").json(map.to_payload(WriteIntent::Create)?);
        Ok(self.submit(&req, "create building map").await?.is_success())
    }

    /// `POST buildingmaps/update`
    pub async fn update_building_map(&self, map: &BuildingMap) -> Result<bool, Error> {
        let req = ApiRequest::post("buildingmaps/update").json(map.to_payload(WriteIntent::Update)?);
        Ok(self.submit(&req, "update building map").await?.is_success())
    }

    /// `GET buildingmaps/delete?id=`
    pub async fn delete_building_map(&self, id: &str) -> Result<bool, Error> {
        let req = ApiRequest::get("buildingmaps/delete").query("id", id);
        Ok(self.submit(&req, "delete building map").await?.is_success())
    }

    /// `GET buildingmaps/list?locationId=`
    pub async fn list_building_maps(
        &self,
        location_id: &str,
    ) -> Result<Option<Vec<BuildingMap>>, Error> {
        let req = ApiRequest::get("buildingmaps/list").query("locationId", location_id);
        self.fetch_list(&req).await
    }

    /// The map's floor plan image.
    ///
    /// `GET buildingmaps/getimage?locationId=&mapId=`
    pub async fn get_map_image(
        &self,
        location_id: &str,
        map_id: &str,
    ) -> Result<Option<Bytes>, Error> {
        let req = ApiRequest::get("buildingmaps/getimage")
            .query("locationId", location_id)
            .query("mapId", map_id);
        self.fetch_bytes(&req).await
    }

    /// The floor plan with the given points drawn on it.
    ///
    /// `POST buildingmaps/getimagewithpoints?locationId=&mapId=`
    pub async fn get_map_image_with_points(
        &self,
        location_id: &str,
        map_id: &str,
        points: &[Point],
    ) -> Result<Option<Bytes>, Error> {
        let req = ApiRequest::post("buildingmaps/getimagewithpoints")
            .query("locationId", location_id)
            .query("mapId", map_id)
            .json(json!(points));
        self.fetch_bytes(&req).await
    }
}
