// Geocoding, IP, and timezone utilities

use serde_json::json;

use super::call::ApiRequest;
use super::client::AretasClient;
use crate::error::Error;
use crate::models::{LatLng, WebServiceBoolean};

impl AretasClient {
    /// Resolve a free-form address to coordinates.
    ///
    /// `POST geocoder/fromstring` with the address as a JSON string body.
    /// A reply without both coordinates is `None`.
    pub async fn geocode(&self, location: &str) -> Result<Option<LatLng>, Error> {
        let req = ApiRequest::post("geocoder/fromstring").json(json!(location));
        self.fetch_lenient(&req).await
    }

    /// The caller's public IP as seen by the API.
    ///
    /// `GET iputil/getip`
    pub async fn client_ip(&self) -> Result<Option<String>, Error> {
        let ip = self.fetch_text(&ApiRequest::get("iputil/getip")).await?;
        Ok(ip.map(|s| s.trim().to_owned()))
    }

    /// Approximate coordinates of the caller's public IP.
    ///
    /// `GET iputil/getlocation`
    pub async fn client_location(&self) -> Result<Option<LatLng>, Error> {
        self.fetch_lenient(&ApiRequest::get("iputil/getlocation")).await
    }

    /// IANA timezone id at a coordinate, e.g. `America/Toronto`.
    ///
    /// `GET timezone/query?lat=&lon=`. The id travels in the envelope's
    /// message; a negative envelope yields `None`.
    pub async fn timezone_id(&self, lat: f64, lon: f64) -> Result<Option<String>, Error> {
        let req = ApiRequest::get("timezone/query")
            .query("lat", lat)
            .query("lon", lon);
        let envelope: Option<WebServiceBoolean> = self.fetch(&req).await?;
        Ok(envelope.filter(WebServiceBoolean::is_success).map(|e| e.message))
    }
}
