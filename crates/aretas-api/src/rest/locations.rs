use super::call::ApiRequest;
use super::client::AretasClient;
use crate::error::Error;
use crate::models::ClientLocationView;

impl AretasClient {
    /// Fetch the full location/sensor/building-map tree for the account.
    ///
    /// `GET client/locationview?invalidateCache=`. With `invalidate_cache`
    /// the server rebuilds the view instead of serving its cached copy.
    pub async fn get_client_location_view(
        &self,
        invalidate_cache: bool,
    ) -> Result<Option<ClientLocationView>, Error> {
        let req =
            ApiRequest::get("client/locationview").query("invalidateCache", invalidate_cache);
        self.fetch(&req).await
    }
}
