// Aretas REST client
//
// Holds the shared HTTP client, the normalized API base URL, and the
// credential manager. Endpoint groups (alerts, locations, probability, ...)
// are implemented as inherent methods in sibling modules; the
// authenticated-call mechanics live in `call.rs`.

use std::sync::Arc;

use url::Url;

use crate::auth::{CredentialManager, Credentials};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Everything needed to talk to one Aretas API deployment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://iot.aretas.ca/rest/`.
    pub base_url: Url,
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(base_url: Url, credentials: Credentials) -> Self {
        Self {
            base_url,
            credentials,
            transport: TransportConfig::default(),
        }
    }
}

/// Async client for the Aretas REST API.
///
/// Cheap to clone: clones share the HTTP connection pool and the cached
/// bearer token.
#[derive(Debug, Clone)]
pub struct AretasClient {
    pub(crate) http: reqwest::Client,
    base_url: Url,
    pub(crate) auth: Arc<CredentialManager>,
}

impl AretasClient {
    /// Build a client, including its HTTP transport, from a `ClientConfig`.
    ///
    /// No request is made here; the first token is minted lazily.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        Ok(Self::with_client(
            http,
            config.base_url.clone(),
            config.credentials.clone(),
        ))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        let base_url = normalize_base_url(base_url);
        let auth = CredentialManager::new(http.clone(), base_url.clone(), credentials);
        Self {
            http,
            base_url,
            auth: Arc::new(auth),
        }
    }

    /// The API root every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The credential manager owning this client's bearer token.
    pub fn auth(&self) -> &CredentialManager {
        &self.auth
    }

    /// Resolve an endpoint path such as `alert/list` against the API root.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }
}

/// Ensure the base URL path ends with `/` so relative joins append rather
/// than replace the last segment.
fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client(base: &str) -> AretasClient {
        AretasClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            Credentials::Token(SecretString::from("tok")),
        )
    }

    #[test]
    fn endpoint_paths_append_to_the_api_root() {
        let c = client("https://iot.example.com/rest");
        assert_eq!(
            c.url("alert/list").unwrap().as_str(),
            "https://iot.example.com/rest/alert/list"
        );
    }

    #[test]
    fn trailing_slash_is_kept() {
        let c = client("https://iot.example.com/rest/");
        assert_eq!(c.base_url().as_str(), "https://iot.example.com/rest/");
        assert_eq!(
            c.url("dataclassifierrecord/get/byid").unwrap().path(),
            "/rest/dataclassifierrecord/get/byid"
        );
    }
}
