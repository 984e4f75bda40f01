// Bearer token management
//
// The credential manager owns the login configuration and the cached
// bearer token. It mints tokens from `authentication/g`, probes them
// against `greetings/isloggedin`, and is the only place the cached token
// is ever written.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use url::Url;

use crate::error::Error;

/// Path of the login endpoint that mints bearer tokens.
const LOGIN_PATH: &str = "authentication/g";

/// Path of the lightweight authenticated probe.
const PROBE_PATH: &str = "greetings/isloggedin";

/// Credentials for authenticating with the Aretas API.
///
/// Each variant carries the secret material needed for its auth flow.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// A pre-issued bearer token. The caller owns its lifecycle: it is
    /// sent verbatim on every request and never refreshed.
    Token(SecretString),

    /// Username and password used to mint (and re-mint) bearer tokens.
    Login {
        username: String,
        password: SecretString,
    },
}

impl Credentials {
    /// Whether the token was supplied from outside and must never be refreshed.
    pub fn is_externally_supplied(&self) -> bool {
        matches!(self, Self::Token(_))
    }
}

/// Result of probing a bearer token against the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidity {
    /// The probe succeeded (or answered with a non-auth client status).
    Valid,
    /// The API explicitly rejected the token (HTTP 401/403).
    Rejected,
    /// No token is cached yet, so nothing could be probed.
    Missing,
    /// The API answered with a server error; validity could not be
    /// determined. Treated as valid when deciding whether to refresh.
    Unknown(StatusCode),
}

impl TokenValidity {
    /// Whether a refresh should be triggered by this probe result.
    pub fn needs_refresh(self) -> bool {
        matches!(self, Self::Rejected | Self::Missing)
    }
}

/// Owns the bearer token for one API endpoint.
///
/// The cached token sits behind an async mutex so that the
/// read-check-refresh-write sequence in [`get_token`](Self::get_token)
/// runs as one critical section when a client is shared between tasks.
pub struct CredentialManager {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    token: Mutex<Option<SecretString>>,
}

impl CredentialManager {
    /// Create a manager for `base_url`. An externally supplied token is
    /// cached immediately; login credentials mint one lazily.
    pub fn new(http: reqwest::Client, base_url: Url, credentials: Credentials) -> Self {
        let token = match &credentials {
            Credentials::Token(token) => Some(token.clone()),
            Credentials::Login { .. } => None,
        };
        Self {
            http,
            base_url,
            credentials,
            token: Mutex::new(token),
        }
    }

    /// Whether the token was supplied from outside and is never refreshed.
    pub fn is_externally_supplied(&self) -> bool {
        self.credentials.is_externally_supplied()
    }

    /// The username used for login, if this manager mints its own tokens.
    pub fn username(&self) -> Option<&str> {
        match &self.credentials {
            Credentials::Login { username, .. } => Some(username),
            Credentials::Token(_) => None,
        }
    }

    /// Return a bearer token for the next request.
    ///
    /// An externally supplied token is returned verbatim, with no HTTP
    /// traffic, regardless of `refresh_if_expired`. Otherwise a token is
    /// minted when none is cached, and with `refresh_if_expired` the cached
    /// token is probed first and replaced only if the API rejects it.
    pub async fn get_token(&self, refresh_if_expired: bool) -> Result<SecretString, Error> {
        if let Credentials::Token(token) = &self.credentials {
            return Ok(token.clone());
        }

        let mut cached = self.token.lock().await;

        if refresh_if_expired {
            let validity = match cached.as_ref() {
                Some(token) => self.probe(token).await?,
                None => TokenValidity::Missing,
            };
            if validity.needs_refresh() {
                debug!(?validity, "cached token unusable, refreshing");
                let fresh = self.login().await?;
                *cached = Some(fresh.clone());
                return Ok(fresh);
            }
        }

        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let fresh = self.login().await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    /// Probe the current token against the API: the supplied one, or the
    /// cached one for login credentials.
    ///
    /// Only an explicit 401/403 marks the token as rejected. Server errors
    /// are reported as [`TokenValidity::Unknown`] rather than silently
    /// counted as valid.
    pub async fn test_token(&self) -> Result<TokenValidity, Error> {
        let current = match &self.credentials {
            Credentials::Token(token) => Some(token.clone()),
            Credentials::Login { .. } => self.token.lock().await.clone(),
        };
        match current {
            Some(token) => self.probe(&token).await,
            None => Ok(TokenValidity::Missing),
        }
    }

    /// Mint a new token and replace the cached one.
    ///
    /// Always hits the login endpoint, whatever a probe would say. Fails
    /// with [`Error::Authentication`] when the API rejects the credentials
    /// or when the token was supplied externally.
    pub async fn refresh_token(&self) -> Result<SecretString, Error> {
        if self.is_externally_supplied() {
            return Err(Error::Authentication {
                message: "externally supplied token cannot be refreshed".into(),
            });
        }

        let mut cached = self.token.lock().await;
        let fresh = self.login().await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    // ── HTTP flows ───────────────────────────────────────────────────

    async fn probe(&self, token: &SecretString) -> Result<TokenValidity, Error> {
        let url = self.base_url.join(PROBE_PATH)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;

        let status = resp.status();
        let validity = if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            TokenValidity::Rejected
        } else if status.is_server_error() {
            warn!(%status, "token probe answered with a server error, validity unknown");
            TokenValidity::Unknown(status)
        } else {
            TokenValidity::Valid
        };
        Ok(validity)
    }

    /// `GET authentication/g?username=&password=` -- the body is the token.
    async fn login(&self) -> Result<SecretString, Error> {
        let Credentials::Login { username, password } = &self.credentials else {
            return Err(Error::Authentication {
                message: "externally supplied token cannot be refreshed".into(),
            });
        };

        let url = self.base_url.join(LOGIN_PATH)?;
        // The query carries the password, so only the path is logged.
        debug!(username = %username, "requesting access token at {}", url.path());

        let resp = self
            .http
            .get(url)
            .query(&[
                ("username", username.as_str()),
                ("password", password.expose_secret()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!(%status, "could not get an access token from the API");
            return Err(Error::Authentication {
                message: format!("login rejected (HTTP {status})"),
            });
        }
        if !status.is_success() {
            error!(%status, "unexpected response from the login endpoint");
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status})"),
            });
        }

        let token = resp.text().await?;
        debug!("access token acquired");
        Ok(SecretString::from(token))
    }
}

impl std::fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialManager")
            .field("base_url", &self.base_url.as_str())
            .field("externally_supplied", &self.is_externally_supplied())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rejection_and_absence_trigger_refresh() {
        assert!(TokenValidity::Rejected.needs_refresh());
        assert!(TokenValidity::Missing.needs_refresh());
        assert!(!TokenValidity::Valid.needs_refresh());
        assert!(!TokenValidity::Unknown(StatusCode::BAD_GATEWAY).needs_refresh());
    }

    #[test]
    fn token_credentials_are_externally_supplied() {
        let supplied = Credentials::Token(SecretString::from("tok-123"));
        let login = Credentials::Login {
            username: "ops".into(),
            password: SecretString::from("hunter2"),
        };
        assert!(supplied.is_externally_supplied());
        assert!(!login.is_externally_supplied());
    }
}
