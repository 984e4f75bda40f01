use thiserror::Error;

/// Top-level error type for the `aretas-api` crate.
///
/// Only failures the caller cannot reasonably treat as "no data" end up
/// here. A remote endpoint answering with a non-200 status is not an error:
/// the endpoint methods surface it as `None`, `false`, or a failed
/// [`WebServiceBoolean`](crate::WebServiceBoolean) envelope.
/// `aretas-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Minting a bearer token failed (wrong credentials, account locked,
    /// or an externally supplied token that cannot be refreshed).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A single-object response could not be decoded, with the raw body
    /// for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// An outbound payload could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The caller passed arguments the endpoint cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if this error came from the token login flow.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a transient network error worth retrying
    /// at a higher level. The client itself never retries these.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Build a [`Deserialization`](Self::Deserialization) error with a short
    /// body preview in the message.
    pub(crate) fn decode(err: &serde_json::Error, body: &[u8]) -> Self {
        let body = String::from_utf8_lossy(body).into_owned();
        let preview: String = body.chars().take(200).collect();
        Self::Deserialization {
            message: format!("{err} (body preview: {preview:?})"),
            body,
        }
    }
}
