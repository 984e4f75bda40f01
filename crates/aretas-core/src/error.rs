// ── Core error types ──
//
// User-facing errors from aretas-core. Consumers see what went wrong in
// domain terms; the `From<aretas_api::Error>` impl translates transport
// and decode failures into these variants.

use thiserror::Error;

use aretas_api::WebServiceBoolean;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to the Aretas API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to the Aretas API timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    /// The API answered with a non-success status, so there is no data.
    #[error("The API returned no data for {resource}")]
    Unavailable { resource: String },

    #[error("Could not decode the API response: {message}")]
    Decode { message: String, body: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation rejected by the API: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity_type: impl Into<String>, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.to_string(),
        }
    }

    pub fn unavailable(resource: impl Into<String>) -> Self {
        Self::Unavailable {
            resource: resource.into(),
        }
    }
}

/// Turn a negative result envelope into [`CoreError::Rejected`].
pub fn ensure_success(envelope: WebServiceBoolean) -> Result<WebServiceBoolean, CoreError> {
    if envelope.is_success() {
        Ok(envelope)
    } else {
        Err(CoreError::Rejected {
            message: if envelope.message.is_empty() {
                "no reason given".into()
            } else {
                envelope.message
            },
        })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aretas_api::Error> for CoreError {
    fn from(err: aretas_api::Error) -> Self {
        match err {
            aretas_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            aretas_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            aretas_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid API URL: {e}"),
            },
            aretas_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS setup failed: {message}"),
            },
            aretas_api::Error::Deserialization { message, body } => {
                CoreError::Decode { message, body }
            }
            aretas_api::Error::Serialization(e) => CoreError::Internal(e.to_string()),
            aretas_api::Error::InvalidArgument(message) => CoreError::ValidationFailed { message },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn negative_envelope_becomes_rejection() {
        let err = ensure_success(WebServiceBoolean::failed("Failed to save alert")).unwrap_err();
        assert!(matches!(err, CoreError::Rejected { ref message } if message == "Failed to save alert"));

        let err = ensure_success(WebServiceBoolean::failed("")).unwrap_err();
        assert!(matches!(err, CoreError::Rejected { ref message } if message == "no reason given"));

        assert!(ensure_success(WebServiceBoolean::new(true, "ok")).is_ok());
    }

    #[test]
    fn api_errors_map_to_domain_variants() {
        let err: CoreError = aretas_api::Error::InvalidArgument("X and Y".into()).into();
        assert!(matches!(err, CoreError::ValidationFailed { .. }));

        let err: CoreError = aretas_api::Error::Authentication {
            message: "login rejected".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Authentication failed: login rejected");
    }
}
