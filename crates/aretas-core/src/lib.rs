// aretas-core: Domain helpers on top of the Aretas API client
//
// Cached location lookups, alert-history enrichment, and labelled-data
// reshaping. API errors are mapped into `CoreError` at this boundary.

pub mod alert_history;
pub mod directory;
pub mod error;
pub mod labelled;

pub use alert_history::{
    ANALYTICS_HALF_WINDOW_MS, DismissParams, EnrichedAlertHistory, enrich_alert_history,
    fetch_enriched_alert_history,
};
pub use directory::{DEFAULT_ACTIVE_WINDOW_MS, LocationDirectory};
pub use error::{CoreError, ensure_success};
pub use labelled::{labelled_columns, reshape_labelled};

// Re-exported so consumers configure a client without depending on
// aretas-api directly.
pub use aretas_api::Error as ApiError;
pub use aretas_api::{
    AretasClient, ClientConfig, Credentials, TlsMode, TokenValidity, TransportConfig,
    WebServiceBoolean, models,
};
