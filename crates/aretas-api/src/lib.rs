// aretas-api: Async Rust client for the Aretas sensor network REST API

pub mod auth;
pub mod error;
pub mod models;
pub mod rest;
pub mod transport;

pub use auth::{CredentialManager, Credentials, TokenValidity};
pub use error::Error;
pub use models::WebServiceBoolean;
pub use rest::{AretasClient, ClientConfig};
pub use transport::{TlsMode, TransportConfig};
