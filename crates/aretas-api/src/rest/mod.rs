// Endpoint groups for the Aretas REST API
//
// Each submodule adds inherent methods to `AretasClient` for one resource
// family. All of them go through the authenticated-call protocol in `call`.

mod alert_history;
mod alerts;
mod building_maps;
pub(crate) mod call;
mod classifiers;
pub mod client;
mod geo;
mod locations;
mod probability;
mod sensor_data;

pub use classifiers::DEFAULT_RECORD_LIMIT;
pub use client::{AretasClient, ClientConfig};
