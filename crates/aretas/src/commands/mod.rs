//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod alerts;
pub mod classifiers;
pub mod config_cmd;
pub mod data;
pub mod geo;
pub mod locations;
pub mod token;
pub mod util;

use aretas_core::AretasClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &AretasClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Alerts(args) => alerts::handle(client, args, global).await,
        Command::Locations(args) => locations::handle(client, args, global).await,
        Command::Classifiers(args) => classifiers::handle(client, args, global).await,
        Command::Geo(args) => geo::handle(client, args, global).await,
        Command::Data(args) => data::handle(client, args, global).await,
        Command::Token => token::handle(client, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "does not talk to the API".into(),
        }),
    }
}
