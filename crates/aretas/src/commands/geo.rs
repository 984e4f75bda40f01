//! Geo utility command handlers.

use serde::Serialize;

use aretas_core::AretasClient;
use aretas_core::models::LatLng;

use crate::cli::{GeoArgs, GeoCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct TimezoneAnswer {
    lat: f64,
    lon: f64,
    timezone: String,
}

fn print_coordinates(coords: &LatLng, global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        coords,
        |c| format!("Latitude:  {}\nLongitude: {}", c.lat, c.lng),
        |c| format!("{},{}", c.lat, c.lng),
    );
    output::print_output(&out, global.quiet);
}

pub async fn handle(client: &AretasClient, args: GeoArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        GeoCommand::Geocode { query } => {
            let coords = util::require(client.geocode(&query).await?, "geocode")?;
            print_coordinates(&coords, global);
            Ok(())
        }

        GeoCommand::Ip => {
            let ip = util::require(client.client_ip().await?, "client IP")?;
            let out = output::render_single(&global.output, &ip, String::clone, String::clone);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GeoCommand::Locate => {
            let coords = util::require(client.client_location().await?, "client location")?;
            print_coordinates(&coords, global);
            Ok(())
        }

        GeoCommand::Timezone { lat, lon } => {
            let timezone = util::require(client.timezone_id(lat, lon).await?, "timezone")?;
            let answer = TimezoneAnswer { lat, lon, timezone };
            let out = output::render_single(
                &global.output,
                &answer,
                |a| a.timezone.clone(),
                |a| a.timezone.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
