//! Token validity check.

use serde::Serialize;

use aretas_core::{AretasClient, TokenValidity};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct TokenReport {
    source: &'static str,
    username: Option<String>,
    validity: String,
    valid: bool,
}

fn describe(validity: TokenValidity) -> (String, bool) {
    match validity {
        TokenValidity::Valid => ("valid".into(), true),
        TokenValidity::Rejected => ("rejected".into(), false),
        TokenValidity::Missing => ("missing".into(), false),
        TokenValidity::Unknown(status) => (format!("unknown (HTTP {})", status.as_u16()), false),
    }
}

pub async fn handle(client: &AretasClient, global: &GlobalOpts) -> Result<(), CliError> {
    let auth = client.auth();

    // Mint a token first so there is something to probe.
    if !auth.is_externally_supplied() {
        auth.get_token(false).await?;
    }
    let raw = auth.test_token().await?;
    let (validity, valid) = describe(raw);

    let report = TokenReport {
        source: if auth.is_externally_supplied() {
            "supplied"
        } else {
            "login"
        },
        username: auth.username().map(str::to_owned),
        validity,
        valid,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| {
            let user = r
                .username
                .as_deref()
                .map(|u| format!(" as {u}"))
                .unwrap_or_default();
            format!(
                "Token ({}{user}): {}",
                r.source,
                output::status_label(&r.validity, r.valid, color)
            )
        },
        |r| r.validity.clone(),
    );
    output::print_output(&out, global.quiet);

    match raw {
        TokenValidity::Valid => Ok(()),
        TokenValidity::Unknown(_) => Err(CliError::ApiError {
            message: format!("token validity could not be determined: {}", report.validity),
        }),
        TokenValidity::Rejected | TokenValidity::Missing => Err(CliError::AuthFailed {
            message: format!("token is {}", report.validity),
        }),
    }
}
