//! CLI configuration: thin wrapper around `aretas_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --token, etc.).

use std::time::Duration;

use secrecy::SecretString;

use aretas_config::SecretSources;
use aretas_core::{ClientConfig, Credentials, TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use aretas_config::{Config, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Comma-separated profile names for diagnostics.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, global, cfg);
    }

    // An explicitly named profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    }

    // No profile found -- build from CLI flags / env vars alone
    let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let base_url = aretas_config::parse_api_url(url_str)?;

    let credentials = match global.token {
        Some(ref token) => Credentials::Token(SecretString::from(token.clone())),
        None => {
            let bare = Profile {
                api_url: url_str.to_owned(),
                ..Profile::default()
            };
            aretas_config::resolve_credentials(&bare, &profile_name, &SecretSources::system())?
        }
    };

    let tls = if global.insecure || cfg.defaults.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };

    Ok(ClientConfig {
        base_url,
        credentials,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        },
    })
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<ClientConfig, CliError> {
    // 1. API URL (flag > env > profile)
    let url_str = global.api_url.as_deref().unwrap_or(&profile.api_url);
    let base_url = aretas_config::parse_api_url(url_str)?;

    // 2. Credentials (flag token > profile chain)
    let credentials = match global.token {
        Some(ref token) => Credentials::Token(SecretString::from(token.clone())),
        None => aretas_config::resolve_credentials(profile, profile_name, &SecretSources::system())?,
    };

    // 3. Transport
    let mut transport = aretas_config::profile_transport(profile, &cfg.defaults);
    if global.insecure {
        transport.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        transport.timeout = Duration::from_secs(secs);
    }

    Ok(ClientConfig {
        base_url,
        credentials,
        transport,
    })
}
