//! Shared configuration for Aretas tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `aretas_core::ClientConfig`. The CLI layers its
//! global flags on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use aretas_core::{ClientConfig, Credentials, TlsMode, TransportConfig};

/// Keyring service name under which secrets are stored.
pub const KEYRING_SERVICE: &str = "aretas";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named API profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the explicit one, else the configured
    /// default, else `"default"`.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named API profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API root URL (e.g., "https://iot.aretas.ca/rest/").
    pub api_url: String,

    /// Username used to mint bearer tokens.
    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Pre-issued bearer token (plaintext -- prefer keyring or env var).
    /// A token is used as-is and never refreshed.
    pub token: Option<String>,

    /// Environment variable name containing a bearer token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("ca", "aretas", "aretas").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aretas");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from `path`, with `ARETAS_*` environment overrides.
///
/// Nested keys use a double underscore: `ARETAS_DEFAULTS__TIMEOUT=60`.
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ARETAS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(&path, cfg)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str, key: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{key}"),
    )?)
}

fn keyring_secret(profile_name: &str, key: &str) -> Option<SecretString> {
    let entry = keyring_entry(profile_name, key).ok()?;
    match entry.get_password() {
        Ok(secret) => Some(SecretString::from(secret)),
        Err(e) => {
            debug!(profile = profile_name, key, error = %e, "no keyring secret");
            None
        }
    }
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "password")?.set_password(password)?;
    Ok(())
}

/// Store a profile's bearer token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "token")?.set_password(token)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Where secrets may come from, in the order they are consulted.
pub struct SecretSources<'a> {
    /// Environment lookup.
    pub env: &'a dyn Fn(&str) -> Option<String>,
    /// Whether the system keyring is consulted.
    pub keyring: bool,
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl SecretSources<'static> {
    /// The process environment plus the system keyring.
    pub fn system() -> Self {
        Self {
            env: &process_env,
            keyring: true,
        }
    }
}

/// Resolve a bearer token: `token_env` → keyring → plaintext.
pub fn resolve_token(
    profile: &Profile,
    profile_name: &str,
    sources: &SecretSources<'_>,
) -> Option<SecretString> {
    if let Some(val) = profile.token_env.as_deref().and_then(|name| (sources.env)(name)) {
        return Some(SecretString::from(val));
    }
    if sources.keyring {
        if let Some(secret) = keyring_secret(profile_name, "token") {
            return Some(secret);
        }
    }
    profile.token.clone().map(SecretString::from)
}

/// Resolve login credentials. The username comes from the profile or
/// `ARETAS_USERNAME`; the password from `password_env` (or
/// `ARETAS_PASSWORD`) → keyring → plaintext.
pub fn resolve_login(
    profile: &Profile,
    profile_name: &str,
    sources: &SecretSources<'_>,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| (sources.env)("ARETAS_USERNAME"))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    let env_name = profile.password_env.as_deref().unwrap_or("ARETAS_PASSWORD");
    if let Some(pw) = (sources.env)(env_name) {
        return Ok((username, SecretString::from(pw)));
    }

    // 2. Keyring
    if sources.keyring {
        if let Some(pw) = keyring_secret(profile_name, "password") {
            return Ok((username, pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// A token, when one resolves, wins over login credentials.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    sources: &SecretSources<'_>,
) -> Result<Credentials, ConfigError> {
    if let Some(token) = resolve_token(profile, profile_name, sources) {
        return Ok(Credentials::Token(token));
    }
    let (username, password) = resolve_login(profile, profile_name, sources)?;
    Ok(Credentials::Login { username, password })
}

/// Parse and validate a profile's API URL.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

/// Transport settings for a profile, falling back to `defaults`.
pub fn profile_transport(profile: &Profile, defaults: &Defaults) -> TransportConfig {
    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    TransportConfig {
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    }
}

/// Build a `ClientConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    sources: &SecretSources<'_>,
) -> Result<ClientConfig, ConfigError> {
    Ok(ClientConfig {
        base_url: parse_api_url(&profile.api_url)?,
        credentials: resolve_credentials(profile, profile_name, sources)?,
        transport: profile_transport(profile, defaults),
    })
}
