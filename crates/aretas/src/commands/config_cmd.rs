//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for a secret and reject empty input.
fn prompt_secret(label: &str, field: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(label).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Ask whether a secret goes to the keyring. `true` means keyring.
fn prefer_keyring(what: &str) -> Result<bool, CliError> {
    let choices = &[
        format!("Store {what} in system keyring (recommended)"),
        "Save to config file (plaintext)".to_owned(),
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {what}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    Ok(selection == 0)
}

/// Table view of the config with secrets masked.
fn describe_config(cfg: &Config) -> String {
    let mut out = String::new();
    let default = cfg.default_profile.as_deref().unwrap_or("default");
    let _ = writeln!(out, "Config file: {}", config::config_path().display());
    let _ = writeln!(out, "Default profile: {default}");
    let _ = writeln!(
        out,
        "Defaults: output={}, insecure={}, timeout={}s",
        cfg.defaults.output, cfg.defaults.insecure, cfg.defaults.timeout
    );

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let Some(p) = cfg.profiles.get(name) else {
            continue;
        };
        let _ = writeln!(out, "\n[{name}]");
        let _ = writeln!(out, "  api_url:  {}", p.api_url);
        if let Some(ref user) = p.username {
            let _ = writeln!(out, "  username: {user}");
        }
        let secret = match (&p.token, &p.token_env, &p.password, &p.password_env) {
            (Some(_), ..) => "token (plaintext)".to_owned(),
            (None, Some(env), ..) => format!("token from ${env}"),
            (None, None, Some(_), _) => "password (plaintext)".to_owned(),
            (None, None, None, Some(env)) => format!("password from ${env}"),
            (None, None, None, None) => "keyring or environment".to_owned(),
        };
        let _ = writeln!(out, "  secret:   {secret}");
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "  ca_cert:  {}", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "  insecure: {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "  timeout:  {timeout}s");
        }
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("Aretas CLI configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. API URL
            let api_url: String = Input::new()
                .with_prompt("API URL (e.g. https://<host>/rest/)")
                .validate_with(|input: &String| -> Result<(), String> {
                    aretas_config::parse_api_url(input)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Auth method
            let auth_choices = &["Username/Password", "Pre-issued bearer token"];
            let auth_selection = Select::new()
                .with_prompt("Authentication method")
                .items(auth_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile {
                api_url,
                ..Profile::default()
            };

            if auth_selection == 0 {
                let user: String = Input::new()
                    .with_prompt("Username")
                    .interact_text()
                    .map_err(prompt_err)?;
                let pass = prompt_secret("Password: ", "password")?;
                profile.username = Some(user);

                if prefer_keyring("password")? {
                    aretas_config::store_password(&profile_name, &pass)?;
                    eprintln!("   Password stored in system keyring");
                } else {
                    profile.password = Some(pass);
                }
            } else {
                let token = prompt_secret("Bearer token: ", "token")?;
                if prefer_keyring("token")? {
                    aretas_config::store_token(&profile_name, &token)?;
                    eprintln!("   Token stored in system keyring");
                } else {
                    profile.token = Some(token);
                }
            }

            // 4. Merge into the existing config
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: aretas token");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = aretas_config::load_config()?;
            let out = output::render_single(&global.output, &cfg, describe_config, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: aretas config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if *name == active { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile, token } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name: profile_name,
                });
            }

            if token {
                let secret = prompt_secret("Bearer token: ", "token")?;
                aretas_config::store_token(&profile_name, &secret)?;
            } else {
                let secret = prompt_secret("Password: ", "password")?;
                aretas_config::store_password(&profile_name, &secret)?;
            }

            eprintln!("Secret stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}
