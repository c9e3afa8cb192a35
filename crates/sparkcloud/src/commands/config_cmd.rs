//! Config subcommand handlers.

use std::collections::HashMap;

use dialoguer::{Input, Select};
use secrecy::SecretString;

use sparkcloud_core::{AuthCredentials, Cloud, DEFAULT_API_URL};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        for secret in [
            &mut profile.password,
            &mut profile.access_token,
            &mut profile.client_secret,
        ] {
            if secret.is_some() {
                *secret = Some(MASK.into());
            }
        }
    }
    cfg
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    profile_name: &str,
    kind: &str,
    label: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {label}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        sparkcloud_config::store_secret(profile_name, kind, secret)?;
        eprintln!("   ✓ {label} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

fn read_secret(prompt: &str, field: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "value cannot be empty".into(),
        });
    }
    Ok(secret)
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("sparkcloud configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Profile name
            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Cloud URL
            let api_url: String = Input::new()
                .with_prompt("Cloud API URL")
                .default(DEFAULT_API_URL.into())
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Credentials
            let auth_choices = &[
                "Log in now and keep the access token (recommended)",
                "Paste an existing access token",
                "Keep username and password (log in on every run)",
            ];
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

            match auth_selection {
                0 => {
                    let username: String = Input::new()
                        .with_prompt("Username")
                        .interact_text()
                        .map_err(prompt_err)?;
                    let password = read_secret("Password: ", "password")?;

                    let auth = AuthCredentials::Password {
                        username: username.clone(),
                        password: SecretString::from(password),
                    };
                    let cloud_config =
                        config::cloud_config_with_auth(&profile, &Defaults::default(), global, auth)?;
                    let cloud = Cloud::new(cloud_config)
                        .await
                        .map_err(|e| CliError::from(e).for_profile(&profile_name))?;

                    profile.username = Some(username);
                    profile.access_token = prompt_keyring_storage(
                        cloud.access_token(),
                        &profile_name,
                        "access-token",
                        "access token",
                    )?;
                }
                1 => {
                    let token = read_secret("Access token: ", "access_token")?;
                    profile.access_token =
                        prompt_keyring_storage(&token, &profile_name, "access-token", "access token")?;
                }
                _ => {
                    let username: String = Input::new()
                        .with_prompt("Username")
                        .interact_text()
                        .map_err(prompt_err)?;
                    let password = read_secret("Password: ", "password")?;
                    profile.username = Some(username);
                    profile.password =
                        prompt_keyring_storage(&password, &profile_name, "password", "password")?;
                }
            }

            // 4. Build and write config
            let mut profiles = HashMap::new();
            profiles.insert(profile_name.clone(), profile);

            let cfg = Config {
                default_profile: Some(profile_name.clone()),
                defaults: Defaults::default(),
                profiles,
            };
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: sparkcloud devices list");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let document = sparkcloud_config::render_config(&cfg)?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| document.clone(),
                |_| config::config_path().display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile, plaintext } => {
            let mut cfg = config::load_config()?;
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let token = read_secret("Access token: ", "access_token")?;
            let entry = cfg.profiles.entry(profile_name.clone()).or_default();
            if plaintext {
                entry.access_token = Some(token);
            } else {
                sparkcloud_config::store_secret(&profile_name, "access-token", &token)?;
            }
            config::save_config(&cfg)?;

            eprintln!("✓ Access token stored for profile '{profile_name}'");
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn redaction_masks_every_secret() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                username: Some("me@example.com".into()),
                password: Some("hunter2".into()),
                access_token: Some("abc123".into()),
                ..Profile::default()
            },
        );

        let shown = sparkcloud_config::render_config(&redacted(&cfg)).unwrap();

        assert!(shown.contains("username = \"me@example.com\""));
        assert!(shown.contains("password = \"****\""));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("abc123"));
    }
}
