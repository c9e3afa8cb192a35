//! `login` handler: password grant, then keep the token.

use dialoguer::Input;
use secrecy::SecretString;
use tracing::debug;

use sparkcloud_core::{AuthCredentials, Cloud};

use crate::cli::{GlobalOpts, LoginArgs, TokenStore};
use crate::config::{self, Profile};
use crate::error::CliError;

use super::util::prompt_err;

/// Password from `SPARKCLOUD_PASSWORD`, otherwise an interactive prompt.
fn read_password() -> Result<String, CliError> {
    if let Ok(pw) = std::env::var("SPARKCLOUD_PASSWORD") {
        return Ok(pw);
    }
    rpassword::prompt_password("Password: ").map_err(prompt_err)
}

pub async fn handle(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // Writes back to the file, so a config that fails to parse must stop here.
    let mut cfg = match args.store {
        TokenStore::None => config::load_config_or_default(),
        TokenStore::Keyring | TokenStore::Config => config::load_config()?,
    };
    let profile_name = config::active_profile_name(global, &cfg);
    let existing = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();

    let username = match args.username.or_else(|| existing.username.clone()) {
        Some(username) => username,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = read_password()?;
    if username.is_empty() || password.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    let mut profile = Profile {
        username: Some(username.clone()),
        ..existing
    };
    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }

    let auth = AuthCredentials::Password {
        username,
        password: SecretString::from(password),
    };
    let cloud_config = config::cloud_config_with_auth(&profile, &cfg.defaults, global, auth)?;

    let cloud = Cloud::new(cloud_config)
        .await
        .map_err(|e| CliError::from(e).for_profile(&profile_name))?;
    let token = cloud.access_token().to_owned();
    debug!(profile = %profile_name, "login succeeded");

    match args.store {
        TokenStore::None => {
            println!("{token}");
            return Ok(());
        }
        TokenStore::Keyring => {
            sparkcloud_config::store_secret(&profile_name, "access-token", &token)?;
            profile.access_token = None;
        }
        TokenStore::Config => {
            profile.access_token = Some(token);
        }
    }

    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    }
    config::save_config(&cfg)?;

    if !global.quiet {
        eprintln!("✓ Logged in; token stored for profile '{profile_name}'");
    }
    Ok(())
}
