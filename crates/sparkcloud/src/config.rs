//! CLI configuration: thin wrapper around `sparkcloud_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --access-token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use sparkcloud_core::{AuthCredentials, CloudConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use sparkcloud_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Build a `CloudConfig` from the config file, active profile and flags.
///
/// An explicitly requested profile must exist. Without one, a missing
/// default profile is fine as long as flags or env supply credentials.
pub fn build_cloud_config(global: &GlobalOpts) -> Result<(CloudConfig, String), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    let config = resolve_profile(&profile, &profile_name, &cfg.defaults, global)?;
    Ok((config, profile_name))
}

/// Translate a `Profile` + global flags into a `CloudConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<CloudConfig, CliError> {
    // Credentials (flag > profile chain)
    let auth = match global.access_token {
        Some(ref token) => AuthCredentials::AccessToken(SecretString::from(token.clone())),
        None => sparkcloud_config::resolve_auth(profile, profile_name)?,
    };
    cloud_config_with_auth(profile, defaults, global, auth)
}

/// Everything but credentials from profile + flags; `auth` is used as given.
pub fn cloud_config_with_auth(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
    auth: AuthCredentials,
) -> Result<CloudConfig, CliError> {
    // 1. Base URL (flag > env > profile)
    let api_url =
        sparkcloud_config::parse_api_url(global.api_url.as_deref().unwrap_or(&profile.api_url))?;

    // 2. TLS verification
    let tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        sparkcloud_config::tls_verification(profile, defaults)
    };

    // 3. Timeouts and cache
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );
    let cache_ttl = sparkcloud_config::parse_duration(
        "cache_ttl",
        profile.cache_ttl.as_deref().unwrap_or(&defaults.cache_ttl),
    )?;

    Ok(CloudConfig {
        api_url,
        auth,
        oauth_client: sparkcloud_config::oauth_client(profile),
        tls,
        timeout,
        cache_ttl,
        detail_failure: profile.detail_failure.unwrap_or(defaults.detail_failure),
    })
}
