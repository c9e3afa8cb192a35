//! Shared configuration for sparkcloud consumers.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `sparkcloud_core::CloudConfig`. The CLI adds
//! flag-aware wrappers on top.

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

use sparkcloud_core::{
    AuthCredentials, ClientCredentials, CloudConfig, DEFAULT_API_URL, DEFAULT_CACHE_TTL,
    DetailFailurePolicy, TlsVerification,
};

/// Service name under which secrets live in the system keyring.
pub const KEYRING_SERVICE: &str = "sparkcloud";

/// Prefix for environment overrides (`SPARKCLOUD_DEFAULTS__TIMEOUT=5`).
pub const ENV_PREFIX: &str = "SPARKCLOUD_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

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
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named cloud account profiles.
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

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Device directory cache window (humantime, e.g. "10s", "2m").
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: String,

    #[serde(default)]
    pub detail_failure: DetailFailurePolicy,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            cache_ttl: default_cache_ttl(),
            detail_failure: DetailFailurePolicy::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_cache_ttl() -> String {
    humantime::format_duration(DEFAULT_CACHE_TTL).to_string()
}
fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

/// A named cloud account profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Cloud base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account login for the password grant.
    pub username: Option<String>,

    /// Password (plaintext; prefer keyring).
    pub password: Option<String>,

    /// Access token (plaintext; prefer keyring or env var).
    pub access_token: Option<String>,

    /// Environment variable name containing the access token.
    pub access_token_env: Option<String>,

    /// OAuth client id presented on login.
    pub client_id: Option<String>,

    /// OAuth client secret presented on login.
    pub client_secret: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override cache window (humantime).
    pub cache_ttl: Option<String>,

    /// Override detail-failure handling.
    pub detail_failure: Option<DetailFailurePolicy>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            username: None,
            password: None,
            access_token: None,
            access_token_env: None,
            client_id: None,
            client_secret: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            cache_ttl: None,
            detail_failure: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "sparkcloud", "sparkcloud").map_or_else(
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
    p.push("sparkcloud");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render_config(cfg)?)?;
    Ok(())
}

/// Render config as the TOML document `save_config` would write.
pub fn render_config(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Keyring account name for a profile's secret (`"{profile}/{kind}"`).
pub fn keyring_account(profile_name: &str, kind: &str) -> String {
    format!("{profile_name}/{kind}")
}

/// Store a secret (`"access-token"`, `"password"`) for a profile.
pub fn store_secret(profile_name: &str, kind: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name, kind))?;
    entry.set_password(secret)?;
    Ok(())
}

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_account(profile_name, kind)).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an access token from the credential chain (no CLI flag step).
pub fn resolve_access_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's access_token_env → env var lookup
    if let Some(ref env_name) = profile.access_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Some(secret) = keyring_secret(profile_name, "access-token") {
        return Some(secret);
    }

    // 3. Plaintext in config
    profile
        .access_token
        .as_ref()
        .map(|token| SecretString::from(token.clone()))
}

/// Resolve username + password without CLI flags.
pub fn resolve_password_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("SPARKCLOUD_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("SPARKCLOUD_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Some(pw) = keyring_secret(profile_name, "password") {
        return Ok((username, pw));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials`: a stored token wins, otherwise the password grant.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    if let Some(token) = resolve_access_token(profile, profile_name) {
        return Ok(AuthCredentials::AccessToken(token));
    }
    let (username, password) = resolve_password_credentials(profile, profile_name)?;
    Ok(AuthCredentials::Password { username, password })
}

// ── Profile translation ─────────────────────────────────────────────

/// Parse a humantime duration ("10s", "1m 30s", "0s").
pub fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("'{value}' is not a duration: {e}"),
    })
}

/// Parse and validate a cloud base URL.
pub fn parse_api_url(value: &str) -> Result<url::Url, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {value}"),
    })
}

/// OAuth client for a profile, falling back to the public `spark` client.
pub fn oauth_client(profile: &Profile) -> ClientCredentials {
    let defaults = ClientCredentials::default();
    match (&profile.client_id, &profile.client_secret) {
        (None, None) => defaults,
        (id, secret) => ClientCredentials::new(
            id.clone().unwrap_or(defaults.id),
            secret
                .clone()
                .unwrap_or_else(|| ClientCredentials::DEFAULT_SECRET.into()),
        ),
    }
}

/// TLS strategy for a profile (insecure wins over a custom CA).
pub fn tls_verification(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `CloudConfig` from a profile and global defaults, no CLI overrides.
pub fn profile_to_cloud_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<CloudConfig, ConfigError> {
    let api_url = parse_api_url(&profile.api_url)?;
    let auth = resolve_auth(profile, profile_name)?;

    let cache_ttl = parse_duration(
        "cache_ttl",
        profile.cache_ttl.as_deref().unwrap_or(&defaults.cache_ttl),
    )?;

    Ok(CloudConfig {
        api_url,
        auth,
        oauth_client: oauth_client(profile),
        tls: tls_verification(profile, defaults),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        cache_ttl,
        detail_failure: profile.detail_failure.unwrap_or(defaults.detail_failure),
    })
}
