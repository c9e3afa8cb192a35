//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use sparkcloud_config::ConfigError;
use sparkcloud_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNAVAILABLE: i32 = 5;
    pub const AMBIGUOUS: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the cloud at {url}")]
    #[diagnostic(
        code(sparkcloud::connection_failed),
        help(
            "Check your network connection and the profile's api_url.\n\
             Self-hosted clouds with private certificates: use --insecure (-k) or set ca_cert."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(sparkcloud::timeout),
        help("Increase the timeout with --timeout, or check that the device is online.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(sparkcloud::auth_failed),
        help(
            "Log in again with: sparkcloud login --profile {profile}\n\
             Or store a fresh token with: sparkcloud config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(sparkcloud::no_credentials),
        help(
            "Run: sparkcloud login\n\
             Or pass --access-token / set SPARKCLOUD_ACCESS_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Devices ──────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(sparkcloud::not_found),
        help("Run: sparkcloud {list_command} to see what is available")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Device name '{name}' matches several devices")]
    #[diagnostic(
        code(sparkcloud::ambiguous_device),
        help("Address the device by ID instead: {ids}")
    )]
    AmbiguousDevice { name: String, ids: String },

    #[error("Device '{device}' is not connected")]
    #[diagnostic(
        code(sparkcloud::device_offline),
        help("'{operation}' needs the device online. Check `sparkcloud devices list`.")
    )]
    DeviceOffline { device: String, operation: String },

    // ── Cloud ────────────────────────────────────────────────────────
    #[error("Cloud error ({code}): {message}")]
    #[diagnostic(code(sparkcloud::cloud_error))]
    CloudError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sparkcloud::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(sparkcloud::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: sparkcloud config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(sparkcloud::config))]
    Config(Box<figment::Error>),

    #[error("Could not save configuration: {0}")]
    #[diagnostic(code(sparkcloud::config_write))]
    ConfigWrite(String),

    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(sparkcloud::keyring),
        help("Use --plaintext (config set-token) or --store config (login) when no keyring is available.")
    )]
    Keyring(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(sparkcloud::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(sparkcloud::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::AmbiguousDevice { .. } => exit_code::AMBIGUOUS,
            Self::DeviceOffline { .. } => exit_code::UNAVAILABLE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to authentication failures.
    pub fn for_profile(self, profile_name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                profile: profile_name.to_owned(),
                message,
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Authentication { message } => CliError::AuthFailed {
                profile: "default".into(),
                message,
            },

            CoreError::CloudRequest {
                message,
                status: Some(401),
                ..
            } => CliError::AuthFailed {
                profile: "default".into(),
                message,
            },

            CoreError::CloudRequest {
                message,
                code,
                status,
            } => CliError::CloudError {
                code: code
                    .or_else(|| status.map(|s| format!("HTTP {s}")))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::DeviceUnavailable { device, operation } => {
                CliError::DeviceOffline { device, operation }
            }

            CoreError::UnknownDevice { name } => CliError::NotFound {
                resource_type: "Device".into(),
                identifier: name,
                list_command: "devices list".into(),
            },

            CoreError::AmbiguousDevice { name, ids } => CliError::AmbiguousDevice {
                name,
                ids: ids.join(", "),
            },

            CoreError::UnknownOperation { device, name } => CliError::NotFound {
                resource_type: "Function or variable".into(),
                identifier: name,
                list_command: format!("devices get {device}"),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::CloudError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Keyring(e) => CliError::Keyring(e.to_string()),
            ConfigError::Serialization(e) => CliError::ConfigWrite(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_cloud_request_is_an_auth_failure() {
        let err = CliError::from(CoreError::CloudRequest {
            message: "invalid_token: The access token provided is invalid.".into(),
            code: Some("invalid_token".into()),
            status: Some(401),
        })
        .for_profile("lab");

        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(matches!(err, CliError::AuthFailed { ref profile, .. } if profile == "lab"));
    }

    #[test]
    fn device_errors_get_distinct_exit_codes() {
        let offline = CliError::from(CoreError::DeviceUnavailable {
            device: "sleepy_otter".into(),
            operation: "digitalwrite".into(),
        });
        let ambiguous = CliError::from(CoreError::AmbiguousDevice {
            name: "kitchen".into(),
            ids: vec!["aaa".into(), "bbb".into()],
        });
        let unknown = CliError::from(CoreError::UnknownOperation {
            device: "captain_hamster".into(),
            name: "self_destruct".into(),
        });

        assert_eq!(offline.exit_code(), exit_code::UNAVAILABLE);
        assert_eq!(ambiguous.exit_code(), exit_code::AMBIGUOUS);
        assert_eq!(unknown.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn cloud_error_falls_back_to_status_code() {
        let err = CliError::from(CoreError::CloudRequest {
            message: "Bad Gateway".into(),
            code: None,
            status: Some(502),
        });
        assert_eq!(err.to_string(), "Cloud error (HTTP 502): Bad Gateway");
    }
}
