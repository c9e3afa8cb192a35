// ── Core error types ──
//
// User-facing errors from sparkcloud-core. Consumers never see HTTP
// status codes or JSON parse failures directly: the
// `From<sparkcloud_api::Error>` impl translates transport-layer errors into
// domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Cloud requests ───────────────────────────────────────────────
    /// Non-2xx status or an error payload on list/detail/invoke/read.
    #[error("Cloud request failed: {message}")]
    CloudRequest {
        message: String,
        /// The cloud's `error` field (e.g., "invalid_token").
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Cannot reach the cloud at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Cloud request timed out")]
    Timeout,

    // ── Device errors ────────────────────────────────────────────────
    #[error("{device}.{operation} is not available: the device is not connected")]
    DeviceUnavailable { device: String, operation: String },

    #[error("Device not found: {name}")]
    UnknownDevice { name: String },

    #[error("Device name '{name}' is shared by several devices: {}", ids.join(", "))]
    AmbiguousDevice { name: String, ids: Vec<String> },

    #[error("Device '{device}' has no field, function or variable named '{name}'")]
    UnknownOperation { device: String, name: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` for the not-found family (device or member).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownDevice { .. } | Self::UnknownOperation { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sparkcloud_api::Error> for CoreError {
    fn from(err: sparkcloud_api::Error) -> Self {
        match err {
            sparkcloud_api::Error::Authentication { message } => {
                CoreError::Authentication { message }
            }
            sparkcloud_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| format!("{}://{}", u.scheme(), u.authority()))
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::CloudRequest {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            sparkcloud_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            sparkcloud_api::Error::InvalidBaseUrl(url) => CoreError::Config {
                message: format!("Invalid base URL: {url}"),
            },
            sparkcloud_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            sparkcloud_api::Error::CloudApi {
                message,
                code,
                status,
            } => CoreError::CloudRequest {
                message,
                code,
                status: Some(status),
            },
            sparkcloud_api::Error::Deserialization { message, body: _ } => {
                CoreError::CloudRequest {
                    message: format!("unexpected response: {message}"),
                    code: None,
                    status: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloud_api_error_keeps_message_and_code() {
        let err: CoreError = sparkcloud_api::Error::CloudApi {
            message: "invalid_token: The access token provided is invalid.".into(),
            code: Some("invalid_token".into()),
            status: 401,
        }
        .into();

        assert!(matches!(
            &err,
            CoreError::CloudRequest { code: Some(code), status: Some(401), .. } if code == "invalid_token"
        ));
        assert!(err.to_string().contains("The access token provided is invalid."));
    }

    #[test]
    fn ambiguous_device_lists_ids() {
        let err = CoreError::AmbiguousDevice {
            name: "kitchen".into(),
            ids: vec!["aaa".into(), "bbb".into()],
        };
        assert_eq!(
            err.to_string(),
            "Device name 'kitchen' is shared by several devices: aaa, bbb"
        );
    }
}
