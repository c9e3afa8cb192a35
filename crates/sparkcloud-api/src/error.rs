use thiserror::Error;

/// Top-level error type for the `sparkcloud-api` crate.
///
/// Covers every failure mode of the cloud REST surface: authentication,
/// transport, application-level error payloads, and decoding.
/// `sparkcloud-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token exchange rejected (bad credentials, unknown client, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Base URL cannot carry path segments (e.g. `mailto:` or `data:`).
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Cloud API ───────────────────────────────────────────────────
    /// Error reported by the cloud, either through a non-2xx status or an
    /// `ok: false` / `error` payload. `message` is `"{error}: {error_description}"`.
    #[error("Cloud API error (HTTP {status}): {message}")]
    CloudApi {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the cloud rejected the access token or credentials.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::CloudApi { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::CloudApi { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Extract the cloud's `error` code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::CloudApi { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
