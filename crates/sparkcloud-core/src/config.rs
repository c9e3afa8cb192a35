// ── Runtime cloud configuration ──
//
// These types describe *how* to reach the device cloud. They carry
// credential data and tuning, but never touch disk. The CLI (or any other
// consumer) constructs a `CloudConfig` and hands it to `Cloud::new`.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use url::Url;

pub use sparkcloud_api::ClientCredentials;

/// Production endpoint of the device cloud.
pub const DEFAULT_API_URL: &str = "https://api.particle.io";

/// How long a fetched device directory is served before refetching.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10);

/// How to authenticate with the cloud.
///
/// Exactly one form is supplied; after `Cloud::new` resolves it, only the
/// access token is kept.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Exchange these for a token via the password grant.
    Password {
        username: String,
        password: SecretString,
    },
    /// Use an existing access token; no login call is made.
    AccessToken(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Additional CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification.
    DangerAcceptInvalid,
}

/// What a directory refresh does when a connected device's detail call fails.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DetailFailurePolicy {
    /// Fail the whole refresh with the detail error.
    #[default]
    Abort,
    /// Keep the device with empty functions and variables, log a warning.
    Degrade,
}

/// Configuration for one cloud account session.
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Cloud base URL (e.g., `https://api.particle.io`).
    pub api_url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// OAuth client presented on the token endpoint.
    pub oauth_client: ClientCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Device directory cache window.
    pub cache_ttl: Duration,
    /// Detail-fetch failure handling during a directory refresh.
    pub detail_failure: DetailFailurePolicy,
}

impl CloudConfig {
    /// Config with default tuning for the given endpoint and credentials.
    pub fn new(api_url: Url, auth: AuthCredentials) -> Self {
        Self {
            api_url,
            auth,
            oauth_client: ClientCredentials::default(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            cache_ttl: DEFAULT_CACHE_TTL,
            detail_failure: DetailFailurePolicy::default(),
        }
    }

    /// Shorthand for token authentication.
    pub fn with_access_token(api_url: Url, token: impl Into<String>) -> Self {
        Self::new(
            api_url,
            AuthCredentials::AccessToken(SecretString::from(token.into())),
        )
    }

    /// Shorthand for password authentication.
    pub fn with_password(
        api_url: Url,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(
            api_url,
            AuthCredentials::Password {
                username: username.into(),
                password: SecretString::from(password.into()),
            },
        )
    }
}
