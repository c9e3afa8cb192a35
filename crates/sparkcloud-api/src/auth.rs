use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// OAuth client identity presented (as HTTP Basic auth) on the token endpoint.
///
/// The cloud ships a public client for first-party tooling; that is the default.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub id: String,
    pub secret: SecretString,
}

impl ClientCredentials {
    pub const DEFAULT_ID: &'static str = "spark";
    pub const DEFAULT_SECRET: &'static str = "spark";

    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: SecretString::from(secret.into()),
        }
    }
}

impl Default for ClientCredentials {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ID, Self::DEFAULT_SECRET)
    }
}

/// Bearer credential sent as the `access_token` query parameter.
///
/// Opaque: expiry is not tracked locally, a revoked or expired token only
/// surfaces as an API error.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for placing on the wire.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<SecretString> for AccessToken {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_does_not_leak_token() {
        let token = AccessToken::new("254406f79c1999af65a7df4388971354f85cfee9");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("254406"));
        assert_eq!(token.expose(), "254406f79c1999af65a7df4388971354f85cfee9");
    }

    #[test]
    fn default_client_is_the_public_one() {
        let client = ClientCredentials::default();
        assert_eq!(client.id, "spark");
        assert_eq!(client.secret.expose_secret(), "spark");
    }
}
