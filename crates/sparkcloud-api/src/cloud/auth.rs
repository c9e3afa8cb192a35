// Cloud API authentication
//
// Password grant against the OAuth token endpoint. The resulting access
// token is used unchanged for the rest of the session; there is no refresh.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::auth::{AccessToken, ClientCredentials};
use crate::cloud::client::{CloudClient, parse_response};
use crate::cloud::models::TokenResponse;
use crate::error::Error;

impl CloudClient {
    /// Exchange a username/password pair for an access token.
    ///
    /// `POST /oauth/token` with HTTP Basic auth for the OAuth client and a
    /// form body of `username`, `password`, `grant_type=password`. Any
    /// rejection is reported as [`Error::Authentication`] carrying the
    /// cloud's `error: error_description`.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        client: &ClientCredentials,
    ) -> Result<AccessToken, Error> {
        let url = self.endpoint(&["oauth", "token"])?;

        debug!(username, "requesting access token at {}", url);

        let form = [
            ("username", username),
            ("password", password.expose_secret()),
            ("grant_type", "password"),
        ];

        let resp = self
            .http()
            .post(url)
            .basic_auth(&client.id, Some(client.secret.expose_secret()))
            .form(&form)
            .send()
            .await
            .map_err(Error::Transport)?;

        let grant: TokenResponse = parse_response(resp).await.map_err(|e| match e {
            Error::CloudApi { message, .. } => Error::Authentication { message },
            Error::Deserialization { message, .. } => Error::Authentication {
                message: format!("unexpected token response: {message}"),
            },
            other => other,
        })?;

        debug!(
            token_type = grant.token_type.as_deref().unwrap_or("bearer"),
            expires_in = ?grant.expires_in,
            "login successful"
        );
        Ok(AccessToken::new(grant.access_token))
    }
}
