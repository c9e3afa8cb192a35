// Cloud API HTTP client
//
// Wraps `reqwest::Client` with URL construction, access-token injection and
// error-payload detection. Endpoint groups (auth, devices) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::AccessToken;
use crate::cloud::models::ErrorBody;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the device cloud.
///
/// Holds no credentials: the token endpoint uses OAuth client credentials
/// and every other call receives the [`AccessToken`] explicitly.
#[derive(Debug, Clone)]
pub struct CloudClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CloudClient {
    /// Create a client for `base_url` (e.g. `https://api.particle.io`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// The cloud base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// Device ids, function names and variable names come from the cloud
    /// itself, so they are never trusted to be URL-safe.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET with the access token as query parameter.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        token: &AccessToken,
    ) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .query(&[("access_token", token.expose())])
            .send()
            .await?;

        parse_response(resp).await
    }

    /// Send a form-encoded POST with the access token as query parameter.
    pub(crate) async fn post_form<T, B>(
        &self,
        url: Url,
        token: &AccessToken,
        form: &B,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .query(&[("access_token", token.expose())])
            .form(form)
            .send()
            .await?;

        parse_response(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Decode a cloud response, turning any failure signal into `Error::CloudApi`.
///
/// A response is a failure when the status is not 2xx, when the body has
/// `ok: false`, or when the body carries an `error` field. The message joins
/// `error` and `error_description` verbatim.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    let value: Option<serde_json::Value> = serde_json::from_str(&body).ok();
    let error_body = value
        .as_ref()
        .and_then(|v| serde_json::from_value::<ErrorBody>(v.clone()).ok())
        .unwrap_or_default();

    if !status.is_success() || error_body.is_failure() {
        return Err(cloud_error(status, &error_body, &body));
    }

    let Some(value) = value else {
        let preview: String = body.chars().take(200).collect();
        return Err(Error::Deserialization {
            message: format!("response is not JSON (body preview: {preview:?})"),
            body,
        });
    };

    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

fn cloud_error(status: reqwest::StatusCode, error_body: &ErrorBody, raw: &str) -> Error {
    let code = error_body.error.clone();
    let message = match error_body.message() {
        Some(message) => message,
        None if raw.trim().is_empty() => status.to_string(),
        None => raw.trim().to_owned(),
    };
    Error::CloudApi {
        message,
        code,
        status: status.as_u16(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CloudClient {
        CloudClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn endpoint_appends_segments_to_root() {
        let c = client("https://api.particle.io");
        let url = c.endpoint(&["v1", "devices"]).unwrap();
        assert_eq!(url.as_str(), "https://api.particle.io/v1/devices");
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let c = client("http://127.0.0.1:8080/cloud/");
        let url = c.endpoint(&["v1", "devices", "abc123"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/cloud/v1/devices/abc123");
    }

    #[test]
    fn endpoint_escapes_untrusted_names() {
        let c = client("https://api.particle.io");
        let url = c.endpoint(&["v1", "devices", "abc", "my var/x"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.particle.io/v1/devices/abc/my%20var%2Fx"
        );
    }

    #[test]
    fn rejects_non_base_url() {
        let err = CloudClient::from_reqwest("mailto:ops@example.com", reqwest::Client::new());
        assert!(matches!(err, Err(Error::InvalidBaseUrl(_))));
    }
}
