// ── Cloud facade ──
//
// Entry point for consumers: authenticates once, then serves the device
// directory from a TTL cache. Cheaply cloneable; clones share the session
// and the cache.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};
use url::Url;

use sparkcloud_api::{AccessToken, CloudClient, TlsMode, TransportConfig};

use crate::config::{AuthCredentials, CloudConfig, DetailFailurePolicy, TlsVerification};
use crate::error::CoreError;
use crate::model::DeviceHandle;
use crate::session::Session;
use crate::store::{DeviceDirectory, TtlCache, fetch_directory};

/// Authenticated handle to one cloud account.
///
/// The password (if any) is used once during [`Cloud::new`] and not kept.
#[derive(Debug, Clone)]
pub struct Cloud {
    inner: Arc<CloudInner>,
}

#[derive(Debug)]
struct CloudInner {
    session: Arc<Session>,
    api_url: Url,
    detail_failure: DetailFailurePolicy,
    directory: TtlCache<DeviceDirectory>,
}

impl Cloud {
    /// Build the transport and resolve credentials to an access token.
    ///
    /// Token credentials make no network call; password credentials run the
    /// OAuth password grant immediately.
    pub async fn new(config: CloudConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = CloudClient::new(config.api_url.as_str(), &transport)?;

        let token = match &config.auth {
            AuthCredentials::AccessToken(token) => {
                debug!("using supplied access token");
                AccessToken::from(token.clone())
            }
            AuthCredentials::Password { username, password } => {
                let token = client
                    .login(username, password, &config.oauth_client)
                    .await?;
                info!(username = %username, "logged in");
                token
            }
        };

        Ok(Self {
            inner: Arc::new(CloudInner {
                session: Arc::new(Session::new(client, token)),
                api_url: config.api_url,
                detail_failure: config.detail_failure,
                directory: TtlCache::new(config.cache_ttl),
            }),
        })
    }

    /// The bearer token every request carries.
    pub fn access_token(&self) -> &str {
        self.inner.session.token().expose()
    }

    pub fn api_url(&self) -> &Url {
        &self.inner.api_url
    }

    // ── Directory ────────────────────────────────────────────────────

    /// The device directory, refetched when older than the cache TTL.
    pub async fn devices(&self) -> Result<Arc<DeviceDirectory>, CoreError> {
        let inner = &self.inner;
        inner
            .directory
            .get_or_refresh(Instant::now(), || {
                fetch_directory(&inner.session, inner.detail_failure)
            })
            .await
    }

    /// Refetch the directory regardless of age.
    pub async fn refresh(&self) -> Result<Arc<DeviceDirectory>, CoreError> {
        let inner = &self.inner;
        inner
            .directory
            .force_refresh(Instant::now(), || {
                fetch_directory(&inner.session, inner.detail_failure)
            })
            .await
    }

    /// Drop the cached directory; the next lookup refetches.
    pub async fn invalidate(&self) {
        self.inner.directory.invalidate().await;
    }

    /// Look a device up by name.
    pub async fn device(&self, name: &str) -> Result<Arc<DeviceHandle>, CoreError> {
        self.devices().await?.get(name)
    }

    /// Look a device up by id.
    pub async fn device_by_id(&self, id: &str) -> Result<Arc<DeviceHandle>, CoreError> {
        self.devices()
            .await?
            .by_id(id)
            .ok_or_else(|| CoreError::UnknownDevice { name: id.to_owned() })
    }
}

fn build_transport(config: &CloudConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}
