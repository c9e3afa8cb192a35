// ── Authenticated session ──
//
// The pair every device call needs: a transport and the access token.
// Shared by the facade and every device handle it hands out.

use sparkcloud_api::{AccessToken, CloudClient};

/// HTTP client plus the resolved access token.
#[derive(Debug)]
pub struct Session {
    client: CloudClient,
    token: AccessToken,
}

impl Session {
    pub fn new(client: CloudClient, token: AccessToken) -> Self {
        Self { client, token }
    }

    pub fn client(&self) -> &CloudClient {
        &self.client
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }
}
