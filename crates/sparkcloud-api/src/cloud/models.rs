// Cloud API response types
//
// Models for the device cloud's JSON responses. The field set of a device
// varies between device generations and firmware, so every device model keeps
// a flattened `extra` map and uses `#[serde(default)]` liberally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Error payload ────────────────────────────────────────────────────

/// Failure markers the cloud may put in any response body.
///
/// ```json
/// { "ok": false, "error": "invalid_grant", "error_description": "User credentials are invalid" }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub ok: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ErrorBody {
    /// `true` when the payload itself reports a failure, regardless of status.
    pub fn is_failure(&self) -> bool {
        self.ok == Some(false) || self.error.is_some()
    }

    /// `"{error}: {error_description}"`, or whichever half is present.
    pub fn message(&self) -> Option<String> {
        match (&self.error, &self.error_description) {
            (Some(error), Some(description)) => Some(format!("{error}: {description}")),
            (Some(only), None) | (None, Some(only)) => Some(only.clone()),
            (None, None) => None,
        }
    }
}

// ── OAuth ────────────────────────────────────────────────────────────

/// Successful body of `POST /oauth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// One entry of `GET /v1/devices`.
///
/// The list endpoint returns more fields on newer platforms; anything not
/// modelled here lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub connected: bool,
    /// RFC 3339 timestamp; kept as a string because older devices report `null`
    /// or malformed values.
    #[serde(default)]
    pub last_heard: Option<String>,
    #[serde(default)]
    pub last_app: Option<String>,
    #[serde(default)]
    pub last_ip_address: Option<String>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub platform_id: Option<i64>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceSummary {
    /// Names of the modelled fields, used to answer field lookups uniformly.
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "connected",
        "last_heard",
        "last_app",
        "last_ip_address",
        "product_id",
        "platform_id",
    ];
}

/// Body of `GET /v1/devices/{id}` for a connected device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub functions: Option<Vec<String>>,
    /// Variable name to declared type (`"int32"`, `"double"`, `"string"`, ...).
    #[serde(default)]
    pub variables: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub requires_deep_update: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /v1/devices/{id}/{function}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCallResponse {
    pub return_value: Value,
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `GET /v1/devices/{id}/{variable}`.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableResponse {
    pub result: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
