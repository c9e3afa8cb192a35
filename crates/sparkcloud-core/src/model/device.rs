// ── Device domain type ──
//
// A device's field set and capabilities are only known once the cloud has
// been asked. `DeviceHandle` pairs a fixed set of known fields with a
// string-keyed map of everything else, and dispatches function calls and
// variable reads through explicit lookups.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use sparkcloud_api::models::{DeviceInfo, DeviceSummary};

use super::variable::VariableType;
use crate::error::CoreError;
use crate::session::Session;

/// Immutable snapshot of one device, taken at directory refresh time.
///
/// Holding a handle across a refresh keeps the old snapshot; it is never
/// updated in place.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceHandle {
    id: String,
    name: Option<String>,
    connected: bool,
    last_heard: Option<String>,
    last_app: Option<String>,
    last_ip_address: Option<String>,
    product_id: Option<i64>,
    platform_id: Option<i64>,
    status: Option<String>,
    requires_deep_update: bool,
    functions: Vec<String>,
    variables: BTreeMap<String, VariableType>,
    /// Summary and detail fields outside the modelled set, padded with `null`
    /// so every handle from one refresh exposes the same keys.
    extra: BTreeMap<String, Value>,
    #[serde(skip)]
    session: Arc<Session>,
}

/// What a name resolves to on a given device.
#[derive(Debug, Clone, PartialEq)]
pub enum Member<'a> {
    /// A static field (summary, detail, or extra key).
    Field(Value),
    /// A callable firmware function.
    Function(&'a str),
    /// A readable firmware variable and its declared type.
    Variable {
        name: &'a str,
        kind: &'a VariableType,
    },
}

/// Wire names answered by dedicated handle fields rather than `extra`.
const DETAIL_FIELDS: &[&str] = &["status", "requires_deep_update", "functions", "variables"];

/// `true` if `key` is modelled by the list or detail endpoint types.
pub(crate) fn is_modelled_field(key: &str) -> bool {
    DeviceSummary::FIELDS.contains(&key) || DETAIL_FIELDS.contains(&key)
}

impl DeviceHandle {
    /// Merge a list entry with its detail (if fetched) into a handle.
    ///
    /// `uniform_keys` is the union of extra keys across the whole batch,
    /// from list entries and fetched details alike. A key reported by both
    /// takes the list value.
    pub(crate) fn assemble(
        summary: DeviceSummary,
        info: Option<DeviceInfo>,
        uniform_keys: &BTreeSet<String>,
        session: Arc<Session>,
    ) -> Self {
        let DeviceSummary {
            id,
            name,
            connected,
            last_heard,
            last_app,
            last_ip_address,
            product_id,
            platform_id,
            extra: mut summary_extra,
        } = summary;

        let mut info = info.unwrap_or_default();
        let extra = uniform_keys
            .iter()
            .map(|key| {
                let value = summary_extra
                    .remove(key)
                    .or_else(|| info.extra.remove(key))
                    .unwrap_or(Value::Null);
                (key.clone(), value)
            })
            .collect();

        let variables = info
            .variables
            .unwrap_or_default()
            .into_iter()
            .map(|(name, declared)| {
                let kind = VariableType::from_declared(&declared);
                (name, kind)
            })
            .collect();

        Self {
            id,
            name,
            connected,
            last_heard,
            last_app,
            last_ip_address,
            product_id,
            platform_id,
            status: info.status,
            requires_deep_update: info.requires_deep_update.unwrap_or(false),
            functions: info.functions.unwrap_or_default(),
            variables,
            extra,
            session,
        }
    }

    // ── Static fields ────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name if set, otherwise the id. Used in messages.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Last time the cloud heard from the device, if reported and well-formed.
    pub fn last_heard(&self) -> Option<DateTime<Utc>> {
        self.last_heard
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn last_app(&self) -> Option<&str> {
        self.last_app.as_deref()
    }

    pub fn last_ip_address(&self) -> Option<&str> {
        self.last_ip_address.as_deref()
    }

    pub fn product_id(&self) -> Option<i64> {
        self.product_id
    }

    pub fn platform_id(&self) -> Option<i64> {
        self.platform_id
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn requires_deep_update(&self) -> bool {
        self.requires_deep_update
    }

    /// Function names, in the order the cloud listed them.
    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    /// Variable names and declared types.
    pub fn variables(&self) -> &BTreeMap<String, VariableType> {
        &self.variables
    }

    /// Fields beyond the modelled set (uniform across one refresh).
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f == name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Look up any static field by its wire name.
    ///
    /// Known fields are returned as JSON; `null` means the field exists for
    /// this batch but the device did not report it.
    pub fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => json!(self.id),
            "name" => json!(self.name),
            "connected" => json!(self.connected),
            "last_heard" => json!(self.last_heard),
            "last_app" => json!(self.last_app),
            "last_ip_address" => json!(self.last_ip_address),
            "product_id" => json!(self.product_id),
            "platform_id" => json!(self.platform_id),
            "status" => json!(self.status),
            "requires_deep_update" => json!(self.requires_deep_update),
            "functions" => json!(self.functions),
            "variables" => json!(self.variables),
            other => return self.extra.get(other).cloned(),
        };
        Some(value)
    }

    // ── Dynamic dispatch ─────────────────────────────────────────────

    /// Resolve `name` to a field, function or variable without any network call.
    ///
    /// Fields win over capabilities. Capability names on a disconnected
    /// device fail with [`CoreError::DeviceUnavailable`].
    pub fn resolve(&self, name: &str) -> Result<Member<'_>, CoreError> {
        if let Some(value) = self.field(name) {
            return Ok(Member::Field(value));
        }
        self.ensure_connected(name)?;

        if let Some(function) = self.functions.iter().find(|f| *f == name) {
            return Ok(Member::Function(function));
        }
        if let Some((name, kind)) = self.variables.get_key_value(name) {
            return Ok(Member::Variable { name, kind });
        }
        Err(self.unknown(name))
    }

    /// Invoke a firmware function and return its `return_value` unchanged.
    ///
    /// Arguments are joined with commas into the `params` form field.
    pub async fn call<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Result<Value, CoreError> {
        self.ensure_connected(function)?;
        if !self.has_function(function) {
            return Err(self.unknown(function));
        }

        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        debug!(device = self.display_name(), function, "invoking function");
        let resp = self
            .session
            .client()
            .call_function(self.session.token(), &self.id, function, &args)
            .await?;
        Ok(resp.return_value)
    }

    /// Read a firmware variable and return its `result` unchanged.
    pub async fn read(&self, variable: &str) -> Result<Value, CoreError> {
        self.ensure_connected(variable)?;
        if !self.has_variable(variable) {
            return Err(self.unknown(variable));
        }

        debug!(device = self.display_name(), variable, "reading variable");
        let resp = self
            .session
            .client()
            .get_variable(self.session.token(), &self.id, variable)
            .await?;
        Ok(resp.result)
    }

    fn ensure_connected(&self, operation: &str) -> Result<(), CoreError> {
        if self.connected {
            Ok(())
        } else {
            Err(CoreError::DeviceUnavailable {
                device: self.display_name().to_owned(),
                operation: operation.to_owned(),
            })
        }
    }

    fn unknown(&self, name: &str) -> CoreError {
        CoreError::UnknownOperation {
            device: self.display_name().to_owned(),
            name: name.to_owned(),
        }
    }
}
