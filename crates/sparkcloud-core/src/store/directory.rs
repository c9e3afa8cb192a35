// ── Device directory ──
//
// Built from one list call plus one detail call per connected device.
// Devices are keyed by id; names are a secondary index because the cloud
// does not enforce unique names.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::{join_all, try_join_all};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use sparkcloud_api::models::DeviceInfo;

use crate::config::DetailFailurePolicy;
use crate::error::CoreError;
use crate::model::DeviceHandle;
use crate::model::device::is_modelled_field;
use crate::session::Session;

/// Snapshot of every device on the account, in the order the cloud listed them.
#[derive(Debug, Clone)]
pub struct DeviceDirectory {
    by_id: IndexMap<String, Arc<DeviceHandle>>,
    by_name: HashMap<String, Vec<String>>,
    refreshed_at: DateTime<Utc>,
}

impl DeviceDirectory {
    /// Index a batch of handles. Unnamed devices are reachable by id only.
    ///
    /// An id listed twice keeps its first entry.
    pub fn from_handles(handles: Vec<DeviceHandle>, refreshed_at: DateTime<Utc>) -> Self {
        let mut by_id = IndexMap::with_capacity(handles.len());
        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();

        for handle in handles {
            if by_id.contains_key(handle.id()) {
                warn!(device_id = handle.id(), "device listed twice; keeping the first entry");
                continue;
            }
            if let Some(name) = handle.name() {
                by_name
                    .entry(name.to_owned())
                    .or_default()
                    .push(handle.id().to_owned());
            }
            by_id.insert(handle.id().to_owned(), Arc::new(handle));
        }

        for (name, ids) in &by_name {
            if ids.len() > 1 {
                warn!(name, ids = ?ids, "several devices share one name; lookups by that name will fail");
            }
        }

        Self {
            by_id,
            by_name,
            refreshed_at,
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// When the underlying list call completed.
    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    /// Every device, in list order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<DeviceHandle>> {
        self.by_id.values()
    }

    /// Distinct device names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look a device up by exact name.
    pub fn get(&self, name: &str) -> Result<Arc<DeviceHandle>, CoreError> {
        match self.by_name.get(name).map(Vec::as_slice) {
            Some([id]) => self.by_id(id).ok_or_else(|| CoreError::UnknownDevice {
                name: name.to_owned(),
            }),
            Some(ids) if !ids.is_empty() => Err(CoreError::AmbiguousDevice {
                name: name.to_owned(),
                ids: ids.to_vec(),
            }),
            _ => Err(CoreError::UnknownDevice {
                name: name.to_owned(),
            }),
        }
    }

    /// Look a device up by id.
    pub fn by_id(&self, id: &str) -> Option<Arc<DeviceHandle>> {
        self.by_id.get(id).cloned()
    }

    /// Name first, then id.
    pub fn find(&self, name_or_id: &str) -> Result<Arc<DeviceHandle>, CoreError> {
        match self.get(name_or_id) {
            Err(CoreError::UnknownDevice { .. }) => {
                self.by_id(name_or_id).ok_or_else(|| CoreError::UnknownDevice {
                    name: name_or_id.to_owned(),
                })
            }
            other => other,
        }
    }
}

// ── Fetch ────────────────────────────────────────────────────────────

/// List the account's devices and fetch detail for each connected one.
///
/// Detail requests run concurrently. Disconnected devices get no detail
/// request. Extra keys from list entries and details are unioned so every
/// handle carries the same set.
pub(crate) async fn fetch_directory(
    session: &Arc<Session>,
    policy: DetailFailurePolicy,
) -> Result<DeviceDirectory, CoreError> {
    let client = session.client();
    let token = session.token();

    let summaries = client.list_devices(token).await?;
    let refreshed_at = Utc::now();
    let connected = summaries.iter().filter(|s| s.connected).count();
    info!(
        device_count = summaries.len(),
        connected, "fetching device details"
    );

    let details: Vec<Option<DeviceInfo>> = match policy {
        // First failure cancels the remaining detail calls.
        DetailFailurePolicy::Abort => {
            try_join_all(summaries.iter().map(|summary| async move {
                if summary.connected {
                    client.get_device(token, &summary.id).await.map(Some)
                } else {
                    Ok(None)
                }
            }))
            .await?
        }
        DetailFailurePolicy::Degrade => {
            join_all(summaries.iter().map(|summary| async move {
                if !summary.connected {
                    return None;
                }
                match client.get_device(token, &summary.id).await {
                    Ok(info) => Some(info),
                    Err(e) => {
                        warn!(device_id = %summary.id, error = %e, "device detail fetch failed; continuing without capabilities");
                        None
                    }
                }
            }))
            .await
        }
    };

    let detail_keys = details
        .iter()
        .flatten()
        .flat_map(|info| info.extra.keys())
        .filter(|key| !is_modelled_field(key));
    let uniform_keys: BTreeSet<String> = summaries
        .iter()
        .flat_map(|s| s.extra.keys())
        .chain(detail_keys)
        .cloned()
        .collect();

    let handles: Vec<DeviceHandle> = summaries
        .into_iter()
        .zip(details)
        .map(|(summary, info)| {
            DeviceHandle::assemble(summary, info, &uniform_keys, Arc::clone(session))
        })
        .collect();

    debug!(devices = handles.len(), "device directory assembled");
    Ok(DeviceDirectory::from_handles(handles, refreshed_at))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use sparkcloud_api::{AccessToken, CloudClient};

    fn handle(id: &str, name: Option<&str>) -> DeviceHandle {
        let client =
            CloudClient::from_reqwest("http://127.0.0.1:9", reqwest::Client::new()).unwrap();
        let session = Arc::new(Session::new(client, AccessToken::new("tok")));
        let summary = serde_json::from_value(json!({ "id": id, "name": name, "connected": false }))
            .unwrap();
        DeviceHandle::assemble(summary, None, &BTreeSet::new(), session)
    }

    fn directory() -> DeviceDirectory {
        DeviceDirectory::from_handles(
            vec![
                handle("aaa", Some("kitchen")),
                handle("bbb", Some("garage")),
                handle("ccc", Some("kitchen")),
                handle("ddd", None),
            ],
            Utc::now(),
        )
    }

    #[test]
    fn unique_names_resolve() {
        let dir = directory();
        assert_eq!(dir.len(), 4);
        assert_eq!(dir.get("garage").unwrap().id(), "bbb");
        assert_eq!(dir.names(), vec!["garage", "kitchen"]);
    }

    #[test]
    fn iteration_keeps_list_order() {
        let dir = directory();
        let ids: Vec<&str> = dir.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec!["aaa", "bbb", "ccc", "ddd"]);
    }

    #[test]
    fn shared_name_is_ambiguous() {
        let err = directory().get("kitchen").unwrap_err();
        match err {
            CoreError::AmbiguousDevice { name, ids } => {
                assert_eq!(name, "kitchen");
                assert_eq!(ids, vec!["aaa".to_owned(), "ccc".to_owned()]);
            }
            other => panic!("expected AmbiguousDevice, got {other:?}"),
        }
    }

    #[test]
    fn unknown_name_is_reported() {
        let err = directory().get("attic").unwrap_err();
        assert!(matches!(err, CoreError::UnknownDevice { ref name } if name == "attic"));
    }

    #[test]
    fn find_falls_back_to_id() {
        let dir = directory();
        assert_eq!(dir.find("ddd").unwrap().name(), None);
        assert_eq!(dir.find("garage").unwrap().id(), "bbb");
        assert!(dir.find("kitchen").is_err());
        assert!(dir.find("zzz").is_err());
    }

    #[test]
    fn repeated_id_keeps_first_entry() {
        let dir = DeviceDirectory::from_handles(
            vec![
                handle("aaa", Some("kitchen")),
                handle("aaa", Some("kitchen")),
                handle("bbb", Some("garage")),
            ],
            Utc::now(),
        );
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.get("kitchen").unwrap().id(), "aaa");
    }
}
