// ── Device directory storage ──
//
// A name-keyed snapshot of the account's devices, served from a TTL cache
// so bursts of lookups cost one list call and one detail call per device.

pub mod cache;
pub mod directory;

pub use cache::TtlCache;
pub use directory::DeviceDirectory;

pub(crate) use directory::fetch_directory;
