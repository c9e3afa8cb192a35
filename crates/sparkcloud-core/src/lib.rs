//! Device directory and device handles on top of `sparkcloud-api`.
//!
//! - **[`Cloud`]**: facade that authenticates once (password grant or a
//!   supplied token) and serves the account's devices from a TTL cache.
//!
//! - **[`DeviceDirectory`]**: snapshot of every device keyed by id, with a
//!   name index. Built from one list call plus one concurrent detail call per
//!   connected device.
//!
//! - **[`DeviceHandle`]**: immutable view of one device. Static fields are
//!   plain accessors; firmware functions and variables go through
//!   [`DeviceHandle::call`], [`DeviceHandle::read`] and
//!   [`DeviceHandle::resolve`].

pub mod cloud;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cloud::Cloud;
pub use config::{
    AuthCredentials, ClientCredentials, CloudConfig, DEFAULT_API_URL, DEFAULT_CACHE_TTL,
    DetailFailurePolicy, TlsVerification,
};
pub use error::CoreError;
pub use model::{DeviceHandle, Member, VariableType};
pub use session::Session;
pub use store::{DeviceDirectory, TtlCache};
