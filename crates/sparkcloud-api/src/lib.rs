// sparkcloud-api: Async Rust client for the Spark / Particle device cloud

pub mod auth;
pub mod cloud;
pub mod error;
pub mod transport;

pub use auth::{AccessToken, ClientCredentials};
pub use cloud::CloudClient;
pub use cloud::models;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
