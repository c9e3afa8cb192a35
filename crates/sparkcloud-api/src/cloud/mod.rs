// Cloud REST client modules
//
// Hand-written client for the device cloud's v1 endpoints plus the OAuth
// token endpoint. Every device call carries the access token as a query
// parameter; failures arrive as `{ error, error_description }` payloads.

pub mod auth;
pub mod client;
pub mod devices;
pub mod models;

pub use client::CloudClient;
