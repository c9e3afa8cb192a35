//! Shared helpers for command handlers.

use std::sync::Arc;

use sparkcloud_core::{Cloud, DeviceDirectory, DeviceHandle};

use crate::error::CliError;
use crate::output;

/// Load the device directory behind a spinner.
pub async fn load_directory(cloud: &Cloud, quiet: bool) -> Result<Arc<DeviceDirectory>, CliError> {
    let bar = output::spinner("Loading devices...", quiet);
    let result = cloud.devices().await;
    bar.finish_and_clear();
    Ok(result?)
}

/// Resolve a device by name, falling back to ID.
pub async fn resolve_device(
    cloud: &Cloud,
    identifier: &str,
    quiet: bool,
) -> Result<Arc<DeviceHandle>, CliError> {
    let directory = load_directory(cloud, quiet).await?;
    Ok(directory.find(identifier)?)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
