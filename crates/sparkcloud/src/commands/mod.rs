//! Command dispatch: bridges CLI args -> core calls -> output formatting.

pub mod call;
pub mod config_cmd;
pub mod devices;
pub mod login;
pub mod read;
pub mod util;

use sparkcloud_core::Cloud;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a cloud-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, cloud: &Cloud, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(cloud, args, global).await,
        Command::Call(args) => call::handle(cloud, args, global).await,
        Command::Read(args) => read::handle(cloud, args, global).await,
        // Login, Config and Completions are handled before a Cloud exists
        Command::Login(_) | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Validation {
                field: "command".into(),
                reason: "this command does not take a cloud session".into(),
            })
        }
    }
}
