//! `call` handler: invoke a firmware function.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use sparkcloud_core::Cloud;

use crate::cli::{CallArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

/// What structured output formats print for a call.
#[derive(Serialize)]
struct CallResult<'a> {
    device: &'a str,
    function: &'a str,
    args: &'a [String],
    return_value: Value,
}

pub async fn handle(cloud: &Cloud, args: CallArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device = util::resolve_device(cloud, &args.device, global.quiet).await?;

    info!(device = device.display_name(), function = %args.function, "calling function");
    let return_value = device.call(&args.function, &args.args).await?;

    let result = CallResult {
        device: device.display_name(),
        function: &args.function,
        args: &args.args,
        return_value,
    };
    let out = output::render_single(
        &global.output,
        &result,
        |r| output::plain_value(&r.return_value),
        |r| output::plain_value(&r.return_value),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
