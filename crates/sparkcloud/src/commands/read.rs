//! `read` handler: fetch a firmware variable.

use serde::Serialize;
use serde_json::Value;

use sparkcloud_core::{Cloud, Member};

use crate::cli::{GlobalOpts, ReadArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct ReadResult<'a> {
    device: &'a str,
    variable: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    result: Value,
}

pub async fn handle(cloud: &Cloud, args: ReadArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let device = util::resolve_device(cloud, &args.device, global.quiet).await?;

    let kind = match device.resolve(&args.variable) {
        Ok(Member::Variable { kind, .. }) => Some(kind.to_string()),
        _ => None,
    };
    let result = device.read(&args.variable).await?;

    let out = output::render_single(
        &global.output,
        &ReadResult {
            device: device.display_name(),
            variable: &args.variable,
            kind,
            result,
        },
        |r| output::plain_value(&r.result),
        |r| output::plain_value(&r.result),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
