//! Device command handlers.

use std::sync::Arc;

use tabled::Tabled;

use sparkcloud_core::{Cloud, DeviceHandle};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Last heard")]
    last_heard: String,
    #[tabled(rename = "Functions")]
    functions: usize,
    #[tabled(rename = "Variables")]
    variables: usize,
}

fn row(d: &Arc<DeviceHandle>, color: bool) -> DeviceRow {
    DeviceRow {
        name: d.name().unwrap_or("-").to_owned(),
        id: d.id().to_owned(),
        state: output::connection_label(d.connected(), color),
        last_heard: last_heard(d),
        functions: d.functions().len(),
        variables: d.variables().len(),
    }
}

fn last_heard(d: &DeviceHandle) -> String {
    d.last_heard()
        .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn detail(d: &Arc<DeviceHandle>, color: bool) -> String {
    let mut lines = vec![
        format!("ID:         {}", d.id()),
        format!("Name:       {}", d.name().unwrap_or("-")),
        format!("State:      {}", output::connection_label(d.connected(), color)),
        format!("Last heard: {}", last_heard(d)),
        format!("Last IP:    {}", d.last_ip_address().unwrap_or("-")),
        format!("Last app:   {}", d.last_app().unwrap_or("-")),
    ];
    if let Some(status) = d.status() {
        lines.push(format!("Status:     {status}"));
    }
    if let Some(platform) = d.platform_id() {
        lines.push(format!("Platform:   {platform}"));
    }
    if let Some(product) = d.product_id() {
        lines.push(format!("Product:    {product}"));
    }
    if d.requires_deep_update() {
        lines.push("Firmware:   deep update required".into());
    }

    if !d.functions().is_empty() {
        lines.push(String::new());
        lines.push("Functions:".into());
        lines.extend(d.functions().iter().map(|f| format!("  {f}")));
    }
    if !d.variables().is_empty() {
        lines.push(String::new());
        lines.push("Variables:".into());
        lines.extend(
            d.variables()
                .iter()
                .map(|(name, kind)| format!("  {name} ({kind})")),
        );
    }
    let extra: Vec<String> = d
        .extra()
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| format!("  {k}: {}", output::plain_value(v)))
        .collect();
    if !extra.is_empty() {
        lines.push(String::new());
        lines.push("Other fields:".into());
        lines.extend(extra);
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(cloud: &Cloud, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        DevicesCommand::List { connected } => {
            let directory = util::load_directory(cloud, global.quiet).await?;
            let devices: Vec<Arc<DeviceHandle>> = directory
                .iter()
                .filter(|d| !connected || d.connected())
                .cloned()
                .collect();
            let out = output::render_list(
                &global.output,
                &devices,
                |d| row(d, color),
                |d| d.display_name().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let handle = util::resolve_device(cloud, &device, global.quiet).await?;
            let out = output::render_single(
                &global.output,
                &handle,
                |d| detail(d, color),
                |d| d.id().to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
