mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sparkcloud_core::Cloud;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // No cloud session needed
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global).await,
        Command::Login(args) => commands::login::handle(args, &cli.global).await,

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sparkcloud", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let (cloud_config, profile_name) = config::build_cloud_config(&cli.global)?;
            let cloud = Cloud::new(cloud_config)
                .await
                .map_err(|e| CliError::from(e).for_profile(&profile_name))?;

            tracing::debug!(command = ?cmd, profile = %profile_name, "dispatching command");
            commands::dispatch(cmd, &cloud, &cli.global)
                .await
                .map_err(|e| e.for_profile(&profile_name))
        }
    }
}
