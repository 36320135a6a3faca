//! Fluctus Ground Station Tools
//!
//! Command line front end for decoding, producing and replaying Fluctus
//! flight computer telemetry. Wire lines and records go to stdout, logs go
//! to stderr.

mod cli;
mod commands;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use settings::Settings;

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "fluctus=debug,fluctus_protocol=debug,fluctus_stream=debug,fluctus_sim=debug"
    } else {
        "fluctus=info,fluctus_protocol=info,fluctus_stream=info,fluctus_sim=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = Settings::load();
    cli.apply(&mut settings);

    match cli.command {
        Command::Decode { file, .. } => commands::decode_stream(file, &settings).await,
        Command::EncodeLog { csv, output } => {
            commands::encode_log(&csv, output.as_deref(), &settings)
        }
        Command::Simulate { count, realtime } => {
            commands::simulate(count, realtime, &settings).await
        }
        Command::Uplink { command } => {
            let command = commands::uplink_command(command)?;
            print!("{}", command.encode());
            Ok(())
        }
        Command::Config { save } => commands::show_config(save, &settings),
    }
}
