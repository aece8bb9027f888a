use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod cli;
mod config;
mod core;
mod http_client;
mod imaging;
mod overlay;
mod session;
mod studio;
mod tui;

use cli::{Cli, Commands};
use config::Config;
use crate::core::{ErrorKind, StudioError};

/// Exit code for configuration errors at startup
const EXIT_CONFIG: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // A .env file is optional
    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            eprintln!("{}: failed to read .env: {}", "Warning".yellow().bold(), e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    // Load or create config
    let mut config = match Config::load_or_create() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    // The studio and headless generation need a key; fail early without one
    if matches!(cli.command, None | Some(Commands::Generate(_))) {
        if let Err(e) = config.require_api_key() {
            exit_with(&e);
        }
    }

    let outcome = match cli.command {
        Some(Commands::Generate(args)) => cli::commands::generate::run(args, &config).await,
        Some(Commands::Assets(args)) => cli::commands::assets::run(args),
        Some(Commands::Config(args)) => cli::commands::config::run(args, &mut config),
        None => {
            // Launch TUI
            tui::run(&mut config).await
        }
    };

    if let Err(err) = outcome {
        if let Some(studio_err) = err.downcast_ref::<StudioError>() {
            if studio_err.kind() == ErrorKind::Configuration {
                exit_with(studio_err);
            }
            eprintln!("{}", studio_err.user_message().red());
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}

/// Report a configuration error and stop with `EXIT_CONFIG`
fn exit_with(err: &StudioError) -> ! {
    tracing::debug!("{:?}", err);
    eprintln!("{}", err.user_message().red().bold());
    std::process::exit(EXIT_CONFIG);
}
