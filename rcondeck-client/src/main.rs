//! rcondeck - terminal dashboard for RCON servers
//!
//! Pick a server from the list, send it RCON commands, and start, stop,
//! restart or inspect the container it runs in.

use std::process::ExitCode;
use std::sync::Arc;

use rcondeck_utils::{init_logging_with_config, LogConfig, Result};

mod cli;
mod config;
mod dispatcher;
mod executor;
mod input;
mod registry;
mod session;
mod ui;

use cli::Args;
use config::ConfigLoader;
use dispatcher::Dispatcher;
use executor::{DockerCli, Executors, RconConnector};
use ui::App;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments first (before terminal setup)
    let args = Args::parse_args();

    match run(args).await {
        Ok(()) => {
            tracing::info!("rcondeck exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("rcondeck error: {}", e);
            // Printed after the terminal has been restored
            eprintln!("Error: {}", e);
            if e.is_startup_fatal() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // Log to file, the dashboard owns the terminal
    let mut log_config = LogConfig::client();
    if let Some(filter) = &args.log_level {
        log_config = log_config.with_filter(filter.clone());
    }
    init_logging_with_config(log_config)?;
    tracing::info!("rcondeck starting");
    tracing::debug!("CLI args: {:?}", args);

    let path = ConfigLoader::resolve_path(args.config.as_deref())?;
    let config = ConfigLoader::load_and_validate(&path)?;
    let registry = ConfigLoader::registry(&config, &path)?;
    tracing::info!(path = %path.display(), servers = registry.len(), "config loaded");

    if args.check {
        println!("config: {}", path.display());
        print!("{}", registry.summary());
        return Ok(());
    }

    let keymap = config
        .keybindings
        .keymap()
        .map_err(|message| rcondeck_utils::DeckError::ConfigInvalid {
            path: path.clone(),
            message,
        })?;

    let program = args
        .container_program
        .unwrap_or_else(|| config.container.program.clone());
    let docker = DockerCli::new(program);
    tracing::debug!(program = docker.program(), "container program");
    let executors = Executors::new(
        Arc::new(RconConnector::new(config.rcon.settings())),
        Arc::new(docker),
    );

    let dispatcher = Dispatcher::new(Arc::new(registry), config.ui.status_timeout());
    let mut app = App::new(dispatcher, executors, keymap, config.ui.tick_rate());
    app.run().await
}
