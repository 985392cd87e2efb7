mod config;
mod constants;
mod core_cli;
mod core_command;
mod core_log;
mod core_network;
mod helpers;
mod server;
mod session;

use crate::config::Config;
use crate::constants::DEFAULT_CONFIG_PATH;
use crate::core_cli::Cli;
use crate::core_log::logger::init_logger;
use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    init_logger(args.verbose);

    let mut config = load_config(args.config.as_deref())?;

    // Command line overrides
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    if let Some(directory) = args.directory {
        config.server.start_dir = Some(directory);
    }
    config.validate()?;

    server::run(config).await
}

/// Loads the given configuration file, or the default one when it exists.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                Config::load_from_file(default_path)
            } else {
                info!(
                    "No configuration file at {}, using defaults",
                    default_path.display()
                );
                Ok(Config::default())
            }
        }
    }
}
