use crate::core_network::network;
use crate::helpers::log_config;
use crate::Config;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

/// Runs the browsing server with the provided configuration.
///
/// This function resolves the directory sessions start in and starts the
/// accept loop, logging significant steps and potential issues.
///
/// # Arguments
///
/// * `config` - The validated server configuration.
///
/// # Returns
///
/// Result<(), anyhow::Error> indicating the success or failure of the operation.
pub async fn run(config: Config) -> Result<()> {
    info!("Starting server with config:");
    log_config(&config);

    let root_dir = config.root_dir()?;
    info!("Sessions start in {}", root_dir.display());

    match network::start_server(Arc::new(config), root_dir).await {
        Ok(_) => info!("Server stopped."),
        Err(e) => {
            error!("Failed to run server: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
