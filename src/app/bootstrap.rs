use std::sync::Arc;

use log::info;

use crate::app::controller::AppController;
use crate::cli::Cli;
use crate::config::{load_config, validate_config, Config};
use crate::error::Result;
use crate::fetch::VpicClient;
use crate::ui::Route;
use crate::utils::current_year;

/// Resolve config and the start route from the CLI.
pub fn prepare(cli: &Cli) -> Result<(Config, Route)> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::builtin(),
    };
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    validate_config(&config, current_year())?;

    let route = match &cli.route {
        Some(path) => Route::parse(path)?,
        None => Route::Selector,
    };
    Ok((config, route))
}

/// Entry point used by `main` to bootstrap the controller stack.
pub async fn run(cli: Cli) -> Result<()> {
    let (config, route) = prepare(&cli)?;
    info!("Using vPIC API at {}", config.api.base_url);

    let client = VpicClient::new(config.api.clone())?;
    let controller = AppController::new(config, Arc::new(client));
    controller.run(route).await
}
