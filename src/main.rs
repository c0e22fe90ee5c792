use anyhow::Result;
use clap::Parser;

use vehicle_finder::cli::Cli;
use vehicle_finder::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.log_level_filter())?;

    vehicle_finder::app::run(cli).await?;
    Ok(())
}
