use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "vehicle-finder")]
#[command(about = "Browse NHTSA vPIC vehicle models by make and model year")]
#[command(version)]
pub struct Cli {
    /// JSON config file; built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the vPIC API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Start on this route instead of the selector, e.g. /results/Honda/2020
    #[arg(short, long)]
    pub route: Option<String>,

    /// Write logs to this file; logging is off when omitted
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
