use std::fs::OpenOptions;
use std::path::Path;

use log::LevelFilter;

use crate::error::{Context, Result};

/// Route `log` output to a file so it never draws over the TUI.
///
/// Without a file, logging stays off even when `RUST_LOG` is set.
pub fn init_logging(log_file: Option<&Path>, level: LevelFilter) -> Result<()> {
    let mut builder = logger_builder(log_file, level)?;
    builder.try_init().context("Logger already initialised")?;
    Ok(())
}

fn logger_builder(log_file: Option<&Path>, level: LevelFilter) -> Result<env_logger::Builder> {
    let mut builder = env_logger::Builder::new();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .filter_level(level)
                .parse_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    Ok(builder)
}
