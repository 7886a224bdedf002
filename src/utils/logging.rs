use crate::config::LogConfig;
use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::str::FromStr;

/// Installs the global logger. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let level = parse_level(&config.level)?;

    SimpleLogger::new()
        .with_level(level)
        .with_module_level("winit", LevelFilter::Warn)
        .with_module_level("glutin", LevelFilter::Warn)
        .with_module_level("glutin_winit", LevelFilter::Warn)
        .env()
        .init()
        .context("Failed to install logger")?;

    log::debug!("logging initialized at {}", level);
    Ok(())
}

pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim()).map_err(|_| anyhow!("Unknown log level '{}'", level))
}
