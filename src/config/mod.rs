pub mod logging;
pub mod window;

pub use logging::LogConfig;
pub use window::WindowConfig;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub logging: LogConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Reads `<config dir>/<name>.toml` when it exists, else returns `defaults`.
    ///
    /// The path that was read comes back alongside the config so it can be
    /// logged once the logger is installed.
    pub fn load_or(name: &str, defaults: AppConfig) -> Result<(Self, Option<PathBuf>)> {
        Self::load_existing_or(config_path(name), defaults)
    }

    fn load_existing_or(
        path: Option<PathBuf>,
        defaults: AppConfig,
    ) -> Result<(Self, Option<PathBuf>)> {
        match path {
            Some(path) if path.exists() => Ok((Self::load(&path)?, Some(path))),
            _ => Ok((defaults, None)),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

pub fn config_path(name: &str) -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("org", "glearn", "glearn")?;
    Some(proj_dirs.config_dir().join(format!("{name}.toml")))
}
