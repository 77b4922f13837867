//! Engine configuration, stored as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Decimals used for label text.
    pub label_precision: usize,
    /// Width, in time units, of the visible part of a plot series.
    pub plot_window: f64,
    /// How many ticks a highlight stays on.
    pub highlight_ticks: u32,
    /// Upper bound on samples kept per plot. `None` keeps everything.
    pub max_samples: Option<usize>,
    /// Also write labels for value-producing nodes, not only `Display`.
    pub mirror_labels: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            label_precision: 2,
            plot_window: 10.0,
            highlight_ticks: 1,
            max_samples: None,
            mirror_labels: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, GraphError> {
        let config: EngineConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, GraphError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let toml_str = fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    pub fn save(&self, path: &Path) -> Result<(), GraphError> {
        fs::write(path, self.to_toml_string()?)?;
        info!("Engine config saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<(), GraphError> {
        if !(self.plot_window.is_finite() && self.plot_window > 0.0) {
            return Err(GraphError::Config(format!(
                "plot_window must be a positive number, got {}",
                self.plot_window
            )));
        }
        if self.max_samples == Some(0) {
            return Err(GraphError::Config(
                "max_samples must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Load `config.toml` from the platform config directory.
    ///
    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load_or_default() -> Self {
        if let Some(path) = config_path() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => return config,
                    Err(e) => {
                        warn!("Failed to load engine config, using defaults: {}", e);
                    }
                }
            }
        }
        Self::default()
    }
}

/// Location of `config.toml`, creating the directory if needed.
pub fn config_path() -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("dev", "node_calc", "node_calc")?;
    let config_dir = proj_dirs.config_dir();
    if !config_dir.exists() {
        if let Err(e) = fs::create_dir_all(config_dir) {
            error!("Failed to create config directory: {}", e);
            return None;
        }
    }
    Some(config_dir.join("config.toml"))
}
