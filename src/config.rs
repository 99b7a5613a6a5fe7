// ============================================
// src/config.rs
// Settings file (JSON) and where it lives
// ============================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::generator::DEFAULT_DELAY;

const CONFIG_FILE: &str = "config.json";

/// OS-specific directories for this app.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "connect-starter")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Simulated generation delay in milliseconds.
    pub delay_ms: u64,
    /// Where printable sheets are written; current directory when unset.
    pub print_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY.as_millis() as u64,
            print_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// MARK: load with fallback (explicit path > user config dir > defaults)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Applies command-line flags on top of the file values.
    pub fn with_overrides(mut self, delay_ms: Option<u64>, log_level: Option<&str>) -> Self {
        if let Some(delay_ms) = delay_ms {
            self.delay_ms = delay_ms;
        }
        if let Some(level) = log_level {
            self.log_level = level.to_string();
        }
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn print_dir(&self) -> PathBuf {
        self.print_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
