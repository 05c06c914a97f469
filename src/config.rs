//! Runtime configuration.
//!
//! Settings live in `~/.quadro/config.json` (or the file passed with
//! `--config`). Every field has a default so a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Names offered by the creation form's responsible selector.
    pub responsibles: Vec<String>,
    /// Simulated latency of a task submission, in milliseconds.
    pub submit_delay_ms: u64,
    /// Cells the pointer must travel before a press turns into a drag.
    pub drag_activation_distance: u16,
    /// Default `tracing` filter when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            responsibles: vec![
                "Ana Silva".to_string(),
                "Bruno Santos".to_string(),
                "Carla Oliveira".to_string(),
            ],
            submit_delay_ms: 1000,
            drag_activation_distance: 1,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|source| BoardError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit path if given, otherwise the file in `data_dir` if it exists.
    pub fn resolve(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = data_dir.join(CONFIG_FILE);
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }
}

/// Data directory: `~/.quadro`, or `./.quadro` when `HOME` is unset.
pub fn data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".quadro")
}
