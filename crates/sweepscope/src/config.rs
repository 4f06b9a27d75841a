//! User preferences stored in `{data_dir}/config.yaml`
//!
//! ```yaml
//! columns_per_row: 3
//! slider_debounce_ms: 250
//! select_first_variable: true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sweepscope_core::{LayoutConfig, SessionOptions};

pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Heatmaps per plot row
    pub columns_per_row: usize,
    /// Quiet period before an index change triggers a re-render
    pub slider_debounce_ms: u64,
    /// Select the first result variable when a run opens
    pub select_first_variable: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            columns_per_row: 2,
            slider_debounce_ms: 250,
            select_first_variable: true,
        }
    }
}

impl AppConfig {
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE_NAME)
    }

    /// Load the config file, falling back to defaults when it is missing or invalid
    pub fn load_or_default(data_dir: &Path) -> Self {
        let path = Self::path(data_dir);
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "could not read config, using defaults");
                return Self::default();
            }
        };
        match serde_saphyr::from_str::<AppConfig>(&content) {
            Ok(config) if config.columns_per_row == 0 => {
                tracing::warn!(path = %path.display(), "columns_per_row must be positive, using defaults");
                Self::default()
            }
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    pub fn slider_debounce(&self) -> Duration {
        Duration::from_millis(self.slider_debounce_ms)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            layout: LayoutConfig::new(self.columns_per_row).unwrap_or_default(),
            select_first_variable: self.select_first_variable,
        }
    }
}
