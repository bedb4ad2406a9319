use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

/// User settings read at start-up. Every field has a default so a partial or
/// missing file still yields a usable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default)]
    pub plugin_paths: Vec<PathBuf>,
    #[serde(default = "DashboardSettings::default_canvas_width")]
    pub canvas_width: i32,
    #[serde(default = "DashboardSettings::default_canvas_height")]
    pub canvas_height: i32,
    #[serde(default = "DashboardSettings::default_log_filter")]
    pub log_filter: String,
}

impl DashboardSettings {
    fn default_canvas_width() -> i32 {
        1280
    }

    fn default_canvas_height() -> i32 {
        720
    }

    fn default_log_filter() -> String {
        "info".into()
    }

    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(err) => {
                debug!(error = %err, "using default settings");
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            plugin_paths: Vec::new(),
            canvas_width: Self::default_canvas_width(),
            canvas_height: Self::default_canvas_height(),
            log_filter: Self::default_log_filter(),
        }
    }
}
