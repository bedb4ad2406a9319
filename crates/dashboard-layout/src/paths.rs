use std::path::{Path, PathBuf};

use crate::error::StoreError;

const APP_DIR: &str = "Dashboard";

/// Where the dashboard keeps its per-user state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardPaths {
    root: PathBuf,
}

impl DashboardPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<config dir>/Dashboard`, e.g. `~/.config/Dashboard` on Linux.
    pub fn user_default() -> Result<Self, StoreError> {
        let config_dir = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self::new(config_dir.join(APP_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout_file(&self) -> PathBuf {
        self.root.join("layouts").join("default.json")
    }

    pub fn widget_data_dir(&self) -> PathBuf {
        self.root.join("widget-data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    pub fn lock_file(&self) -> PathBuf {
        self.root.join("dashboard.lock")
    }
}
