use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dashboard_widget_sdk::WidgetState;
use tracing::{debug, warn};

use crate::error::StoreError;

const EXTENSION: &str = "json";

/// Per-instance widget state, one JSON file per instance id so a failed
/// write can only ever damage the instance being written.
#[derive(Debug, Clone)]
pub struct InstanceDataStore {
    dir: PathBuf,
}

impl InstanceDataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, instance_id: &str) -> PathBuf {
        self.dir.join(format!("{instance_id}.{EXTENSION}"))
    }

    /// Stored state for `instance_id`; empty when there is none or it cannot
    /// be read.
    pub fn load(&self, instance_id: &str) -> WidgetState {
        let path = self.file_path(instance_id);
        let Ok(raw) = fs::read_to_string(&path) else {
            return WidgetState::new();
        };
        match serde_json::from_str::<WidgetState>(&raw) {
            Ok(state) => state,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "ignoring unreadable widget data");
                WidgetState::new()
            }
        }
    }

    /// Best-effort overwrite of the state for `instance_id`.
    pub fn save(&self, instance_id: &str, state: &WidgetState) {
        if let Err(err) = self.try_save(instance_id, state) {
            warn!(instance = instance_id, error = %err, "widget data not saved");
        }
    }

    pub fn try_save(&self, instance_id: &str, state: &WidgetState) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.file_path(instance_id);
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&path, json).map_err(|source| StoreError::Write { path, source })
    }

    pub fn remove(&self, instance_id: &str) {
        let path = self.file_path(instance_id);
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %path.display(), error = %err, "widget data not removed"),
        }
    }

    /// Ids that currently have a data file, sorted.
    pub fn instance_ids(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut ids: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_owned)
            })
            .collect();
        ids.sort();
        ids
    }
}
