use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use dashboard_widget_sdk::{Point, Size};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::record::{instance_number, LayoutEntry, LayoutRecord};

/// In-memory layout of every placed widget, keyed by instance id.
#[derive(Debug, Default, Clone)]
pub struct LayoutStore {
    records: BTreeMap<String, LayoutRecord>,
}

impl LayoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under a freshly allocated `<plugin>_<N>` id and return
    /// the id.
    pub fn add(&mut self, plugin_name: &str, position: Point, size: Size) -> String {
        let instance_id = self.next_instance_id(plugin_name);
        self.records.insert(
            instance_id.clone(),
            LayoutRecord::new(instance_id.clone(), plugin_name, position, size),
        );
        instance_id
    }

    pub fn update_position(&mut self, instance_id: &str, position: Point) {
        if let Some(record) = self.records.get_mut(instance_id) {
            record.position = position;
        }
    }

    pub fn update_size(&mut self, instance_id: &str, size: Size) {
        if let Some(record) = self.records.get_mut(instance_id) {
            record.size = size;
        }
    }

    pub fn remove(&mut self, instance_id: &str) -> Option<LayoutRecord> {
        self.records.remove(instance_id)
    }

    pub fn get(&self, instance_id: &str) -> Option<&LayoutRecord> {
        self.records.get(instance_id)
    }

    pub fn contains(&self, instance_id: &str) -> bool {
        self.records.contains_key(instance_id)
    }

    /// Snapshot of every record. Callers must not rely on the order.
    pub fn all(&self) -> Vec<LayoutRecord> {
        self.records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best-effort save: failures are logged and otherwise ignored, leaving
    /// the in-memory layout authoritative for the running session.
    pub fn save_to_file(&self, path: &Path) {
        if let Err(err) = self.try_save_to_file(path) {
            warn!(error = %err, "layout not saved");
        }
    }

    pub fn try_save_to_file(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let entries: Vec<LayoutEntry> = self.records.values().map(LayoutEntry::from).collect();
        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(path, json).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), records = entries.len(), "layout saved");
        Ok(())
    }

    /// Replace the whole layout with the contents of `path`. A missing,
    /// unreadable or malformed file leaves the store empty.
    pub fn load_from_file(&mut self, path: &Path) {
        self.records.clear();
        match read_entries(path) {
            Ok(entries) => {
                for entry in entries {
                    let record = LayoutRecord::from(entry);
                    self.records.insert(record.instance_id.clone(), record);
                }
            }
            Err(err) => debug!(error = %err, "no usable layout on disk"),
        }
    }

    fn next_instance_id(&self, plugin_name: &str) -> String {
        let highest = self
            .records
            .keys()
            .filter_map(|id| instance_number(id, plugin_name))
            .max()
            .unwrap_or(0);
        let next = highest.checked_add(1).unwrap_or_else(|| {
            (1..u64::MAX)
                .find(|n| !self.records.contains_key(&format!("{plugin_name}_{n}")))
                .unwrap_or(u64::MAX)
        });
        format!("{plugin_name}_{next}")
    }
}

fn read_entries(path: &Path) -> Result<Vec<LayoutEntry>, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    // Anything but a top-level array holds no records.
    let Value::Array(items) = document else {
        return Ok(Vec::new());
    };
    Ok(items.iter().map(LayoutEntry::from_value).collect())
}
