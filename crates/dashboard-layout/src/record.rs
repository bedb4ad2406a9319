use dashboard_widget_sdk::{Point, Size};
use serde::Serialize;
use serde_json::{Map, Value};

/// Persisted geometry and identity of one placed widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutRecord {
    pub instance_id: String,
    pub plugin_name: String,
    pub position: Point,
    pub size: Size,
}

impl LayoutRecord {
    pub fn new(
        instance_id: impl Into<String>,
        plugin_name: impl Into<String>,
        position: Point,
        size: Size,
    ) -> Self {
        Self {
            instance_id: instance_id.into(),
            plugin_name: plugin_name.into(),
            position,
            size,
        }
    }
}

/// On-disk shape of a layout record.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LayoutEntry {
    instance_id: String,
    plugin_name: String,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl LayoutEntry {
    /// Read one array element of a layout file. Fields that are missing or
    /// of the wrong type fall back to empty strings and zero, so one bad
    /// value never costs the rest of the layout.
    pub(crate) fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        Self {
            instance_id: text_field(object, "instanceId"),
            plugin_name: text_field(object, "pluginName"),
            x: int_field(object, "x"),
            y: int_field(object, "y"),
            width: int_field(object, "width"),
            height: int_field(object, "height"),
        }
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

// Fractions and values outside the i32 range read as zero.
fn int_field(object: &Map<String, Value>, key: &str) -> i32 {
    object
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|v| i32::try_from(v).ok())
        .unwrap_or(0)
}

impl From<&LayoutRecord> for LayoutEntry {
    fn from(record: &LayoutRecord) -> Self {
        Self {
            instance_id: record.instance_id.clone(),
            plugin_name: record.plugin_name.clone(),
            x: record.position.x,
            y: record.position.y,
            width: record.size.width,
            height: record.size.height,
        }
    }
}

impl From<LayoutEntry> for LayoutRecord {
    fn from(entry: LayoutEntry) -> Self {
        LayoutRecord {
            instance_id: entry.instance_id,
            plugin_name: entry.plugin_name,
            position: Point::new(entry.x, entry.y),
            size: Size::new(entry.width, entry.height),
        }
    }
}

/// Parse the numeric suffix of `instance_id` when it belongs to `plugin_name`.
pub(crate) fn instance_number(instance_id: &str, plugin_name: &str) -> Option<u64> {
    let suffix = instance_id
        .strip_prefix(plugin_name)?
        .strip_prefix('_')?;
    suffix.parse::<u64>().ok().filter(|n| *n > 0)
}
