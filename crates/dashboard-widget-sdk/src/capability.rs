use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geometry::Size;

/// Opaque per-instance state. The schema belongs to the plugin; the host only
/// distinguishes empty from non-empty.
pub type WidgetState = Map<String, Value>;

/// Static description of a widget kind. `name` identifies the plugin across
/// the process lifetime and prefixes every instance id derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetMetadata {
    pub name: String,
    pub description: String,
    pub default_size: Size,
    pub min_size: Size,
    pub max_size: Size,
}

impl WidgetMetadata {
    pub fn new(name: impl Into<String>, default_size: Size) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            default_size,
            min_size: Size::new(0, 0),
            max_size: Size::new(i32::MAX, i32::MAX),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_size_limits(mut self, min_size: Size, max_size: Size) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }
}

/// What the host tells a widget about the slot its content will live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSurface {
    pub canvas_size: Size,
    pub initial_size: Size,
}

/// Content handle produced once per placed instance.
pub trait WidgetContent {
    /// Text rendering of the content at `size`, used by headless hosts.
    fn render(&self, size: Size) -> String;
}

/// The contract between the dashboard and a widget plugin.
///
/// `deserialize` may run before `create_content` so that restored state is
/// available while the content is built. One capability can back several
/// placed instances; implementations that care must keep their state
/// reentrant.
pub trait WidgetCapability {
    fn metadata(&self) -> WidgetMetadata;
    fn create_content(&self, host: &HostSurface) -> Box<dyn WidgetContent>;
    fn serialize(&self) -> WidgetState;
    fn deserialize(&self, state: &WidgetState);
}

/// Value handed across the dynamic-library boundary by
/// [`declare_dashboard_widget!`](crate::declare_dashboard_widget).
pub struct WidgetExport {
    capability: Box<dyn WidgetCapability>,
}

impl WidgetExport {
    pub fn new(capability: Box<dyn WidgetCapability>) -> Self {
        Self { capability }
    }

    pub fn capability(&self) -> &dyn WidgetCapability {
        self.capability.as_ref()
    }

    pub fn into_capability(self) -> Box<dyn WidgetCapability> {
        self.capability
    }
}
