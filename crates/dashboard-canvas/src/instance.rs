use std::fmt;

use dashboard_plugin_host::WidgetRef;
use dashboard_widget_sdk::WidgetContent;

use crate::frame::WidgetFrame;

/// A widget currently shown on the canvas.
pub struct LiveInstance {
    pub(crate) instance_id: String,
    // Fields drop in declaration order: the content's code may live in the
    // widget's library, so it has to go first.
    pub(crate) content: Box<dyn WidgetContent>,
    pub(crate) frame: WidgetFrame,
    pub(crate) widget: WidgetRef,
}

impl LiveInstance {
    /// Empty until the controller assigns or restores an identity.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn plugin_name(&self) -> &str {
        self.widget.name()
    }

    pub fn widget(&self) -> &WidgetRef {
        &self.widget
    }

    pub fn frame(&self) -> &WidgetFrame {
        &self.frame
    }

    pub fn render(&self) -> String {
        self.content.render(self.frame.size())
    }
}

impl fmt::Debug for LiveInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveInstance")
            .field("instance_id", &self.instance_id)
            .field("plugin", &self.widget.name())
            .field("geometry", &self.frame.geometry())
            .finish()
    }
}
