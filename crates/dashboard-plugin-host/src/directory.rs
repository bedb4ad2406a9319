use std::rc::Rc;

use tracing::debug;

use crate::module::{LoadedWidget, WidgetRef};
use crate::registry::{LoadReport, PluginRegistry};

type LoadedCallback = Box<dyn FnMut(&WidgetRef)>;

/// The set of widget kinds known to the dashboard, in discovery order.
///
/// Entries are deduplicated by handle identity. Two plugins may report the
/// same name; lookups by name return the first one tracked.
pub struct WidgetDirectory {
    registry: PluginRegistry,
    widgets: Vec<WidgetRef>,
    observers: Vec<LoadedCallback>,
}

impl WidgetDirectory {
    pub fn new(registry: PluginRegistry) -> Self {
        Self {
            registry,
            widgets: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Called once for every capability the directory starts tracking.
    pub fn on_widget_loaded(&mut self, callback: impl FnMut(&WidgetRef) + 'static) {
        self.observers.push(Box::new(callback));
    }

    pub fn load_plugins(&mut self) -> LoadReport {
        let report = self.registry.load_all_with_report();
        for widget in &report.widgets {
            self.track(Rc::clone(widget));
        }
        report
    }

    /// Track a capability linked into the host binary.
    pub fn register(&mut self, widget: LoadedWidget) -> WidgetRef {
        let widget = Rc::new(widget);
        self.track(Rc::clone(&widget));
        widget
    }

    pub fn widgets(&self) -> &[WidgetRef] {
        &self.widgets
    }

    pub fn find_by_name(&self, name: &str) -> Option<&WidgetRef> {
        self.widgets.iter().find(|widget| widget.name() == name)
    }

    fn track(&mut self, widget: WidgetRef) {
        if self.widgets.iter().any(|known| Rc::ptr_eq(known, &widget)) {
            return;
        }
        debug!(name = widget.name(), "widget available");
        for observer in &mut self.observers {
            observer(&widget);
        }
        self.widgets.push(widget);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    use dashboard_widget_sdk::{
        HostSurface, Size, WidgetCapability, WidgetContent, WidgetMetadata, WidgetState,
    };
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::error::HostError;
    use crate::module::ModuleLoader;

    struct Tagged {
        name: String,
        description: &'static str,
    }

    struct Blank;

    impl WidgetContent for Blank {
        fn render(&self, _size: Size) -> String {
            String::new()
        }
    }

    impl WidgetCapability for Tagged {
        fn metadata(&self) -> WidgetMetadata {
            WidgetMetadata::new(self.name.clone(), Size::new(50, 50))
                .with_description(self.description)
        }

        fn create_content(&self, _host: &HostSurface) -> Box<dyn WidgetContent> {
            Box::new(Blank)
        }

        fn serialize(&self) -> WidgetState {
            WidgetState::new()
        }

        fn deserialize(&self, _state: &WidgetState) {}
    }

    struct StemLoader;

    impl ModuleLoader for StemLoader {
        fn load(&self, path: &Path) -> Result<LoadedWidget, HostError> {
            let name = path.file_stem().unwrap().to_string_lossy().into_owned();
            Ok(LoadedWidget::builtin(Box::new(Tagged {
                name,
                description: "from disk",
            })))
        }
    }

    #[test]
    fn repeated_loads_notify_once_per_capability() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("alpha"), "").unwrap();
        fs::write(dir.path().join("beta"), "").unwrap();
        let mut registry = PluginRegistry::with_loader(Box::new(StemLoader));
        registry.add_search_path(dir.path());
        let mut directory = WidgetDirectory::new(registry);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        directory.on_widget_loaded(move |widget| {
            sink.borrow_mut().push(widget.name().to_string());
        });

        directory.load_plugins();
        directory.load_plugins();

        assert_eq!(*seen.borrow(), vec!["alpha", "beta"]);
        assert_eq!(directory.widgets().len(), 2);
    }

    #[test]
    fn duplicate_names_resolve_to_first_tracked() {
        let registry = PluginRegistry::with_loader(Box::new(StemLoader));
        let mut directory = WidgetDirectory::new(registry);
        directory.register(LoadedWidget::builtin(Box::new(Tagged {
            name: "clock".into(),
            description: "first",
        })));
        directory.register(LoadedWidget::builtin(Box::new(Tagged {
            name: "clock".into(),
            description: "second",
        })));

        assert_eq!(directory.widgets().len(), 2);
        let found = directory.find_by_name("clock").unwrap();
        assert_eq!(found.metadata().description, "first");
        assert!(directory.find_by_name("weather").is_none());
    }
}
