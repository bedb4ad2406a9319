//! Widget plugin hosting for the dashboard.
//!
//! [`PluginRegistry`] scans search paths for plugin binaries and keeps each
//! loaded module alive for the rest of the session. [`WidgetDirectory`] sits
//! on top of it and is what the canvas queries for widget kinds by name.

mod directory;
mod error;
mod module;
mod registry;

pub use directory::WidgetDirectory;
pub use error::HostError;
pub use module::{DylibLoader, LoadedWidget, ModuleLoader, WidgetRef};
pub use registry::{default_search_paths, LoadReport, PluginRegistry};
