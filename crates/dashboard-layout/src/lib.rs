//! Persistent dashboard state: widget layout, per-instance widget data and
//! user settings, all stored as JSON under one configuration root.

mod error;
mod instance_data;
mod layout_store;
mod paths;
mod record;
mod settings;

pub use error::StoreError;
pub use instance_data::InstanceDataStore;
pub use layout_store::LayoutStore;
pub use paths::DashboardPaths;
pub use record::LayoutRecord;
pub use settings::DashboardSettings;
