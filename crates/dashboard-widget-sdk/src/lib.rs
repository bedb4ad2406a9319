//! Dashboard Widget SDK
//! ====================
//!
//! Types shared between the dashboard host and widget plugins: geometry
//! primitives, widget metadata, the [`WidgetCapability`] contract, and the
//! entry-point macro a plugin library uses to export its capability.

mod capability;
mod geometry;

pub use capability::{
    HostSurface, WidgetCapability, WidgetContent, WidgetExport, WidgetMetadata, WidgetState,
};
pub use geometry::{bound, Point, Rect, Size};

/// Bumped whenever [`WidgetCapability`] or [`WidgetExport`] change shape.
pub const DASHBOARD_WIDGET_ABI_VERSION: u32 = 1;

/// Symbol returning a heap-allocated [`WidgetExport`].
pub const ENTRY_SYMBOL: &[u8] = b"dashboard_widget_entry\0";

/// Symbol returning the [`DASHBOARD_WIDGET_ABI_VERSION`] the plugin was built against.
pub const ABI_VERSION_SYMBOL: &[u8] = b"dashboard_widget_abi_version\0";

pub type WidgetEntryPoint = unsafe extern "C" fn() -> *mut WidgetExport;
pub type AbiVersionFn = unsafe extern "C" fn() -> u32;

/// Common imports for widget authors.
pub mod prelude {
    pub use crate::{
        HostSurface, Point, Size, WidgetCapability, WidgetContent, WidgetMetadata, WidgetState,
    };
}

/// Declare the entry point of a dynamic widget plugin.
///
/// The expression must evaluate to a type implementing [`WidgetCapability`].
/// Host and plugin have to be built by the same compiler, since the trait
/// object crosses the library boundary as-is.
///
/// # Example
///
/// ```ignore
/// use dashboard_widget_sdk::declare_dashboard_widget;
///
/// struct Clock;
///
/// impl WidgetCapability for Clock { /* ... */ }
///
/// declare_dashboard_widget!(Clock);
/// ```
#[macro_export]
macro_rules! declare_dashboard_widget {
    ($capability:expr) => {
        #[no_mangle]
        pub extern "C" fn dashboard_widget_abi_version() -> u32 {
            $crate::DASHBOARD_WIDGET_ABI_VERSION
        }

        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn dashboard_widget_entry() -> *mut $crate::WidgetExport {
            let export = $crate::WidgetExport::new(Box::new($capability));
            Box::into_raw(Box::new(export))
        }
    };
}
