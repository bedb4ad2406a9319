use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dashboard_widget_sdk::{
    AbiVersionFn, WidgetCapability, WidgetEntryPoint, WidgetMetadata, ABI_VERSION_SYMBOL,
    DASHBOARD_WIDGET_ABI_VERSION, ENTRY_SYMBOL,
};
use libloading::Library;

use crate::error::HostError;

/// Shared handle to a loaded widget capability. Identity (not name) is what
/// distinguishes two handles.
pub type WidgetRef = Rc<LoadedWidget>;

/// A widget capability together with the module that provides its code.
pub struct LoadedWidget {
    // Field order matters: the capability must be dropped before the library
    // that holds its vtable is unloaded.
    capability: Box<dyn WidgetCapability>,
    metadata: WidgetMetadata,
    source: Option<PathBuf>,
    _library: Option<Library>,
}

impl LoadedWidget {
    /// Wrap a capability that is linked into the host binary.
    pub fn builtin(capability: Box<dyn WidgetCapability>) -> Self {
        let metadata = capability.metadata();
        Self {
            capability,
            metadata,
            source: None,
            _library: None,
        }
    }

    fn from_library(
        capability: Box<dyn WidgetCapability>,
        source: PathBuf,
        library: Library,
    ) -> Self {
        let metadata = capability.metadata();
        Self {
            capability,
            metadata,
            source: Some(source),
            _library: Some(library),
        }
    }

    pub fn capability(&self) -> &dyn WidgetCapability {
        self.capability.as_ref()
    }

    /// Metadata captured at load time; plugins declare it immutable.
    pub fn metadata(&self) -> &WidgetMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Path of the plugin binary, `None` for built-in widgets.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl fmt::Debug for LoadedWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedWidget")
            .field("name", &self.metadata.name)
            .field("source", &self.source)
            .finish()
    }
}

/// Turns a file on disk into a widget capability.
pub trait ModuleLoader {
    fn load(&self, path: &Path) -> Result<LoadedWidget, HostError>;
}

/// Loads widget plugins from native dynamic libraries.
#[derive(Debug, Default, Clone, Copy)]
pub struct DylibLoader;

impl ModuleLoader for DylibLoader {
    fn load(&self, path: &Path) -> Result<LoadedWidget, HostError> {
        if !path.exists() {
            return Err(HostError::MissingBinary(path.to_path_buf()));
        }

        // SAFETY: loading a plugin runs its initialisers; plugins are trusted
        // code installed by the user.
        let library = unsafe { Library::new(path) }.map_err(|source| HostError::LibraryLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let (abi_version, entry) = unsafe {
            let abi_version = *library
                .get::<AbiVersionFn>(ABI_VERSION_SYMBOL)
                .map_err(|_| {
                    HostError::missing_entry(path.to_path_buf(), "dashboard_widget_abi_version")
                })?;
            let entry = *library
                .get::<WidgetEntryPoint>(ENTRY_SYMBOL)
                .map_err(|_| HostError::missing_entry(path.to_path_buf(), "dashboard_widget_entry"))?;
            (abi_version, entry)
        };

        let found = unsafe { abi_version() };
        if found != DASHBOARD_WIDGET_ABI_VERSION {
            return Err(HostError::AbiMismatch {
                path: path.to_path_buf(),
                found,
                expected: DASHBOARD_WIDGET_ABI_VERSION,
            });
        }

        let raw = unsafe { entry() };
        if raw.is_null() {
            return Err(HostError::NullExport(path.to_path_buf()));
        }
        // SAFETY: the pointer was produced by `Box::into_raw` in
        // `declare_dashboard_widget!` and ownership is handed to us.
        let export = unsafe { Box::from_raw(raw) };
        Ok(LoadedWidget::from_library(
            export.into_capability(),
            path.to_path_buf(),
            library,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = DylibLoader.load(&dir.path().join("absent.so")).unwrap_err();
        assert!(matches!(err, HostError::MissingBinary(_)));
        assert!(!err.is_interface_mismatch());
    }

    #[test]
    fn non_library_file_fails_to_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "not a shared object").unwrap();
        let err = DylibLoader.load(&path).unwrap_err();
        assert!(matches!(err, HostError::LibraryLoad { .. }));
    }
}
