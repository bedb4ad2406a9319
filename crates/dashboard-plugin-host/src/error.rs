use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading widget plugin modules.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("plugin binary not found at {0}")]
    MissingBinary(PathBuf),
    #[error("failed to load plugin library {path}: {source}")]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("{path} does not export the `{symbol}` entry point")]
    MissingEntry { path: PathBuf, symbol: &'static str },
    #[error("{path} was built for widget ABI {found}, host expects {expected}")]
    AbiMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("{0} returned a null widget export")]
    NullExport(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    pub(crate) fn missing_entry(path: PathBuf, symbol: &'static str) -> Self {
        HostError::MissingEntry { path, symbol }
    }

    /// True when the file loaded but is not a widget plugin, as opposed to a
    /// file that could not be loaded at all.
    pub fn is_interface_mismatch(&self) -> bool {
        matches!(
            self,
            HostError::MissingEntry { .. } | HostError::AbiMismatch { .. } | HostError::NullExport(_)
        )
    }
}
