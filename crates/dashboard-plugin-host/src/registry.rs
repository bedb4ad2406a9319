use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::module::{DylibLoader, ModuleLoader, WidgetRef};

/// Outcome of one discovery pass. Failures are per file and never abort the
/// pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub widgets: Vec<WidgetRef>,
    pub errors: Vec<HostError>,
}

/// Discovers widget plugin binaries on an ordered list of search paths and
/// keeps every successfully loaded module alive for as long as the registry
/// lives.
pub struct PluginRegistry {
    loader: Box<dyn ModuleLoader>,
    search_paths: Vec<PathBuf>,
    loaded: HashMap<PathBuf, WidgetRef>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRegistry {
    /// Registry backed by native libraries, seeded with the default search
    /// paths.
    pub fn new() -> Self {
        let mut registry = Self::with_loader(Box::new(DylibLoader));
        for path in default_search_paths() {
            registry.add_search_path(path);
        }
        registry
    }

    /// Registry with no search paths that loads files through `loader`.
    pub fn with_loader(loader: Box<dyn ModuleLoader>) -> Self {
        Self {
            loader,
            search_paths: Vec::new(),
            loaded: HashMap::new(),
        }
    }

    /// Append `path` unless already present. Order is scan order.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.search_paths.contains(&path) {
            self.search_paths.push(path);
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Number of modules currently held open.
    pub fn loaded_modules(&self) -> usize {
        self.loaded.len()
    }

    pub fn load_all(&mut self) -> Vec<WidgetRef> {
        self.load_all_with_report().widgets
    }

    pub fn load_all_with_report(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        let search_paths = self.search_paths.clone();
        for dir in &search_paths {
            if !dir.is_dir() {
                continue;
            }
            let files = match plugin_files(dir) {
                Ok(files) => files,
                Err(err) => {
                    warn!(path = %dir.display(), error = %err, "failed to read plugin directory");
                    report.errors.push(HostError::Io(err));
                    continue;
                }
            };
            for file in files {
                self.load_file(file, &mut report);
            }
        }
        report
    }

    fn load_file(&mut self, file: PathBuf, report: &mut LoadReport) {
        let key = fs::canonicalize(&file).unwrap_or(file);
        if let Some(widget) = self.loaded.get(&key) {
            report.widgets.push(Rc::clone(widget));
            return;
        }

        match self.loader.load(&key) {
            Ok(widget) => {
                info!(path = %key.display(), name = widget.name(), "loaded widget plugin");
                let widget = Rc::new(widget);
                self.loaded.insert(key, Rc::clone(&widget));
                report.widgets.push(widget);
            }
            Err(err) if err.is_interface_mismatch() => {
                warn!(path = %key.display(), error = %err, "plugin does not implement the widget interface");
                report.errors.push(err);
            }
            Err(err) => {
                warn!(path = %key.display(), error = %err, "failed to load plugin");
                report.errors.push(err);
            }
        }
    }
}

/// Plugins next to the executable, then the install-time plugin directory
/// when one was configured at build time.
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    match std::env::current_exe() {
        Ok(exe) => {
            if let Some(dir) = exe.parent() {
                paths.push(dir.join("plugins"));
            }
        }
        Err(err) => debug!(error = %err, "cannot resolve executable directory"),
    }
    if let Some(dir) = option_env!("DASHBOARD_PLUGIN_DIR") {
        paths.push(PathBuf::from(dir));
    }
    paths
}

fn plugin_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}
