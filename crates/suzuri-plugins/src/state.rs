//! Installed-plugin state reading
//!
//! The plugin directory holds one `<id>.json` descriptor per installed
//! plugin and is the single source of truth; nothing here caches state
//! across calls. All access is read-only. A malformed descriptor is
//! treated as "no information" (empty version, empty file list), never as
//! an error that aborts the caller.

use std::collections::HashSet;
use std::path::PathBuf;

use suzuri_core::types::{Component, InstalledDescriptor};
use suzuri_core::PluginPaths;
use tracing::warn;

/// Read-only view of the installed-plugin descriptors
pub struct InstalledStateReader {
    paths: PluginPaths,
}

impl InstalledStateReader {
    pub fn new(paths: PluginPaths) -> Self {
        Self { paths }
    }

    /// The filesystem layout this reader scans
    pub fn paths(&self) -> &PluginPaths {
        &self.paths
    }

    /// Ids of every plugin with a descriptor file, sorted
    pub fn installed(&self) -> Vec<String> {
        let mut ids = Vec::new();
        let Ok(entries) = std::fs::read_dir(self.paths.plugin_dir()) else {
            return ids;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        ids
    }

    /// Whether a descriptor exists for `id`
    pub fn is_installed(&self, id: &str) -> bool {
        self.paths.descriptor_path(id).is_file()
    }

    /// Read and parse one descriptor; None when missing or malformed
    pub fn read(&self, id: &str) -> Option<InstalledDescriptor> {
        let path = self.paths.descriptor_path(id);
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(descriptor) => Some(descriptor),
            Err(err) => {
                warn!("Skipped invalid descriptor {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Installed version of one component; empty when absent or unreadable
    pub fn version(&self, id: &str, component: Component) -> String {
        match (self.read(id), component) {
            (Some(descriptor), Component::Native) => descriptor.version.unwrap_or_default(),
            (Some(descriptor), Component::Data) => descriptor.data_version,
            (None, _) => String::new(),
        }
    }

    /// Files owned by one plugin; empty when the descriptor is missing or
    /// unparsable
    pub fn files_of(&self, id: &str) -> HashSet<String> {
        self.read(id)
            .map(|descriptor| descriptor.files.into_iter().collect())
            .unwrap_or_default()
    }

    /// Input methods the plugin wants enabled on first install
    pub fn input_methods_of(&self, id: &str) -> Vec<String> {
        self.read(id)
            .map(|descriptor| descriptor.input_methods)
            .unwrap_or_default()
    }

    /// Descriptor file path for one plugin
    pub fn descriptor_path(&self, id: &str) -> PathBuf {
        self.paths.descriptor_path(id)
    }
}
