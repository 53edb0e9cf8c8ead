//! Filesystem layout and remote source addressing
//!
//! The plugin library directory holds everything the subsystem touches:
//! - `plugin/`: one `<id>.json` descriptor per installed plugin
//! - `cache/`: downloaded archives awaiting extraction
//!
//! Archives are published per release tag as `<id>-<arch>.tar.bz2` (native)
//! and `<id>-any.tar.bz2` (data), next to a `meta-<arch>.json` manifest.

use anyhow::anyhow;
use std::path::{Path, PathBuf};

use crate::types::Component;

/// Architecture label used in archive and manifest names.
///
/// Upstream publishes `arm64` rather than `aarch64`.
pub fn arch() -> &'static str {
    match std::env::consts::ARCH {
        "aarch64" => "arm64",
        other => other,
    }
}

/// File name of a plugin archive, also used as its cache key
pub fn archive_file_name(id: &str, component: Component) -> String {
    match component {
        Component::Native => format!("{}-{}.tar.bz2", id, arch()),
        Component::Data => format!("{}-any.tar.bz2", id),
    }
}

/// Locations of the plugin library, descriptors, and download cache
#[derive(Debug, Clone)]
pub struct PluginPaths {
    library_dir: PathBuf,
}

impl PluginPaths {
    /// Create paths rooted at an explicit library directory
    pub fn new(library_dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: library_dir.into(),
        }
    }

    /// Default library location under the platform data directory
    pub fn default_location() -> anyhow::Result<Self> {
        let data_dir =
            dirs::data_dir().ok_or_else(|| anyhow!("Could not determine data directory"))?;
        Ok(Self::new(data_dir.join("suzuri")))
    }

    /// Root directory plugin archives extract into
    pub fn library_dir(&self) -> &Path {
        &self.library_dir
    }

    /// Directory of installed-plugin descriptors
    pub fn plugin_dir(&self) -> PathBuf {
        self.library_dir.join("plugin")
    }

    /// Directory downloaded archives are cached in
    pub fn cache_dir(&self) -> PathBuf {
        self.library_dir.join("cache")
    }

    /// Descriptor file for one plugin
    pub fn descriptor_path(&self, id: &str) -> PathBuf {
        self.plugin_dir().join(format!("{}.json", id))
    }
}

/// Base address plugin archives and the version manifest are published at
#[derive(Debug, Clone)]
pub struct RemoteSource {
    base_url: String,
}

impl RemoteSource {
    /// Create a source from a base URL; a trailing slash is appended when
    /// missing
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// Official release source for a given release tag
    pub fn official(tag: &str) -> Self {
        Self::new(format!(
            "https://github.com/suzuri-im/suzuri-plugins/releases/download/{}/",
            tag
        ))
    }

    /// Download address of one plugin archive
    pub fn archive_address(&self, id: &str, component: Component) -> String {
        format!("{}{}", self.base_url, archive_file_name(id, component))
    }

    /// Address of the per-architecture version manifest
    pub fn manifest_address(&self) -> String {
        format!("{}meta-{}.json", self.base_url, arch())
    }
}
