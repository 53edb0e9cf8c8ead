//! Type definitions for installed descriptors, remote manifests, and
//! resolution/install results

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The two artifact kinds a plugin can ship.
///
/// A plugin always carries a data component; the native component only
/// exists for plugins with a platform-specific binary part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Platform/architecture-specific binary part
    Native,
    /// Architecture-independent data part
    Data,
}

/// On-disk record of one installed plugin
///
/// Serialized as `<id>.json` in the plugin directory. The descriptor file
/// is written by the plugin archive itself during extraction and is the
/// single source of truth for what is installed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstalledDescriptor {
    /// Native component version; absent for data-only plugins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Data component version
    #[serde(default)]
    pub data_version: String,

    /// Repository-relative paths written by this plugin's archives
    #[serde(default)]
    pub files: Vec<String>,

    /// Input methods to activate on first install
    #[serde(default)]
    pub input_methods: Vec<String>,
}

/// Remote per-architecture manifest listing published plugin versions
///
/// Fetched fresh on every update check, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteManifest {
    #[serde(default)]
    pub plugins: Vec<RemoteManifestEntry>,
}

/// One published plugin in the remote manifest
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteManifestEntry {
    /// Catalog id
    pub name: String,

    /// Published data component version
    pub data_version: String,

    /// Published native component version; absent means the plugin is
    /// data-only
    #[serde(default)]
    pub version: Option<String>,
}

impl RemoteManifest {
    /// Map of plugin id to published native version, for plugins that
    /// publish one
    pub fn native_versions(&self) -> HashMap<&str, &str> {
        self.plugins
            .iter()
            .filter_map(|p| p.version.as_deref().map(|v| (p.name.as_str(), v)))
            .collect()
    }

    /// Map of plugin id to published data version
    pub fn data_versions(&self) -> HashMap<&str, &str> {
        self.plugins
            .iter()
            .map(|p| (p.name.as_str(), p.data_version.as_str()))
            .collect()
    }
}

/// Installed plugins whose local versions differ from the remote manifest
///
/// A plugin may appear in one set, both, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePlan {
    /// Plugins needing a native-component refresh
    pub stale_native: HashSet<String>,

    /// Plugins needing a data-component refresh
    pub stale_data: HashSet<String>,
}

impl UpdatePlan {
    /// True when every installed plugin matches the manifest
    pub fn is_empty(&self) -> bool {
        self.stale_native.is_empty() && self.stale_data.is_empty()
    }
}

/// Artifact sets a resolve or update pass decided to download
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedArtifacts {
    /// Plugins whose native archive must be fetched
    pub native: HashSet<String>,

    /// Plugins whose data archive must be fetched
    pub data: HashSet<String>,
}

impl ResolvedArtifacts {
    /// Artifacts for an update run, driven directly by the stale lists.
    ///
    /// Updates never pull in new, not-yet-installed dependencies, so no
    /// dependency expansion happens here.
    pub fn from_update_plan(plan: &UpdatePlan) -> Self {
        Self {
            native: plan.stale_native.clone(),
            data: plan.stale_data.clone(),
        }
    }

    /// True when there is nothing to download
    pub fn is_empty(&self) -> bool {
        self.native.is_empty() && self.data.is_empty()
    }
}

/// Per-plugin results of applying a download batch
#[derive(Debug, Clone, Default)]
pub struct InstallOutcome {
    /// Native archive extraction result per requested plugin
    pub native_results: HashMap<String, bool>,

    /// Data archive extraction result per requested plugin
    pub data_results: HashMap<String, bool>,
}

impl InstallOutcome {
    /// Whether every component that was requested for `id` installed
    /// successfully.
    ///
    /// A component the plugin was never scheduled for counts as success,
    /// so data-only plugins are not penalized for the missing native entry.
    pub fn succeeded(&self, id: &str) -> bool {
        self.native_results.get(id).copied().unwrap_or(true)
            && self.data_results.get(id).copied().unwrap_or(true)
    }

    /// Whether a refreshed native component is already loaded in the
    /// running process, which requires a restart to take effect.
    pub fn needs_restart<'a>(&self, in_memory: impl IntoIterator<Item = &'a str>) -> bool {
        in_memory
            .into_iter()
            .any(|id| self.native_results.get(id).copied().unwrap_or(false))
    }
}
