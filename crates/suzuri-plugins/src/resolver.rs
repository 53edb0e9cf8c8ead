//! Dependency resolution for install requests
//!
//! Expands a requested plugin set into the transitive set of native/data
//! archives to download, excluding anything already installed. The walk is
//! an explicit worklist with a visited set, so diamond dependencies are
//! expanded once and a cyclic catalog terminates instead of recursing
//! forever.

use std::collections::HashSet;

use suzuri_core::types::ResolvedArtifacts;
use tracing::debug;

use crate::catalog::Catalog;
use crate::state::InstalledStateReader;

/// Expands install requests against the catalog and installed state
pub struct DependencyResolver<'a> {
    catalog: &'a Catalog,
    state: &'a InstalledStateReader,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(catalog: &'a Catalog, state: &'a InstalledStateReader) -> Self {
        Self { catalog, state }
    }

    /// Artifact sets needed to satisfy `requested` and its transitive
    /// dependencies.
    ///
    /// Installed plugins are skipped entirely; their dependencies were
    /// satisfied when they were installed. Ids missing from the catalog are
    /// ignored. Membership is the contract; the sets carry no ordering.
    pub fn resolve(&self, requested: &HashSet<String>) -> ResolvedArtifacts {
        let mut artifacts = ResolvedArtifacts::default();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut worklist: Vec<&str> = requested.iter().map(String::as_str).collect();

        while let Some(id) = worklist.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(entry) = self.catalog.lookup(id) else {
                debug!("Ignoring unknown plugin {}", id);
                continue;
            };
            if self.state.is_installed(id) {
                debug!("Skipping installed plugin {}", id);
                continue;
            }
            // Every catalog entry is assumed to ship a data tarball.
            artifacts.data.insert(entry.id.clone());
            if entry.native {
                artifacts.native.insert(entry.id.clone());
            }
            worklist.extend(entry.dependencies.iter().map(String::as_str));
        }

        artifacts
    }
}
