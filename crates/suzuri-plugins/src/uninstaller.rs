//! Reference-counted plugin removal
//!
//! A file is deleted only when no remaining installed plugin still lists
//! it. The kept-file accounting is computed from the full installed set
//! before any deletion begins, so partially-completed deletions within the
//! same batch cannot miscount a file as unreferenced. Deletion failures
//! are logged and skipped; the descriptor is removed regardless, since
//! descriptor absence is the dominant signal of "uninstalled".

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::state::InstalledStateReader;

/// Removes plugins without deleting files still owned by others
pub struct UninstallCoordinator<'a> {
    state: &'a InstalledStateReader,
}

impl<'a> UninstallCoordinator<'a> {
    pub fn new(state: &'a InstalledStateReader) -> Self {
        Self { state }
    }

    /// Best-effort removal of the given plugins; plugins not in `ids` are
    /// untouched
    pub fn uninstall(&self, ids: &HashSet<String>) {
        let paths = self.state.paths();

        // Union of files owned by every plugin that stays installed.
        let mut kept = HashSet::new();
        for id in self.state.installed() {
            if ids.contains(&id) {
                continue;
            }
            kept.extend(self.state.files_of(&id));
        }

        let mut removed_ids: Vec<&String> = ids.iter().collect();
        removed_ids.sort();

        let mut deleted = HashSet::new();
        for id in removed_ids {
            if !self.state.is_installed(id) {
                debug!("Plugin {} is not installed, nothing to remove", id);
                continue;
            }
            for file in self.state.files_of(id) {
                if kept.contains(&file) {
                    debug!("Keeping {} still owned by another plugin", file);
                    continue;
                }
                if !deleted.insert(file.clone()) {
                    // Shared between two plugins in this removal batch and
                    // already gone.
                    continue;
                }
                let path = paths.library_dir().join(&file);
                if let Err(err) = std::fs::remove_file(&path) {
                    warn!("Failed to remove {}: {}", path.display(), err);
                }
            }
            let descriptor = paths.descriptor_path(id);
            if let Err(err) = std::fs::remove_file(&descriptor) {
                warn!("Failed to remove descriptor {}: {}", descriptor.display(), err);
            } else {
                info!("Uninstalled {}", id);
            }
        }
    }
}
