//! Archive extraction into the plugin library
//!
//! Applies a completed download batch plugin by plugin: each successfully
//! downloaded `.tar.bz2` is unpacked into the library directory, and one
//! plugin's failure never blocks the others. The cached archive is deleted
//! after the attempt regardless of outcome, so a failed extraction cannot
//! be silently retried from a stale cache; the caller must re-download.
//!
//! Archives are trusted to place files under the correct relative
//! subpaths, including the plugin's own descriptor; no validation happens
//! beyond the extraction itself.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use suzuri_core::types::{Component, InstallOutcome};
use suzuri_core::{archive_file_name, PluginPaths, RemoteSource};
use tar::Archive;
use tracing::{error, info, warn};

use crate::state::InstalledStateReader;

/// Extracts downloaded plugin archives into the library directory
pub struct InstallApplier<'a> {
    paths: &'a PluginPaths,
    state: &'a InstalledStateReader,
}

impl<'a> InstallApplier<'a> {
    pub fn new(paths: &'a PluginPaths, state: &'a InstalledStateReader) -> Self {
        Self { paths, state }
    }

    /// Apply a completed download batch.
    ///
    /// `downloads` maps archive addresses to their download result. Every
    /// requested plugin gets an entry in the outcome, defaulted to false
    /// when its address never produced a download result.
    pub fn apply(
        &self,
        native: &[String],
        data: &[String],
        downloads: &HashMap<String, bool>,
        source: &RemoteSource,
    ) -> InstallOutcome {
        let mut outcome = InstallOutcome::default();
        for id in native {
            let ok = self.apply_one(id, Component::Native, downloads, source);
            outcome.native_results.insert(id.clone(), ok);
        }
        for id in data {
            let ok = self.apply_one(id, Component::Data, downloads, source);
            outcome.data_results.insert(id.clone(), ok);
        }
        outcome
    }

    fn apply_one(
        &self,
        id: &str,
        component: Component,
        downloads: &HashMap<String, bool>,
        source: &RemoteSource,
    ) -> bool {
        let address = source.archive_address(id, component);
        let file_name = archive_file_name(id, component);
        if !downloads.get(&address).copied().unwrap_or(false) {
            error!("Failed to download {}", file_name);
            return false;
        }
        if self.extract(id, &file_name) {
            info!("Successfully installed {}", file_name);
            true
        } else {
            error!("Failed to extract {}", file_name);
            false
        }
    }

    /// Unpack one cached archive, then drop the cache file either way
    fn extract(&self, id: &str, file_name: &str) -> bool {
        let old_files = self.state.files_of(id);

        let archive_path = self.paths.cache_dir().join(file_name);
        let result = self.unpack(&archive_path);
        if let Err(err) = std::fs::remove_file(&archive_path) {
            warn!(
                "Failed to remove cached {}: {}",
                archive_path.display(),
                err
            );
        }

        match result {
            Ok(()) => {
                self.prune_stale_files(id, &old_files);
                true
            }
            Err(err) => {
                warn!("Extraction of {} failed: {:#}", file_name, err);
                false
            }
        }
    }

    fn unpack(&self, archive_path: &Path) -> Result<()> {
        std::fs::create_dir_all(self.paths.library_dir())
            .context("failed to create library directory")?;
        let file = File::open(archive_path).context("failed to open cached archive")?;
        let mut tarball = Archive::new(BzDecoder::new(file));
        tarball
            .unpack(self.paths.library_dir())
            .context("failed to extract tarball")
    }

    /// Remove files the previous version owned that the freshly extracted
    /// descriptor no longer lists
    fn prune_stale_files(&self, id: &str, old_files: &HashSet<String>) {
        let new_files = self.state.files_of(id);
        for file in old_files.difference(&new_files) {
            info!("Removing {} which is no longer needed", file);
            let path = self.paths.library_dir().join(file);
            if let Err(err) = std::fs::remove_file(&path) {
                warn!("Failed to remove {}: {}", path.display(), err);
            }
        }
    }
}
