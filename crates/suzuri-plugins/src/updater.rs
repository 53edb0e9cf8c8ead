//! Batch install/update orchestration
//!
//! Ties the pieces together for one batch: build the archive addresses for
//! the resolved artifact sets, run the concurrent download with aggregate
//! progress, then hand the completed batch to the applier. Used both for
//! fresh installs (artifacts from the dependency resolver) and updates
//! (artifacts from an update plan).

use std::collections::HashSet;

use anyhow::Result;
use suzuri_core::types::{Component, InstallOutcome, ResolvedArtifacts};
use suzuri_core::{PluginPaths, RemoteSource};
use tracing::debug;

use crate::downloader::{DownloadManager, ProgressFn};
use crate::installer::InstallApplier;
use crate::state::InstalledStateReader;

/// Downloads and applies one batch of plugin archives
pub struct Updater {
    source: RemoteSource,
    native: Vec<String>,
    data: Vec<String>,
}

impl Updater {
    pub fn new(source: RemoteSource, artifacts: &ResolvedArtifacts) -> Self {
        let mut native: Vec<String> = artifacts.native.iter().cloned().collect();
        let mut data: Vec<String> = artifacts.data.iter().cloned().collect();
        native.sort();
        data.sort();
        Self {
            source,
            native,
            data,
        }
    }

    /// Run the batch to completion and report per-plugin results
    pub async fn run(
        &self,
        paths: &PluginPaths,
        on_progress: Option<ProgressFn>,
    ) -> Result<InstallOutcome> {
        let addresses: Vec<String> = self
            .native
            .iter()
            .map(|id| self.source.archive_address(id, Component::Native))
            .chain(
                self.data
                    .iter()
                    .map(|id| self.source.archive_address(id, Component::Data)),
            )
            .collect();
        debug!(
            "Updating {} native and {} data archives",
            self.native.len(),
            self.data.len()
        );

        let manager = DownloadManager::new(paths.cache_dir())?;
        let downloads = manager.download(&addresses, on_progress).await;

        let state = InstalledStateReader::new(paths.clone());
        let applier = InstallApplier::new(paths, &state);
        Ok(applier.apply(&self.native, &self.data, &downloads, &self.source))
    }
}

/// Input methods to auto-enable after a first install.
///
/// Only explicitly requested plugins contribute; dependencies pulled in by
/// resolution never auto-enable anything. A plugin contributes only when
/// every component it was scheduled for installed successfully.
pub fn auto_add_input_methods(
    requested: &HashSet<String>,
    outcome: &InstallOutcome,
    state: &InstalledStateReader,
) -> Vec<String> {
    let mut ids: Vec<&String> = requested.iter().collect();
    ids.sort();

    let mut methods = Vec::new();
    for id in ids {
        if outcome.succeeded(id) {
            methods.extend(state.input_methods_of(id));
        }
    }
    methods
}
