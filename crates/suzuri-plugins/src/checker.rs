//! Remote manifest reconciliation
//!
//! Fetches the per-architecture `meta-<arch>.json` manifest and compares
//! published versions against the locally installed plugins. Only
//! installed plugins are considered; a manifest entry for something not
//! installed never makes the plan. Comparison is exact string inequality,
//! no semantic version ordering.

use std::time::Duration;

use suzuri_core::types::{Component, RemoteManifest, UpdatePlan};
use suzuri_core::{Error, RemoteSource, Result};
use tracing::{debug, info};

use crate::state::InstalledStateReader;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Determines which installed plugins are stale against the remote manifest
pub struct RemoteManifestChecker {
    client: reqwest::Client,
    source: RemoteSource,
}

impl RemoteManifestChecker {
    pub fn new(source: RemoteSource) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|err| Error::check_failed(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client, source })
    }

    /// Fetch the manifest and diff it against the installed versions.
    ///
    /// Any fetch or parse failure is reported as `Error::CheckFailed`;
    /// callers must not read that as "everything is up to date".
    pub async fn check_for_updates(&self, state: &InstalledStateReader) -> Result<UpdatePlan> {
        let url = self.source.manifest_address();
        debug!("Fetching plugin manifest from {}", url);
        let manifest = self.fetch_manifest(&url).await?;
        let plan = diff(&manifest, state);
        info!(
            "{} native and {} data components are stale",
            plan.stale_native.len(),
            plan.stale_data.len()
        );
        Ok(plan)
    }

    async fn fetch_manifest(&self, url: &str) -> Result<RemoteManifest> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| Error::check_failed(format!("manifest request failed: {err}")))?;
        if !response.status().is_success() {
            return Err(Error::check_failed(format!(
                "manifest request returned HTTP {}",
                response.status()
            )));
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| Error::check_failed(format!("manifest read failed: {err}")))?;
        serde_json::from_slice(&body)
            .map_err(|err| Error::check_failed(format!("malformed manifest: {err}")))
    }
}

/// Compare published versions against installed ones.
///
/// A plugin is native-stale only when the manifest publishes a native
/// version at all (data-only plugins never are) and it differs from the
/// local one.
fn diff(manifest: &RemoteManifest, state: &InstalledStateReader) -> UpdatePlan {
    let native_versions = manifest.native_versions();
    let data_versions = manifest.data_versions();

    let mut plan = UpdatePlan::default();
    for id in state.installed() {
        if let Some(&published) = native_versions.get(id.as_str()) {
            if published != state.version(&id, Component::Native) {
                plan.stale_native.insert(id.clone());
            }
        }
        if let Some(&published) = data_versions.get(id.as_str()) {
            if published != state.version(&id, Component::Data) {
                plan.stale_data.insert(id.clone());
            }
        }
    }
    plan
}
