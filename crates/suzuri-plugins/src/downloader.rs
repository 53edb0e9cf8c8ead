//! Concurrent download manager with disk caching
//!
//! Each distinct cache key in a batch is fetched by its own task; the
//! batch result is a join barrier that reports one terminal
//! success/failure per address after every job finishes. Addresses
//! sharing a cache key share one fetch and one result. One job failing
//! never cancels the rest.
//!
//! Caching: a file already present at the cache destination is an
//! immediate success with no network access, and stays in place until the
//! installer consumes it. In-flight payloads stream to a `.part` sibling
//! and are renamed only on completion, so an abandoned batch never leaves
//! a partial file that would later read as a valid cache hit.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("suzuri/", env!("CARGO_PKG_VERSION"));

/// Aggregate progress callback; receives a ratio in `[0, 1]`
pub type ProgressFn = Arc<dyn Fn(f64) + Send + Sync>;

/// Per-job byte counters behind a single lock.
///
/// Progress ticks arrive from every in-flight job; serializing them here
/// keeps updates from being lost or torn.
#[derive(Default)]
struct ProgressState {
    received: HashMap<String, u64>,
    expected: HashMap<String, u64>,
}

impl ProgressState {
    /// Record one tick and return the new aggregate ratio
    fn update(&mut self, address: &str, received: u64, expected: u64) -> f64 {
        self.received.insert(address.to_string(), received);
        self.expected.insert(address.to_string(), expected);

        let total: u64 = self.expected.values().sum();
        if total == 0 {
            // Nothing has announced a size yet; read as complete rather
            // than dividing by zero.
            return 1.0;
        }
        let done: u64 = self.received.values().sum();
        (done as f64 / total as f64).min(1.0)
    }
}

/// Fetches archive batches into the download cache
pub struct DownloadManager {
    client: reqwest::Client,
    cache_dir: PathBuf,
}

impl DownloadManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Fetch every address, returning one terminal result per address once
    /// all jobs have finished.
    pub async fn download(
        &self,
        addresses: &[String],
        on_progress: Option<ProgressFn>,
    ) -> HashMap<String, bool> {
        if let Err(err) = tokio::fs::create_dir_all(&self.cache_dir).await {
            warn!(
                "Failed to create cache directory {}: {}",
                self.cache_dir.display(),
                err
            );
        }

        // One fetch per cache key; addresses sharing a key would otherwise
        // race on the same cache file.
        let mut results: HashMap<String, bool> = HashMap::new();
        let mut fetches: HashMap<String, &String> = HashMap::new();
        for address in addresses {
            match cache_key(address) {
                Some(key) => {
                    fetches.entry(key).or_insert(address);
                }
                None => {
                    warn!("Unusable download address {}", address);
                    results.insert(address.clone(), false);
                }
            }
        }

        let progress = Arc::new(Mutex::new(ProgressState::default()));
        let jobs = fetches.iter().map(|(file_name, address)| {
            let progress = Arc::clone(&progress);
            let on_progress = on_progress.clone();
            async move {
                let ok = self
                    .fetch_one(address.as_str(), file_name, progress, on_progress)
                    .await;
                (file_name.clone(), ok)
            }
        });
        let outcomes: HashMap<String, bool> =
            futures::future::join_all(jobs).await.into_iter().collect();

        for address in addresses {
            if let Some(key) = cache_key(address) {
                if let Some(ok) = outcomes.get(&key) {
                    results.insert(address.clone(), *ok);
                }
            }
        }
        results
    }

    async fn fetch_one(
        &self,
        address: &str,
        file_name: &str,
        progress: Arc<Mutex<ProgressState>>,
        on_progress: Option<ProgressFn>,
    ) -> bool {
        let destination = self.cache_dir.join(file_name);
        if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            info!("Using cached {}", file_name);
            return true;
        }

        match self
            .fetch_to_cache(address, file_name, &destination, progress, on_progress)
            .await
        {
            Ok(()) => {
                info!("Downloaded {}", file_name);
                true
            }
            Err(err) => {
                warn!("Download of {} failed: {:#}", address, err);
                false
            }
        }
    }

    async fn fetch_to_cache(
        &self,
        address: &str,
        file_name: &str,
        destination: &Path,
        progress: Arc<Mutex<ProgressState>>,
        on_progress: Option<ProgressFn>,
    ) -> Result<()> {
        let response = self
            .client
            .get(address)
            .send()
            .await
            .context("request failed")?;
        if !response.status().is_success() {
            bail!("HTTP {}", response.status());
        }
        let expected = response.content_length().unwrap_or(0);

        let partial = self.cache_dir.join(format!("{}.part", file_name));
        let mut file = tokio::fs::File::create(&partial)
            .await
            .context("failed to create cache file")?;

        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.context("failed to read download chunk")?;
            file.write_all(&chunk)
                .await
                .context("failed to write cache file")?;
            received += chunk.len() as u64;

            if let Some(callback) = &on_progress {
                let ratio = progress
                    .lock()
                    .expect("progress lock poisoned")
                    .update(address, received, expected);
                callback(ratio);
            }
        }
        file.flush().await.context("failed to flush cache file")?;
        drop(file);

        tokio::fs::rename(&partial, destination)
            .await
            .context("failed to move download into cache")?;
        Ok(())
    }
}

/// Cache key for an address: the file name component of its URL, stable
/// across runs
fn cache_key(address: &str) -> Option<String> {
    let name = address.rsplit('/').next()?;
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}
