//! Plugin management for Suzuri
//!
//! This crate handles:
//! - The built-in catalog of known plugins
//! - Installed-plugin descriptor reading
//! - Dependency resolution for install requests
//! - Remote manifest checks for stale components
//! - Concurrent, cached archive downloads
//! - Archive extraction and reference-counted removal

pub mod catalog;
pub mod checker;
pub mod downloader;
pub mod installer;
pub mod resolver;
pub mod state;
pub mod uninstaller;
pub mod updater;

pub use catalog::{Catalog, CatalogEntry};
pub use checker::RemoteManifestChecker;
pub use downloader::{DownloadManager, ProgressFn};
pub use installer::InstallApplier;
pub use resolver::DependencyResolver;
pub use state::InstalledStateReader;
pub use uninstaller::UninstallCoordinator;
pub use updater::{auto_add_input_methods, Updater};
