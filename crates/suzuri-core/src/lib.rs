//! # suzuri-core
//!
//! Core library for the Suzuri plugin subsystem providing:
//! - Type definitions for descriptors, manifests, and update plans
//! - Error taxonomy shared across the workspace
//! - Filesystem layout and remote source addressing

pub mod error;
pub mod layout;
pub mod types;

pub use error::{Error, Result};
pub use layout::{arch, archive_file_name, PluginPaths, RemoteSource};
pub use types::{
    Component, InstallOutcome, InstalledDescriptor, RemoteManifest, RemoteManifestEntry,
    ResolvedArtifacts, UpdatePlan,
};
