//! Error types for suzuri-core

use thiserror::Error;

/// Result type alias using suzuri-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the plugin subsystem
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The remote manifest could not be fetched or parsed.
    ///
    /// Distinct from an empty update plan: "could not determine" is never
    /// conflated with "up to date".
    #[error("Update check failed: {reason}")]
    CheckFailed { reason: String },

    /// Plugin id not present in the catalog
    #[error("Unknown plugin: {id}")]
    UnknownPlugin { id: String },

    /// Archive extraction failure
    #[error("Failed to extract {archive}: {message}")]
    Extraction { archive: String, message: String },
}

impl Error {
    /// Create a check failed error
    pub fn check_failed(reason: impl Into<String>) -> Self {
        Self::CheckFailed {
            reason: reason.into(),
        }
    }

    /// Create an unknown plugin error
    pub fn unknown_plugin(id: impl Into<String>) -> Self {
        Self::UnknownPlugin { id: id.into() }
    }

    /// Create an extraction error
    pub fn extraction(archive: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            archive: archive.into(),
            message: message.into(),
        }
    }
}
