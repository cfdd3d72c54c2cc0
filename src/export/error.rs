//! Export-specific error types
//!
//! Everything that can go wrong between a completed browse result and a
//! finished artifact on disk: destination I/O and per-format serialization
//! failures.

use thiserror::Error;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Destination could not be created or written
    #[error("I/O error while writing export: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// XML serialization failed
    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),
}
