//! Uabrowse - an OPC UA address-space browser and exporter
//!
//! This library walks a server's address space from a configured start node,
//! normalizes every reachable node into a flat record set, and serializes the
//! result as CSV, JSON or XML. Sources are pluggable behind the
//! [`source::Connection`] trait; the crate ships an in-memory demo space and
//! a replay source for previously captured JSON exports.

use thiserror::Error;

pub mod browse;
pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod model;
pub mod namespace;
pub mod output;
pub mod source;
pub mod stats;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum UaBrowseError {
    /// Malformed node id
    #[error("Node id error: {0}")]
    NodeId(#[from] model::NodeIdError),
    /// Source or connection error
    #[error("Source error: {0}")]
    Source(#[from] source::SourceError),
    /// Export serialization or I/O error
    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A browse session that did not complete
    #[error("Browse session failed: {0}")]
    SessionFailed(String),
}

impl UaBrowseError {
    /// Process exit code for this error
    ///
    /// Invalid arguments exit with 2; operational failures with 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NodeId(_) | Self::InvalidInput(_) => 2,
            _ => 1,
        }
    }

    /// Operator hint for source errors naming a well-known status code
    #[must_use]
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::Source(e) => e.remediation(),
            _ => None,
        }
    }
}
