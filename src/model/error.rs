//! Model-specific error types
//!
//! Covers node id syntax validation, which happens locally before any
//! server round-trip.

use thiserror::Error;

/// Node id validation errors
#[derive(Debug, Error)]
pub enum NodeIdError {
    /// The text does not match any accepted node id form
    #[error(
        "Invalid node id format: '{0}'. Expected 'i=N', 'ns=K;i=N', 'ns=K;s=STRING', \
         'ns=K;g=GUID' or 'ns=K;b=BASE64'"
    )]
    InvalidFormat(String),

    /// Numeric identifier value is not a valid unsigned integer
    #[error("Invalid numeric identifier in node id: '{0}'")]
    InvalidNumeric(String),

    /// GUID identifier is not a well-formed UUID
    #[error("Invalid GUID identifier in node id: '{0}'")]
    InvalidGuid(String),

    /// Namespace index does not fit in 16 bits
    #[error("Namespace index out of range in node id: '{0}'")]
    NamespaceOutOfRange(String),
}
