//! Address-space sources
//!
//! The browse engine talks to a server through the [`Connection`] trait, a
//! narrow read-only seam: namespace array, per-node attribute reads and
//! forward hierarchical children. Live network transport is an external
//! collaborator behind this trait; this crate ships two concrete sources of
//! its own:
//!
//! - [`StaticSource`]: an in-memory address space with a builder API and
//!   failure injection, backing the built-in `demo` endpoint and the tests
//! - [`ReplaySource`]: rebuilds a space from a previously exported JSON
//!   capture, so captures can be re-browsed and re-exported offline
//!
//! Connection parameters (endpoint, security policy and mode, credentials)
//! are collected into one validated [`ConnectOptions`] value; validation
//! failures surface before any endpoint is touched.

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::model::{ExtendedAttributes, NodeClass, NodeId};

pub mod replay;
pub mod static_source;

pub use replay::ReplaySource;
pub use static_source::{StaticNode, StaticSource};

/// Core attributes of one node, as answered by a source
///
/// `data_type` and values are read separately so a source can fail them
/// independently of the core attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttributes {
    pub browse_name: String,
    pub display_name: String,
    pub node_class: NodeClass,
}

/// Read-only view of a server address space
///
/// One connection serves one browse session at a time; all methods are
/// plain request/response round-trips. Implementations report transport
/// loss as [`SourceError::Connection`] from whichever call observes it.
pub trait Connection: std::fmt::Debug {
    /// The server's ordered namespace array
    fn namespace_array(&self) -> Result<Vec<String>, SourceError>;

    /// Core attributes (browse name, display name, node class) of a node
    fn read_attributes(&self, id: &NodeId) -> Result<NodeAttributes, SourceError>;

    /// Data type name of a Variable node
    fn read_data_type(&self, id: &NodeId) -> Result<String, SourceError>;

    /// Current value of a Variable node, rendered as text
    fn read_value(&self, id: &NodeId) -> Result<String, SourceError>;

    /// Extended attributes of a node, for full exports
    fn read_extended(&self, id: &NodeId) -> Result<ExtendedAttributes, SourceError>;

    /// Forward hierarchical children of a node, in server order
    fn children(&self, id: &NodeId) -> Result<Vec<NodeId>, SourceError>;
}

/// Source and connection errors
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure; aborts the session
    #[error("Connection error: {0}")]
    Connection(String),

    /// Security policy, mode or certificate problem; aborts the session
    #[error("Security error: {0}")]
    Security(String),

    /// Credential problem; aborts the session
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Server does not know the node
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// One attribute read failed; recovered in place by the engine
    #[error("Attribute unavailable on {node}: {reason}")]
    AttributeUnavailable { node: NodeId, reason: String },
}

/// Operator hints for well-known OPC UA status code names
const REMEDIATION: &[(&str, &str)] = &[
    ("BadIdentityTokenRejected", "Check username/password and server user permissions"),
    ("BadUserAccessDenied", "User doesn't have permission to access this resource"),
    ("BadIdentityTokenInvalid", "Identity token is malformed or invalid"),
    ("BadCertificateUriInvalid", "Certificate Application URI doesn't match client configuration"),
    ("BadSecurityChecksFailed", "Server rejected the certificate - ensure it's in the server's trust list"),
    ("BadCertificateInvalid", "Certificate is invalid, expired, or not trusted"),
    ("BadSecurityModeRejected", "Server doesn't support the requested security mode"),
    ("BadSessionIdInvalid", "Session expired or was closed by the server"),
    ("BadSessionClosed", "Session was closed - reconnection required"),
    ("BadTimeout", "Connection timeout - check network connectivity and server status"),
    ("BadConnectionClosed", "Connection was closed unexpectedly"),
    ("BadTcpEndpointUrlInvalid", "Server URL format is invalid"),
    ("BadNodeIdUnknown", "Node does not exist in the server address space"),
    ("BadNodeIdInvalid", "Node id format is invalid"),
    ("BadServerHalted", "Server is halted or shutting down"),
    ("BadTooManyOperations", "Too many operations requested - reduce browse depth"),
];

impl SourceError {
    /// True for errors that terminate the whole session rather than one node
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Security(_) | Self::Auth(_))
    }

    /// Operator hint when the message names a well-known OPC UA status code
    #[must_use]
    pub fn remediation(&self) -> Option<&'static str> {
        let message = match self {
            Self::Connection(m) | Self::Security(m) | Self::Auth(m) => m.as_str(),
            Self::AttributeUnavailable { reason, .. } => reason.as_str(),
            Self::NodeNotFound(_) => return Some("Node does not exist in the server address space"),
        };
        REMEDIATION
            .iter()
            .find(|(code, _)| message.contains(code))
            .map(|(_, hint)| *hint)
    }
}

/// OPC UA security policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SecurityPolicy {
    /// Plain connection, no encryption
    None,
    /// Legacy RSA encryption (deprecated)
    Basic256,
    /// Legacy encryption (deprecated)
    Basic128Rsa15,
    /// SHA256-based encryption
    Basic256Sha256,
    /// AES-128 encryption
    Aes128Sha256RsaOaep,
    /// AES-256 encryption
    Aes256Sha256RsaPss,
}

impl fmt::Display for SecurityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Basic256 => "Basic256",
            Self::Basic128Rsa15 => "Basic128Rsa15",
            Self::Basic256Sha256 => "Basic256Sha256",
            Self::Aes128Sha256RsaOaep => "Aes128_Sha256_RsaOaep",
            Self::Aes256Sha256RsaPss => "Aes256_Sha256_RsaPss",
        };
        f.write_str(name)
    }
}

/// OPC UA message security mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SecurityMode {
    Sign,
    SignAndEncrypt,
}

/// Immutable connection parameters for one session
///
/// Built once from the CLI (or a config default) and validated before any
/// endpoint is contacted.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Endpoint: `demo`, a path to a JSON capture, or an `opc.tcp://` URL
    pub endpoint: String,
    pub security_policy: SecurityPolicy,
    pub security_mode: Option<SecurityMode>,
    pub certificate: Option<PathBuf>,
    pub private_key: Option<PathBuf>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ConnectOptions {
    /// Plain unauthenticated options for an endpoint
    #[must_use]
    pub fn plain(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            security_policy: SecurityPolicy::None,
            security_mode: None,
            certificate: None,
            private_key: None,
            username: None,
            password: None,
        }
    }

    /// Check the policy/mode/certificate coupling rules
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Security` when a non-None policy is missing its
    /// mode or certificate material, and `SourceError::Auth` when only one
    /// half of a credential pair is given.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.security_policy != SecurityPolicy::None {
            if self.security_mode.is_none() {
                return Err(SourceError::Security(format!(
                    "Security mode is required for policy '{}': use Sign or SignAndEncrypt",
                    self.security_policy
                )));
            }
            let (Some(cert), Some(key)) = (&self.certificate, &self.private_key) else {
                return Err(SourceError::Security(format!(
                    "Certificate and private key are required for policy '{}'",
                    self.security_policy
                )));
            };
            if !cert.exists() {
                return Err(SourceError::Security(format!(
                    "Certificate file not found: {}",
                    cert.display()
                )));
            }
            if !key.exists() {
                return Err(SourceError::Security(format!(
                    "Private key file not found: {}",
                    key.display()
                )));
            }
        }

        match (&self.username, &self.password) {
            (Some(_), None) => Err(SourceError::Auth(
                "Username given without a password".to_string(),
            )),
            (None, Some(_)) => Err(SourceError::Auth(
                "Password given without a username".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Open a connection for the configured endpoint
///
/// Recognized endpoints:
/// - `demo` — the built-in in-memory demo address space
/// - a path to a `.json` capture — replayed offline via [`ReplaySource`]
/// - `opc.tcp://...` — requires an external transport adapter implementing
///   [`Connection`]; reported as a connection error here
///
/// # Errors
///
/// Returns `SourceError::Security`/`Auth` from option validation and
/// `SourceError::Connection` for unusable endpoints.
pub fn connect(options: &ConnectOptions) -> Result<Box<dyn Connection>, SourceError> {
    options.validate()?;

    if options.endpoint == "demo" {
        info!("Opening built-in demo address space");
        return Ok(Box::new(StaticSource::demo()));
    }

    if options.endpoint.starts_with("opc.tcp://") {
        return Err(SourceError::Connection(format!(
            "No transport adapter is linked for '{}'; connect through a crate that \
             implements the Connection trait for live servers, or browse a JSON capture",
            options.endpoint
        )));
    }

    let path = Path::new(&options.endpoint);
    if path.extension().is_some_and(|ext| ext == "json") {
        info!(capture = %path.display(), "Replaying address space from capture");
        return Ok(Box::new(ReplaySource::open(path)?));
    }

    Err(SourceError::Connection(format!(
        "Unrecognized endpoint '{}': expected 'demo', a .json capture path, \
         or an opc.tcp:// URL",
        options.endpoint
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_options_validate() {
        assert!(ConnectOptions::plain("demo").validate().is_ok());
    }

    #[test]
    fn test_policy_requires_mode() {
        let mut options = ConnectOptions::plain("demo");
        options.security_policy = SecurityPolicy::Basic256Sha256;
        let err = options.validate().unwrap_err();
        assert!(matches!(err, SourceError::Security(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_policy_requires_certificate_material() {
        let mut options = ConnectOptions::plain("demo");
        options.security_policy = SecurityPolicy::Basic256Sha256;
        options.security_mode = Some(SecurityMode::SignAndEncrypt);
        assert!(matches!(
            options.validate(),
            Err(SourceError::Security(_))
        ));
    }

    #[test]
    fn test_missing_certificate_file_is_security_error() {
        let mut options = ConnectOptions::plain("demo");
        options.security_policy = SecurityPolicy::Basic256Sha256;
        options.security_mode = Some(SecurityMode::Sign);
        options.certificate = Some(PathBuf::from("/nonexistent/cert.pem"));
        options.private_key = Some(PathBuf::from("/nonexistent/key.pem"));
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("Certificate file not found"));
    }

    #[test]
    fn test_half_credentials_are_auth_error() {
        let mut options = ConnectOptions::plain("demo");
        options.username = Some("admin".to_string());
        assert!(matches!(options.validate(), Err(SourceError::Auth(_))));
    }

    #[test]
    fn test_connect_demo() {
        let source = connect(&ConnectOptions::plain("demo")).unwrap();
        assert!(!source.namespace_array().unwrap().is_empty());
    }

    #[test]
    fn test_connect_live_endpoint_needs_adapter() {
        let err = connect(&ConnectOptions::plain("opc.tcp://localhost:4840")).unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[test]
    fn test_connect_unrecognized_endpoint() {
        let err = connect(&ConnectOptions::plain("gopher://x")).unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[test]
    fn test_remediation_hint_lookup() {
        let err = SourceError::Connection("server answered BadTimeout".to_string());
        assert_eq!(
            err.remediation(),
            Some("Connection timeout - check network connectivity and server status")
        );
        let err = SourceError::Connection("something else".to_string());
        assert!(err.remediation().is_none());
    }

    #[test]
    fn test_fatality_partition() {
        let id: NodeId = "i=84".parse().unwrap();
        assert!(SourceError::Connection(String::new()).is_fatal());
        assert!(SourceError::Security(String::new()).is_fatal());
        assert!(SourceError::Auth(String::new()).is_fatal());
        assert!(!SourceError::NodeNotFound(id.clone()).is_fatal());
        assert!(!SourceError::AttributeUnavailable {
            node: id,
            reason: String::new()
        }
        .is_fatal());
    }
}
