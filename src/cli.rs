//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for uabrowse using the
//! `clap` crate. Both commands share the same session arguments (endpoint,
//! start node, depth, security, credentials); `export` adds the artifact
//! format and output options on top.
//!
//! # Commands
//!
//! - **browse**: walk an address space and print it as a tree (default)
//! - **export**: walk an address space and write a CSV/JSON/XML artifact
//!
//! # Design Features
//!
//! - Global `--quiet` flag for scripting-friendly output
//! - Command aliases (`b` for `browse`, `e` for `export`)
//! - Security and credential arguments validated before any connection
//!
//! # Examples
//!
//! ```
//! use uabrowse::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["uabrowse", "browse", "-s", "demo", "-d", "2"]);
//! let command = cli.get_command();
//! assert!(matches!(command, Commands::Browse { .. }));
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::export::ExportFormat;
use crate::source::{ConnectOptions, SecurityMode, SecurityPolicy};

/// Shared arguments describing one browse session
#[derive(Parser, Debug, Clone)]
pub struct SessionArgs {
    /// Server endpoint: `demo`, a JSON capture path, or an opc.tcp:// URL
    #[arg(short = 's', long = "server-url", value_name = "ENDPOINT")]
    pub server_url: Option<String>,

    /// Node id to start from (e.g. i=84, ns=2;s=Machine)
    #[arg(short = 'n', long = "node-id", value_name = "NODE", default_value = "i=84")]
    pub node_id: String,

    /// Maximum traversal depth below the start node
    #[arg(short = 'd', long = "depth", value_name = "DEPTH")]
    pub depth: Option<u32>,

    /// Only emit nodes from this namespace index
    #[arg(long = "namespace", value_name = "INDEX")]
    pub namespace: Option<u16>,

    /// Only emit namespace-related nodes
    #[arg(long = "namespaces-only")]
    pub namespaces_only: bool,

    /// Read current values of Variable nodes
    #[arg(long = "include-values")]
    pub include_values: bool,
}

/// Shared security and authentication arguments
#[derive(Parser, Debug, Clone)]
pub struct SecurityArgs {
    /// Security policy for the connection
    #[arg(long = "security", value_enum, default_value = "none")]
    pub security: SecurityPolicy,

    /// Message security mode (required for any policy other than none)
    #[arg(long = "mode", value_enum)]
    pub mode: Option<SecurityMode>,

    /// Client certificate file (PEM or DER)
    #[arg(long = "cert", value_name = "FILE")]
    pub cert: Option<PathBuf>,

    /// Client private key file
    #[arg(long = "key", value_name = "FILE")]
    pub key: Option<PathBuf>,

    /// Username for authentication
    #[arg(long = "user", value_name = "NAME")]
    pub user: Option<String>,

    /// Password for authentication
    #[arg(long = "password", value_name = "PASS", requires = "user")]
    pub password: Option<String>,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "uabrowse")]
#[command(about = "An OPC UA address-space browser and exporter", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Browse an address space and print it as a tree (default)
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        security: SecurityArgs,
    },

    /// Browse an address space and write an export artifact
    #[command(visible_alias = "e")]
    Export {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        security: SecurityArgs,

        /// Artifact format
        #[arg(short = 'f', long = "format", value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (a name is generated under the export directory
        /// if not specified)
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include extended node attributes in the artifact
        #[arg(long = "full")]
        full: bool,
    },
}

impl Commands {
    /// The session arguments of either command
    #[must_use]
    pub const fn session(&self) -> &SessionArgs {
        match self {
            Self::Browse { session, .. } | Self::Export { session, .. } => session,
        }
    }

    /// The security arguments of either command
    #[must_use]
    pub const fn security(&self) -> &SecurityArgs {
        match self {
            Self::Browse { security, .. } | Self::Export { security, .. } => security,
        }
    }
}

impl SecurityArgs {
    /// Build connection options for an endpoint from these arguments
    #[must_use]
    pub fn connect_options(&self, endpoint: String) -> ConnectOptions {
        ConnectOptions {
            endpoint,
            security_policy: self.security,
            security_mode: self.mode,
            certificate: self.cert.clone(),
            private_key: self.key.clone(),
            username: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to Browse if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or_else(|| Commands::Browse {
            session: SessionArgs {
                server_url: None,
                node_id: "i=84".to_string(),
                depth: None,
                namespace: None,
                namespaces_only: false,
                include_values: false,
            },
            security: SecurityArgs {
                security: SecurityPolicy::None,
                mode: None,
                cert: None,
                key: None,
                user: None,
                password: None,
            },
        })
    }
}
