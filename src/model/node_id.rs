//! OPC UA node identifier parsing and rendering
//!
//! Node ids are structured values (namespace index plus a typed identifier)
//! with a canonical textual form. The accepted textual forms are the ones
//! an OPC UA server advertises:
//!
//! - `i=84` — numeric identifier in namespace 0
//! - `ns=2;i=1000` — numeric identifier with explicit namespace
//! - `ns=2;s=Machine.Temperature` — string identifier
//! - `ns=2;g=72962B91-FA75-4AE6-8D28-B404DC7DAF63` — GUID identifier
//! - `ns=2;b=SGVsbG8=` — opaque (base64) identifier
//!
//! Parsing is purely local string validation; it never touches a server.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::error::NodeIdError;

static NODE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:ns=(\d+);)?([isgb])=(.+)$").expect("node id pattern is valid")
});

static GUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("guid pattern is valid")
});

/// The typed identifier part of a node id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    /// Numeric identifier (`i=`)
    Numeric(u32),
    /// String identifier (`s=`)
    String(String),
    /// GUID identifier (`g=`), stored in its canonical lowercase form
    Guid(String),
    /// Opaque base64 identifier (`b=`)
    Opaque(String),
}

/// Structured OPC UA node identifier
///
/// `NodeId` is the identity key for every record produced by a browse
/// session: the visited set, parent back-references and result lookups are
/// all keyed by it. It round-trips through its canonical text form via
/// [`FromStr`] and [`fmt::Display`], and serializes as that text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    /// Namespace index, 0 for the OPC UA base namespace
    pub namespace: u16,
    /// Typed identifier within the namespace
    pub identifier: Identifier,
}

impl NodeId {
    /// Create a numeric node id
    #[must_use]
    pub const fn numeric(namespace: u16, value: u32) -> Self {
        Self {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    /// Create a string node id
    #[must_use]
    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self {
            namespace,
            identifier: Identifier::String(value.into()),
        }
    }

    /// The numeric identifier value, if this is a numeric id
    #[must_use]
    pub const fn as_numeric(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(n) => Some(n),
            _ => None,
        }
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = NODE_ID_RE
            .captures(s)
            .ok_or_else(|| NodeIdError::InvalidFormat(s.to_string()))?;

        let namespace: u16 = match caps.get(1) {
            Some(ns) => ns
                .as_str()
                .parse()
                .map_err(|_| NodeIdError::NamespaceOutOfRange(s.to_string()))?,
            None => 0,
        };

        let kind = caps.get(2).map_or("", |m| m.as_str());
        let value = caps.get(3).map_or("", |m| m.as_str());

        // A bare form without `ns=` is only accepted for numeric ids.
        if caps.get(1).is_none() && kind != "i" {
            return Err(NodeIdError::InvalidFormat(s.to_string()));
        }

        let identifier = match kind {
            "i" => Identifier::Numeric(
                value
                    .parse()
                    .map_err(|_| NodeIdError::InvalidNumeric(s.to_string()))?,
            ),
            "s" => Identifier::String(value.to_string()),
            "g" => {
                if !GUID_RE.is_match(value) {
                    return Err(NodeIdError::InvalidGuid(s.to_string()));
                }
                Identifier::Guid(value.to_lowercase())
            }
            "b" => Identifier::Opaque(value.to_string()),
            _ => return Err(NodeIdError::InvalidFormat(s.to_string())),
        };

        Ok(Self {
            namespace,
            identifier,
        })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        match &self.identifier {
            Identifier::Numeric(n) => write!(f, "i={n}"),
            Identifier::String(s) => write!(f, "s={s}"),
            Identifier::Guid(g) => write!(f, "g={g}"),
            Identifier::Opaque(b) => write!(f, "b={b}"),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
