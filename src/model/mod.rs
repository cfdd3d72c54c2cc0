//! Data model for browsed OPC UA address spaces
//!
//! Defines the record types a browse session produces: node records,
//! namespace entries and the aggregate [`BrowseResult`]. Records are created
//! only while a session runs, appended in discovery order, and never mutated
//! afterwards; the result is owned by the caller and consumed exactly once
//! by an export strategy.
//!
//! Parent/child relationships are expressed as weak back-references by
//! [`NodeId`], never as owning pointers, so a reference graph with cycles or
//! multiple parents never turns into a cyclic ownership structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod error;
pub mod node_id;

pub use error::NodeIdError;
pub use node_id::{Identifier, NodeId};

/// Serde adapter for ISO-8601 timestamps with fixed microsecond precision
///
/// Chrono's default string format varies its sub-second width with the
/// value; exports must not, so every timestamp goes through this adapter.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(de)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Structural category of an OPC UA node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    Object,
    Variable,
    Method,
    ObjectType,
    VariableType,
    DataType,
    ReferenceType,
    View,
    /// Server answered with a class this client does not know
    Unspecified,
}

impl NodeClass {
    /// The class name as it appears in exports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Variable => "Variable",
            Self::Method => "Method",
            Self::ObjectType => "ObjectType",
            Self::VariableType => "VariableType",
            Self::DataType => "DataType",
            Self::ReferenceType => "ReferenceType",
            Self::View => "View",
            Self::Unspecified => "Unspecified",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extended OPC UA node attributes, captured only for full exports
///
/// Every field is optional; servers are free to omit any of them and a
/// partial read leaves the rest intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedAttributes {
    pub description: Option<String>,
    pub access_level: Option<String>,
    pub user_access_level: Option<String>,
    pub write_mask: Option<u32>,
    pub user_write_mask: Option<u32>,
    pub event_notifier: Option<u8>,
    pub executable: Option<bool>,
    pub user_executable: Option<bool>,
    pub minimum_sampling_interval: Option<f64>,
    pub historizing: Option<bool>,
}

impl ExtendedAttributes {
    /// True when no extended attribute was captured
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.access_level.is_none()
            && self.user_access_level.is_none()
            && self.write_mask.is_none()
            && self.user_write_mask.is_none()
            && self.event_notifier.is_none()
            && self.executable.is_none()
            && self.user_executable.is_none()
            && self.minimum_sampling_interval.is_none()
            && self.historizing.is_none()
    }
}

/// One discovered node, immutable once emitted
///
/// Field order matches the export column/key order. `data_type` and `value`
/// are populated only for Variable nodes, and only when the corresponding
/// read succeeded; `parent_id` is `None` for the traversal root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node_id: NodeId,
    pub browse_name: String,
    pub display_name: String,
    pub node_class: NodeClass,
    pub data_type: Option<String>,
    pub value: Option<String>,
    pub parent_id: Option<NodeId>,
    pub depth: u32,
    pub namespace_index: u16,
    pub is_namespace_node: bool,
    /// Slash-joined browse-name path from the traversal root to this node
    pub full_path: String,
    /// Capture instant of this record
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    /// Extended attributes, present only when captured for a full export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended: Option<ExtendedAttributes>,
}

/// One entry of the server's namespace array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceEntry {
    /// Namespace index; 0 is reserved for the OPC UA base namespace
    pub index: u16,
    pub uri: String,
}

/// Aggregate produced by one browse session
///
/// Records are kept in discovery order. `success == false` means the session
/// ended early; whatever was collected before the failure is retained so a
/// partial result can still be inspected and exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseResult {
    pub nodes: Vec<NodeRecord>,
    pub namespaces: Vec<NamespaceEntry>,
    pub total_nodes: usize,
    pub max_depth_reached: u32,
    pub success: bool,
    pub error_message: Option<String>,
    #[serde(with = "iso8601")]
    pub export_timestamp: DateTime<Utc>,
}

impl BrowseResult {
    /// Create an empty, successful result stamped with the current instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            namespaces: Vec::new(),
            total_nodes: 0,
            max_depth_reached: 0,
            success: true,
            error_message: None,
            export_timestamp: Utc::now(),
        }
    }

    /// Create a failed result carrying only an error message
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result.success = false;
        result.error_message = Some(message.into());
        result
    }

    /// Append a record, keeping the node count and depth high-water mark in sync
    pub fn add_record(&mut self, record: NodeRecord) {
        if record.depth > self.max_depth_reached {
            self.max_depth_reached = record.depth;
        }
        self.total_nodes += 1;
        self.nodes.push(record);
    }

    /// Mark the session as failed while keeping already-collected records
    pub fn fail(&mut self, message: impl Into<String>) {
        self.success = false;
        self.error_message = Some(message.into());
    }

    /// Records belonging to one node class
    pub fn records_in_class(&self, class: NodeClass) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.iter().filter(move |n| n.node_class == class)
    }

    /// Records classified as namespace-related
    pub fn namespace_records(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.iter().filter(|n| n.is_namespace_node)
    }

    /// Look up a record by node id
    #[must_use]
    pub fn record(&self, id: &NodeId) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| &n.node_id == id)
    }
}

impl Default for BrowseResult {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, depth: u32) -> NodeRecord {
        NodeRecord {
            node_id: id.parse().unwrap(),
            browse_name: "Node".to_string(),
            display_name: "Node".to_string(),
            node_class: NodeClass::Object,
            data_type: None,
            value: None,
            parent_id: None,
            depth,
            namespace_index: 0,
            is_namespace_node: false,
            full_path: "Node".to_string(),
            timestamp: Utc::now(),
            extended: None,
        }
    }

    #[test]
    fn test_add_record_tracks_count_and_depth() {
        let mut result = BrowseResult::new();
        result.add_record(record("i=84", 0));
        result.add_record(record("i=85", 1));
        result.add_record(record("i=86", 1));

        assert_eq!(result.total_nodes, 3);
        assert_eq!(result.max_depth_reached, 1);
        assert_eq!(result.nodes.len(), 3);
    }

    #[test]
    fn test_failed_result_is_empty_but_well_formed() {
        let result = BrowseResult::failed("connection refused");
        assert!(!result.success);
        assert_eq!(result.total_nodes, 0);
        assert!(result.namespaces.is_empty());
        assert_eq!(result.error_message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_fail_keeps_collected_records() {
        let mut result = BrowseResult::new();
        result.add_record(record("i=84", 0));
        result.fail("server went away");

        assert!(!result.success);
        assert_eq!(result.total_nodes, 1);
    }

    #[test]
    fn test_records_in_class_filters() {
        let mut result = BrowseResult::new();
        let mut var = record("ns=2;i=1", 1);
        var.node_class = NodeClass::Variable;
        result.add_record(record("i=84", 0));
        result.add_record(var);

        assert_eq!(result.records_in_class(NodeClass::Variable).count(), 1);
        assert_eq!(result.records_in_class(NodeClass::Object).count(), 1);
        assert_eq!(result.records_in_class(NodeClass::Method).count(), 0);
    }

    #[test]
    fn test_record_lookup_by_id() {
        let mut result = BrowseResult::new();
        result.add_record(record("i=84", 0));

        let id: NodeId = "i=84".parse().unwrap();
        assert!(result.record(&id).is_some());
        let missing: NodeId = "i=99".parse().unwrap();
        assert!(result.record(&missing).is_none());
    }
}
