//! In-memory address space source
//!
//! Backs the built-in `demo` endpoint, the replay source and the test
//! suite. Nodes are held in a flat map keyed by [`NodeId`] with explicit
//! child lists, so cycles and multiple parents are representable. Failure
//! injection covers the two policies the engine must honor: per-node
//! attribute reads that fail recoverably, and a connection that drops
//! mid-session after a fixed number of round-trips.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use super::{Connection, NodeAttributes, SourceError};
use crate::model::{ExtendedAttributes, NodeClass, NodeId};

/// One node of a static address space
#[derive(Debug, Clone)]
pub struct StaticNode {
    pub attributes: NodeAttributes,
    pub data_type: Option<String>,
    pub value: Option<String>,
    pub extended: ExtendedAttributes,
    pub children: Vec<NodeId>,
}

impl StaticNode {
    /// A node with an arbitrary class and matching browse/display names
    #[must_use]
    pub fn with_class(browse_name: &str, class: NodeClass) -> Self {
        Self {
            attributes: NodeAttributes {
                browse_name: browse_name.to_string(),
                display_name: browse_name.to_string(),
                node_class: class,
            },
            data_type: None,
            value: None,
            extended: ExtendedAttributes::default(),
            children: Vec::new(),
        }
    }

    /// An Object node
    #[must_use]
    pub fn object(browse_name: &str) -> Self {
        Self::with_class(browse_name, NodeClass::Object)
    }

    /// A Variable node with a data type and current value
    #[must_use]
    pub fn variable(browse_name: &str, data_type: &str, value: &str) -> Self {
        let mut node = Self::with_class(browse_name, NodeClass::Variable);
        node.data_type = Some(data_type.to_string());
        node.value = Some(value.to_string());
        node
    }

    /// Override the display name
    #[must_use]
    pub fn display_name(mut self, name: &str) -> Self {
        self.attributes.display_name = name.to_string();
        self
    }

    /// Attach extended attributes
    #[must_use]
    pub fn extended(mut self, extended: ExtendedAttributes) -> Self {
        self.extended = extended;
        self
    }
}

/// In-memory [`Connection`] implementation
#[derive(Debug)]
pub struct StaticSource {
    namespaces: Vec<String>,
    nodes: HashMap<NodeId, StaticNode>,
    broken_data_types: HashSet<NodeId>,
    broken_values: HashSet<NodeId>,
    // Remaining round-trips before the simulated connection drops
    remaining_reads: Cell<Option<usize>>,
}

impl StaticSource {
    /// Create an empty source with the given namespace array
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespaces: namespaces.into_iter().map(Into::into).collect(),
            nodes: HashMap::new(),
            broken_data_types: HashSet::new(),
            broken_values: HashSet::new(),
            remaining_reads: Cell::new(None),
        }
    }

    /// Insert a node
    pub fn insert(&mut self, id: NodeId, node: StaticNode) -> &mut Self {
        self.nodes.insert(id, node);
        self
    }

    /// Register `child` as a forward hierarchical child of `parent`
    ///
    /// The parent must already be inserted; linking to a missing parent is
    /// ignored so builders can be written in any order during tests.
    pub fn link(&mut self, parent: &NodeId, child: NodeId) -> &mut Self {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        self
    }

    /// Make data-type reads for one node fail recoverably
    pub fn break_data_type(&mut self, id: NodeId) -> &mut Self {
        self.broken_data_types.insert(id);
        self
    }

    /// Make value reads for one node fail recoverably
    pub fn break_value(&mut self, id: NodeId) -> &mut Self {
        self.broken_values.insert(id);
        self
    }

    /// Simulate a dropped connection after `reads` successful round-trips
    pub fn disconnect_after(&mut self, reads: usize) -> &mut Self {
        self.remaining_reads.set(Some(reads));
        self
    }

    /// The built-in demo address space used by the `demo` endpoint
    ///
    /// A miniature plant server: the standard root folders, a Server object
    /// with its namespace array, and a vendor namespace with a machine and
    /// a handful of variables.
    #[must_use]
    pub fn demo() -> Self {
        let mut source = Self::new([
            "http://opcfoundation.org/UA/",
            "urn:uabrowse:demo",
        ]);

        let root = NodeId::numeric(0, 84);
        let objects = NodeId::numeric(0, 85);
        let types = NodeId::numeric(0, 86);
        let views = NodeId::numeric(0, 87);
        let server = NodeId::numeric(0, 2253);
        let ns_array = NodeId::numeric(0, 2255);
        let server_status = NodeId::numeric(0, 2256);
        let demo = NodeId::numeric(1, 1);
        let machine = NodeId::numeric(1, 10);
        let temperature = NodeId::numeric(1, 11);
        let pressure = NodeId::numeric(1, 12);
        let tag_a = NodeId::string(1, "Tag.A");

        source
            .insert(root.clone(), StaticNode::object("Root"))
            .insert(objects.clone(), StaticNode::object("Objects"))
            .insert(types.clone(), StaticNode::object("Types"))
            .insert(views.clone(), StaticNode::object("Views"))
            .insert(server.clone(), StaticNode::object("Server"))
            .insert(
                ns_array.clone(),
                StaticNode::variable(
                    "NamespaceArray",
                    "String",
                    "[http://opcfoundation.org/UA/, urn:uabrowse:demo]",
                ),
            )
            .insert(
                server_status.clone(),
                StaticNode::variable("ServerStatus", "ServerStatusDataType", "Running"),
            )
            .insert(demo.clone(), StaticNode::object("Demo"))
            .insert(machine.clone(), StaticNode::object("Machine"))
            .insert(
                temperature.clone(),
                StaticNode::variable("Temperature", "Double", "23.5")
                    .display_name("Temperature Sensor")
                    .extended(ExtendedAttributes {
                        description: Some("Ambient temperature in degrees Celsius".to_string()),
                        access_level: Some("CurrentRead".to_string()),
                        historizing: Some(false),
                        minimum_sampling_interval: Some(250.0),
                        ..ExtendedAttributes::default()
                    }),
            )
            .insert(
                pressure.clone(),
                StaticNode::variable("Pressure", "Double", "1.2"),
            )
            .insert(
                tag_a.clone(),
                StaticNode::variable("Tag.A", "String", "on").display_name("Tag, A"),
            )
            .insert(
                NodeId::numeric(0, 58),
                StaticNode::with_class("BaseObjectType", NodeClass::ObjectType),
            )
            .insert(
                NodeId::numeric(0, 62),
                StaticNode::with_class("BaseVariableType", NodeClass::VariableType),
            );

        source
            .link(&root, objects.clone())
            .link(&root, types.clone())
            .link(&root, views)
            .link(&objects, server.clone())
            .link(&objects, demo.clone())
            .link(&server, ns_array)
            .link(&server, server_status)
            .link(&demo, machine.clone())
            .link(&machine, temperature)
            .link(&machine, pressure)
            .link(&machine, tag_a)
            .link(&types, NodeId::numeric(0, 58))
            .link(&types, NodeId::numeric(0, 62));

        source
    }

    // One simulated round-trip; fails once the countdown is exhausted.
    fn round_trip(&self) -> Result<(), SourceError> {
        match self.remaining_reads.get() {
            Some(0) => Err(SourceError::Connection(
                "BadConnectionClosed: connection lost".to_string(),
            )),
            Some(n) => {
                self.remaining_reads.set(Some(n - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn node(&self, id: &NodeId) -> Result<&StaticNode, SourceError> {
        self.nodes
            .get(id)
            .ok_or_else(|| SourceError::NodeNotFound(id.clone()))
    }
}

impl Connection for StaticSource {
    fn namespace_array(&self) -> Result<Vec<String>, SourceError> {
        self.round_trip()?;
        Ok(self.namespaces.clone())
    }

    fn read_attributes(&self, id: &NodeId) -> Result<NodeAttributes, SourceError> {
        self.round_trip()?;
        Ok(self.node(id)?.attributes.clone())
    }

    fn read_data_type(&self, id: &NodeId) -> Result<String, SourceError> {
        self.round_trip()?;
        if self.broken_data_types.contains(id) {
            return Err(SourceError::AttributeUnavailable {
                node: id.clone(),
                reason: "data type read rejected".to_string(),
            });
        }
        self.node(id)?
            .data_type
            .clone()
            .ok_or_else(|| SourceError::AttributeUnavailable {
                node: id.clone(),
                reason: "node has no data type attribute".to_string(),
            })
    }

    fn read_value(&self, id: &NodeId) -> Result<String, SourceError> {
        self.round_trip()?;
        if self.broken_values.contains(id) {
            return Err(SourceError::AttributeUnavailable {
                node: id.clone(),
                reason: "value read rejected".to_string(),
            });
        }
        self.node(id)?
            .value
            .clone()
            .ok_or_else(|| SourceError::AttributeUnavailable {
                node: id.clone(),
                reason: "node has no value attribute".to_string(),
            })
    }

    fn read_extended(&self, id: &NodeId) -> Result<ExtendedAttributes, SourceError> {
        self.round_trip()?;
        Ok(self.node(id)?.extended.clone())
    }

    fn children(&self, id: &NodeId) -> Result<Vec<NodeId>, SourceError> {
        self.round_trip()?;
        Ok(self.node(id)?.children.clone())
    }
}
