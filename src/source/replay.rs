//! Replay source for JSON captures
//!
//! Rebuilds an in-memory address space from a previously exported JSON
//! artifact, so a capture taken once can be re-browsed, filtered differently
//! and re-exported without touching a server. Parent/child links are
//! reconstructed from the `parent_id` column in record order, which preserves
//! the child ordering of the original session.

use std::fs;
use std::path::Path;

use super::static_source::{StaticNode, StaticSource};
use super::{Connection, NodeAttributes, SourceError};
use crate::export::JsonDocument;
use crate::model::{ExtendedAttributes, NodeId};

/// [`Connection`] backed by a JSON capture
#[derive(Debug)]
pub struct ReplaySource {
    inner: StaticSource,
}

impl ReplaySource {
    /// Load a capture from disk
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Connection` when the file cannot be read or is
    /// not a valid capture.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path).map_err(|e| {
            SourceError::Connection(format!("Cannot read capture {}: {e}", path.display()))
        })?;
        let document: JsonDocument = serde_json::from_str(&text).map_err(|e| {
            SourceError::Connection(format!("Invalid capture {}: {e}", path.display()))
        })?;
        Ok(Self::from_document(document))
    }

    /// Rebuild a source from an in-memory capture document
    #[must_use]
    pub fn from_document(document: JsonDocument) -> Self {
        let namespaces: Vec<String> = document
            .namespaces
            .iter()
            .map(|entry| entry.uri.clone())
            .collect();
        let mut inner = StaticSource::new(namespaces);

        for record in &document.nodes {
            let node = StaticNode {
                attributes: NodeAttributes {
                    browse_name: record.browse_name.clone(),
                    display_name: record.display_name.clone(),
                    node_class: record.node_class,
                },
                data_type: record.data_type.clone(),
                value: record.value.clone(),
                extended: record.extended.clone().unwrap_or_default(),
                children: Vec::new(),
            };
            inner.insert(record.node_id.clone(), node);
        }
        for record in &document.nodes {
            if let Some(parent) = &record.parent_id {
                inner.link(parent, record.node_id.clone());
            }
        }

        Self { inner }
    }
}

impl Connection for ReplaySource {
    fn namespace_array(&self) -> Result<Vec<String>, SourceError> {
        self.inner.namespace_array()
    }

    fn read_attributes(&self, id: &NodeId) -> Result<NodeAttributes, SourceError> {
        self.inner.read_attributes(id)
    }

    fn read_data_type(&self, id: &NodeId) -> Result<String, SourceError> {
        self.inner.read_data_type(id)
    }

    fn read_value(&self, id: &NodeId) -> Result<String, SourceError> {
        self.inner.read_value(id)
    }

    fn read_extended(&self, id: &NodeId) -> Result<ExtendedAttributes, SourceError> {
        self.inner.read_extended(id)
    }

    fn children(&self, id: &NodeId) -> Result<Vec<NodeId>, SourceError> {
        self.inner.children(id)
    }
}
