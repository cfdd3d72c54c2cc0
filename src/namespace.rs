//! Namespace table for one browse session
//!
//! Populated once from the server's namespace array, then consulted for
//! `index -> uri` resolution and fed one record at a time to keep running
//! per-namespace node counts.

use std::collections::HashMap;

use crate::model::NamespaceEntry;

/// Session-scoped namespace table
#[derive(Debug, Default, Clone)]
pub struct NamespaceTable {
    entries: Vec<NamespaceEntry>,
    counts: HashMap<u16, usize>,
}

impl NamespaceTable {
    /// Build a table from the server's ordered namespace array
    ///
    /// Array position is the namespace index; index 0 is the OPC UA base
    /// namespace.
    pub fn from_array<I, S>(uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = uris
            .into_iter()
            .enumerate()
            .map(|(index, uri)| NamespaceEntry {
                index: u16::try_from(index).unwrap_or(u16::MAX),
                uri: uri.into(),
            })
            .collect();
        Self {
            entries,
            counts: HashMap::new(),
        }
    }

    /// Resolve a namespace index to its URI
    #[must_use]
    pub fn uri(&self, index: u16) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.uri.as_str())
    }

    /// Count one emitted record against its namespace
    pub fn record_node(&mut self, index: u16) {
        *self.counts.entry(index).or_insert(0) += 1;
    }

    /// Nodes counted so far for a namespace
    #[must_use]
    pub fn count(&self, index: u16) -> usize {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// The ordered namespace entries
    #[must_use]
    pub fn entries(&self) -> &[NamespaceEntry] {
        &self.entries
    }

    /// Number of namespaces in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the server reported no namespaces
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
