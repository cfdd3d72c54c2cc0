//! Statistics derived from a completed browse result
//!
//! Aggregation is a pure pass over an immutable [`BrowseResult`]; ordered
//! maps keep every derived view deterministic so the console summary and
//! the CSV summary block render identically for identical input.

use std::collections::BTreeMap;

use crate::model::{BrowseResult, NodeClass};

/// Aggregated view of one browse result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseStats {
    /// Total emitted records
    pub total_nodes: usize,
    /// Deepest level actually reached during the walk
    pub max_depth_reached: u32,
    /// Record counts per node class, ordered by class
    pub by_class: BTreeMap<NodeClass, usize>,
    /// Record counts per namespace index, ordered by index
    pub by_namespace: BTreeMap<u16, usize>,
    /// Records classified as namespace-related
    pub namespace_nodes: usize,
}

impl BrowseStats {
    /// Derive statistics from a completed result
    #[must_use]
    pub fn from_result(result: &BrowseResult) -> Self {
        let mut by_class: BTreeMap<NodeClass, usize> = BTreeMap::new();
        let mut by_namespace: BTreeMap<u16, usize> = BTreeMap::new();
        let mut namespace_nodes = 0;

        for node in &result.nodes {
            *by_class.entry(node.node_class).or_insert(0) += 1;
            *by_namespace.entry(node.namespace_index).or_insert(0) += 1;
            if node.is_namespace_node {
                namespace_nodes += 1;
            }
        }

        Self {
            total_nodes: result.total_nodes,
            max_depth_reached: result.max_depth_reached,
            by_class,
            by_namespace,
            namespace_nodes,
        }
    }

    /// Count for one node class
    #[must_use]
    pub fn class_count(&self, class: NodeClass) -> usize {
        self.by_class.get(&class).copied().unwrap_or(0)
    }

    /// Count for one namespace index
    #[must_use]
    pub fn namespace_count(&self, index: u16) -> usize {
        self.by_namespace.get(&index).copied().unwrap_or(0)
    }
}
