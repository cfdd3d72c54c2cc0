//! Namespace-node classification
//!
//! Marks the nodes that describe the server's namespace configuration:
//! the standard Server diagnostics objects and their subtrees, plus nodes
//! whose browse name matches a namespace-related keyword. The flag drives
//! the `namespaces_only` projection and the `is_namespace_node` export
//! column.

use crate::model::{NodeClass, NodeId};

/// Well-known ns=0 numeric ids of namespace-describing nodes
///
/// Server (2253), ServerArray (2254), NamespaceArray (2255),
/// ServerDiagnostics (2274), ServerCapabilities (2268) and
/// NamespacesType's Namespaces folder (11715).
const WELL_KNOWN_IDS: &[u32] = &[2253, 2254, 2255, 2268, 2274, 11715];

const KEYWORDS: &[&str] = &[
    "Namespace",
    "NamespaceArray",
    "Server",
    "ServerArray",
    "ServerCapabilities",
    "ServerDiagnostics",
];

/// Everything known about a node at classification time
pub struct ClassifierContext<'a> {
    pub node_id: &'a NodeId,
    pub browse_name: &'a str,
    pub node_class: NodeClass,
    /// The node was discovered under an already-classified parent
    pub parent_is_namespace: bool,
}

/// Decides whether a node is namespace-related
pub trait NamespaceClassifier {
    fn is_namespace_node(&self, context: &ClassifierContext<'_>) -> bool;
}

/// Default classification: well-known ns=0 ids, then ancestry, then
/// browse-name keywords
///
/// The checks are ordered so a structural match never depends on the
/// browse name the server happens to use.
pub struct DefaultClassifier;

impl NamespaceClassifier for DefaultClassifier {
    fn is_namespace_node(&self, context: &ClassifierContext<'_>) -> bool {
        if context.node_id.namespace == 0
            && context
                .node_id
                .as_numeric()
                .is_some_and(|id| WELL_KNOWN_IDS.contains(&id))
        {
            return true;
        }
        if context.parent_is_namespace {
            return true;
        }
        KEYWORDS
            .iter()
            .any(|keyword| context.browse_name.contains(keyword))
    }
}
