//! Address-space traversal engine
//!
//! [`Browser::browse`] walks a server's address space depth-first from a
//! configured start node and materializes a [`BrowseResult`]: one immutable
//! record per reachable node, in discovery order, plus the session's
//! namespace table.
//!
//! The reference graph is not a tree. A session-scoped visited set keyed by
//! node id guarantees each reachable node is emitted exactly once, with its
//! `parent_id` fixed to the edge it was first discovered on; a cycle
//! `A -> B -> A` therefore yields exactly one record each for A and B.
//! Expansion stops at the configured depth: nodes at `max_depth` are
//! recorded but never queried for children.
//!
//! Failure policy, per error class:
//! - a recoverable per-node read failure is absorbed; the record is still
//!   emitted with the unreadable fields absent
//! - a fatal (connection/security/auth) failure stops recursion but keeps
//!   everything collected so far, returning a `success = false` result
//!
//! Namespace projections (`namespace_filter`, `namespaces_only`) run after
//! the full walk, so depth and path values always reflect the unfiltered
//! structure. Traversal order assumes the server returns a stable child
//! ordering within one session; when it does not, the `parent_id` chosen
//! for nodes reachable via multiple parents is not reproducible across
//! sessions. No tie-break is applied.

use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::model::{BrowseResult, NodeClass, NodeId, NodeIdError, NodeRecord};
use crate::namespace::NamespaceTable;

pub mod classifier;

pub use classifier::{ClassifierContext, DefaultClassifier, NamespaceClassifier};

use crate::source::{Connection, SourceError};

/// Immutable, validated configuration for one browse session
///
/// Construction validates the start node id syntax; a malformed id fails
/// here, before any source is contacted.
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    start_node: NodeId,
    max_depth: u32,
    include_values: bool,
    include_extended: bool,
    namespace_filter: Option<u16>,
    namespaces_only: bool,
}

impl BrowseConfig {
    /// Validate a start node id and build a config with default options
    ///
    /// # Errors
    ///
    /// Returns `NodeIdError` when `start_node` is not one of the accepted
    /// node id forms.
    pub fn new(start_node: &str, max_depth: u32) -> Result<Self, NodeIdError> {
        Ok(Self {
            start_node: start_node.parse()?,
            max_depth,
            include_values: false,
            include_extended: false,
            namespace_filter: None,
            namespaces_only: false,
        })
    }

    /// Read current values of Variable nodes
    #[must_use]
    pub const fn include_values(mut self, yes: bool) -> Self {
        self.include_values = yes;
        self
    }

    /// Capture extended attributes for full exports
    #[must_use]
    pub const fn include_extended(mut self, yes: bool) -> Self {
        self.include_extended = yes;
        self
    }

    /// Restrict the emitted set to one namespace index (post-traversal)
    #[must_use]
    pub const fn namespace_filter(mut self, index: Option<u16>) -> Self {
        self.namespace_filter = index;
        self
    }

    /// Restrict the emitted set to namespace-related nodes (post-traversal)
    #[must_use]
    pub const fn namespaces_only(mut self, yes: bool) -> Self {
        self.namespaces_only = yes;
        self
    }

    /// The validated start node
    #[must_use]
    pub const fn start_node(&self) -> &NodeId {
        &self.start_node
    }

    /// The depth cutoff
    #[must_use]
    pub const fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

// In-flight session state.
struct Session<'a> {
    source: &'a dyn Connection,
    result: BrowseResult,
    table: NamespaceTable,
    visited: HashSet<NodeId>,
}

/// Depth-limited address-space walker
///
/// One instance runs one session at a time; `browse` keeps no state across
/// calls, so an instance can be reused sequentially, but it is not designed
/// for concurrent reentrant invocation.
pub struct Browser {
    config: BrowseConfig,
    classifier: Box<dyn NamespaceClassifier>,
}

impl Browser {
    /// Create a browser with the default namespace classifier
    #[must_use]
    pub fn new(config: BrowseConfig) -> Self {
        Self {
            config,
            classifier: Box::new(DefaultClassifier),
        }
    }

    /// Replace the namespace classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn NamespaceClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Run one browse session against a source
    ///
    /// Never panics and never propagates source errors past this boundary:
    /// any failure is folded into the returned result. A failed session
    /// still carries every record collected before the failure.
    pub fn browse(&self, source: &dyn Connection) -> BrowseResult {
        let start = self.config.start_node.clone();
        info!(start = %start, max_depth = self.config.max_depth, "Starting browse session");

        let table = match source.namespace_array() {
            Ok(uris) => NamespaceTable::from_array(uris),
            Err(e) if e.is_fatal() => {
                return BrowseResult::failed(format!("Could not read namespace array: {e}"));
            }
            Err(e) => {
                warn!("Could not read namespace array: {e}");
                NamespaceTable::default()
            }
        };
        debug!(namespaces = table.len(), "Namespace table populated");

        let start_attrs = match source.read_attributes(&start) {
            Ok(attrs) => attrs,
            Err(SourceError::NodeNotFound(_)) => {
                let mut result = BrowseResult::failed(format!(
                    "Node '{start}' not found in the server address space"
                ));
                result.namespaces = table.entries().to_vec();
                return result;
            }
            Err(e) => {
                let mut result =
                    BrowseResult::failed(format!("Node '{start}' not accessible: {e}"));
                result.namespaces = table.entries().to_vec();
                return result;
            }
        };

        let mut session = Session {
            source,
            result: BrowseResult::new(),
            table,
            visited: HashSet::new(),
        };

        if let Err(e) = self.visit(&mut session, start, start_attrs, None, None, false, 0) {
            warn!("Session aborted: {e}");
            session.result.fail(e.to_string());
        }

        session.result.namespaces = session.table.entries().to_vec();

        if session.result.total_nodes == 0 && session.result.success {
            warn!(start = %self.config.start_node, "No nodes discovered");
        }

        self.apply_projections(&mut session.result);

        info!(
            nodes = session.result.total_nodes,
            max_depth = session.result.max_depth_reached,
            success = session.result.success,
            "Browse session finished"
        );
        session.result
    }

    // Emit one node and recurse into its children. `Err` means a fatal
    // source error; recoverable errors never escape this function.
    #[allow(clippy::too_many_arguments)]
    fn visit(
        &self,
        session: &mut Session<'_>,
        node_id: NodeId,
        attrs: crate::source::NodeAttributes,
        parent_id: Option<&NodeId>,
        parent_path: Option<&str>,
        parent_is_namespace: bool,
        depth: u32,
    ) -> Result<(), SourceError> {
        session.visited.insert(node_id.clone());

        let is_namespace_node = self.classifier.is_namespace_node(&ClassifierContext {
            node_id: &node_id,
            browse_name: &attrs.browse_name,
            node_class: attrs.node_class,
            parent_is_namespace,
        });

        let mut data_type = None;
        let mut value = None;
        if attrs.node_class == NodeClass::Variable {
            data_type = absorb(session.source.read_data_type(&node_id), &node_id)?;
            if self.config.include_values {
                value = absorb(session.source.read_value(&node_id), &node_id)?;
            }
        }

        let extended = if self.config.include_extended {
            absorb(session.source.read_extended(&node_id), &node_id)?.filter(|e| !e.is_empty())
        } else {
            None
        };

        let full_path = match parent_path {
            Some(path) => format!("{path}/{}", attrs.browse_name),
            None => attrs.browse_name.clone(),
        };

        let record = NodeRecord {
            node_id: node_id.clone(),
            browse_name: attrs.browse_name,
            display_name: attrs.display_name,
            node_class: attrs.node_class,
            data_type,
            value,
            parent_id: parent_id.cloned(),
            depth,
            namespace_index: node_id.namespace,
            is_namespace_node,
            full_path: full_path.clone(),
            timestamp: Utc::now(),
            extended,
        };
        session.table.record_node(node_id.namespace);
        session.result.add_record(record);

        if session.result.total_nodes % 100 == 0 {
            debug!(nodes = session.result.total_nodes, "Discovery progress");
        }

        // Nodes at the depth cutoff are recorded but never expanded.
        if depth >= self.config.max_depth {
            return Ok(());
        }

        let children = match session.source.children(&node_id) {
            Ok(children) => children,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                debug!(node = %node_id, "Could not get children: {e}");
                return Ok(());
            }
        };

        for child in children {
            // First-discovery-wins: a node already emitted keeps the parent
            // it was first reached from.
            if session.visited.contains(&child) {
                continue;
            }
            let child_attrs = match session.source.read_attributes(&child) {
                Ok(attrs) => attrs,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(node = %child, "Skipping unreadable node: {e}");
                    continue;
                }
            };
            self.visit(
                session,
                child,
                child_attrs,
                Some(&node_id),
                Some(&full_path),
                is_namespace_node,
                depth + 1,
            )?;
        }

        Ok(())
    }

    // Post-traversal projections. Depth and path values stay as computed
    // against the unfiltered structure; only the emitted set shrinks.
    fn apply_projections(&self, result: &mut BrowseResult) {
        if self.config.namespaces_only {
            result.nodes.retain(|n| n.is_namespace_node);
        }
        if let Some(index) = self.config.namespace_filter {
            result.nodes.retain(|n| n.namespace_index == index);
        }
        result.total_nodes = result.nodes.len();
    }
}

// Turn a recoverable per-node read failure into an absent field; propagate
// fatal errors.
fn absorb<T>(read: Result<T, SourceError>, node: &NodeId) -> Result<Option<T>, SourceError> {
    match read {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            debug!(node = %node, "Attribute read recovered: {e}");
            Ok(None)
        }
    }
}
