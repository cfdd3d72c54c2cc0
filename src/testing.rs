//! Shared fixtures for the test suite
//!
//! Small synthetic address spaces with known shapes, used wherever a test
//! needs structure the demo space does not have.

use crate::model::NodeId;
use crate::source::{StaticNode, StaticSource};

/// A linear chain of `n` Object nodes: `i=1 -> i=2 -> ... -> i=n`
///
/// Node `i=k` is named `Nk`; the chain starts at `i=1`.
#[must_use]
pub fn chain_space(n: u32) -> StaticSource {
    let mut source = StaticSource::new(["base"]);
    for k in 1..=n {
        source.insert(NodeId::numeric(0, k), StaticNode::object(&format!("N{k}")));
    }
    for k in 1..n {
        source.link(&NodeId::numeric(0, k), NodeId::numeric(0, k + 1));
    }
    source
}

/// A two-node cycle: `i=1` ("A") and `i=2` ("B") reference each other
#[must_use]
pub fn cyclic_space() -> StaticSource {
    let mut source = StaticSource::new(["base"]);
    let a = NodeId::numeric(0, 1);
    let b = NodeId::numeric(0, 2);
    source
        .insert(a.clone(), StaticNode::object("A"))
        .insert(b.clone(), StaticNode::object("B"))
        .link(&a, b.clone())
        .link(&b, a);
    source
}
