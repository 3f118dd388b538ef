//! Node abstractions for the hash ring.
//!
//! A physical node is identified by its name alone. Its ring positions are
//! derived from that name every time the ring is built, so a `Node` carries no
//! placement state of its own.

use crate::error::{Error, Result};
use crate::vnode::VirtualNode;

/// Physical node participating in the ring.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    /// Human-readable name; also the node's identity on the ring.
    pub name: String,
}

impl Node {
    /// Creates a node, rejecting names that cannot be placed on the ring.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidNode("node name must not be empty".to_string()));
        }
        Ok(Self { name })
    }

    /// The physical placement followed by `replicas` virtual ones.
    pub fn placements(&self, replicas: usize) -> impl Iterator<Item = VirtualNode> + '_ {
        (0..=replicas).map(move |index| VirtualNode::new(&self.name, index))
    }
}
