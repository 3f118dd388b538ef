//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! With a single position per node, a handful of nodes cut the circle into
//! very uneven arcs. Each physical node therefore also owns `v` replica
//! positions, placed by hashing `"{name}-v{i}"` for `i = 1..=v`. More replicas
//! give smoother key distribution at the cost of a larger ring.
//!
//! Index 0 denotes the physical placement itself, hashed from the bare name.

use std::fmt;

/// One placement of a physical node on the ring.
///
/// # Invariants
///
/// - `index == 0` is the physical placement, everything else is virtual
/// - The placement key is a pure function of `(owner, index)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualNode {
    /// The physical node that owns this placement.
    pub owner: String,
    /// Replica index; 0 for the physical position.
    pub index: usize,
}

impl VirtualNode {
    /// Create a placement for `owner` at replica `index`.
    pub fn new(owner: impl Into<String>, index: usize) -> Self {
        Self {
            owner: owner.into(),
            index,
        }
    }

    /// True for replica placements, false for the physical one.
    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.index > 0
    }

    /// The string hashed to place this node on the ring.
    pub fn key(&self) -> String {
        if self.is_virtual() {
            format!("{}-v{}", self.owner, self.index)
        } else {
            self.owner.clone()
        }
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual() {
            write!(f, "VNode({} #{})", self.owner, self.index)
        } else {
            write!(f, "Node({})", self.owner)
        }
    }
}
