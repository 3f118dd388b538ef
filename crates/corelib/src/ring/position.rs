//! Ring position implementation.

use crate::partitioner::Partitioner;
use crate::token::Angle;
use crate::vnode::VirtualNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single hashed placement on the ring.
///
/// Ordering on the ring is by `hash` only; positions that share a hash keep
/// their build order, which [`HashRing`](crate::ring::HashRing) preserves
/// with a stable sort.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingPosition {
    /// Physical node that owns this position.
    pub owner: String,
    /// Where the position sits on the ring.
    pub hash: Angle,
    /// True for replica placements.
    pub is_virtual: bool,
    /// Replica index, 0 for the physical placement.
    pub replica: usize,
}

impl RingPosition {
    /// Hashes a placement through `partitioner`.
    pub fn place<P: Partitioner + ?Sized>(vnode: &VirtualNode, partitioner: &P) -> Self {
        Self {
            owner: vnode.owner.clone(),
            hash: partitioner.partition(&vnode.key()),
            is_virtual: vnode.is_virtual(),
            replica: vnode.index,
        }
    }
}

impl fmt::Display for RingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual {
            write!(f, "{:>3}° {} (virtual #{})", self.hash.degrees(), self.owner, self.replica)
        } else {
            write!(f, "{:>3}° {}", self.hash.degrees(), self.owner)
        }
    }
}
