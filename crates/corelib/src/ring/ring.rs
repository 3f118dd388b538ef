//! Hash ring data structure.
//!
//! A [`HashRing`] is an immutable snapshot: the sorted positions are derived
//! from the membership list and the replica count when the ring is built, and
//! every membership change produces a new ring. Nothing is patched in place,
//! so there is no derived state to invalidate.

use crate::error::{Error, Result};
use crate::node::Node;
use crate::partitioner::{Partitioner, RollingHashPartitioner};
use crate::ring::distribution::Distribution;
use crate::ring::position::RingPosition;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Virtual replicas per physical node when none is configured.
pub const DEFAULT_VNODES: usize = 3;

/// Sorted set of ring positions for a fixed membership.
#[derive(Clone)]
pub struct HashRing {
    nodes: Vec<Node>,
    vnodes: usize,
    positions: Vec<RingPosition>,
    partitioner: Arc<dyn Partitioner>,
}

impl HashRing {
    /// Create an empty ring with the default partitioner.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            vnodes: DEFAULT_VNODES,
            positions: Vec::new(),
            partitioner: Arc::new(RollingHashPartitioner),
        }
    }

    fn build(nodes: Vec<Node>, vnodes: usize, partitioner: Arc<dyn Partitioner>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !seen.insert(node.name.as_str()) {
                return Err(Error::DuplicateNode(node.name.clone()));
            }
        }

        let mut positions: Vec<RingPosition> = nodes
            .iter()
            .flat_map(|node| node.placements(vnodes))
            .map(|vnode| RingPosition::place(&vnode, partitioner.as_ref()))
            .collect();
        // `sort_by_key` is stable: equal hashes keep build order.
        positions.sort_by_key(|p| p.hash);

        debug!(
            nodes = nodes.len(),
            vnodes,
            positions = positions.len(),
            partitioner = partitioner.name(),
            "built hash ring"
        );

        Ok(Self {
            nodes,
            vnodes,
            positions,
            partitioner,
        })
    }

    /// All positions, ascending by hash.
    pub fn positions(&self) -> &[RingPosition] {
        &self.positions
    }

    /// Physical members in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Physical member names in insertion order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name.as_str())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn virtual_nodes_per_node(&self) -> usize {
        self.vnodes
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    /// Name of the partitioner used to place positions.
    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Positions owned by `name`, in ring order.
    pub fn positions_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RingPosition> + 'a {
        self.positions.iter().filter(move |p| p.owner == name)
    }

    /// The position responsible for `key`.
    ///
    /// # Algorithm
    ///
    /// 1. Hash the key onto the ring
    /// 2. Binary search for the first position with `hash >= key_hash`
    /// 3. If the key lies past the last position, wrap to the first
    ///
    /// Among positions sharing a hash, the earliest-built one wins.
    pub fn lookup_position(&self, key: &str) -> Result<&RingPosition> {
        if self.positions.is_empty() {
            return Err(Error::EmptyRing);
        }
        let key_hash = self.partitioner.partition(key);
        let idx = self.positions.partition_point(|p| p.hash < key_hash);
        let idx = if idx == self.positions.len() { 0 } else { idx };
        Ok(&self.positions[idx])
    }

    /// Name of the node that owns `key`.
    pub fn assign(&self, key: &str) -> Result<&str> {
        self.lookup_position(key).map(|p| p.owner.as_str())
    }

    /// Assigns every key, grouping them by owning node.
    ///
    /// Every member appears in the result, including members with no keys.
    /// Keys keep their input order within each group; duplicates in the input
    /// are kept as given.
    pub fn distribute<I, K>(&self, keys: I) -> Result<Distribution>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut distribution = Distribution::with_nodes(self.node_names());
        for key in keys {
            let key = key.as_ref();
            let owner = self.assign(key)?;
            distribution.push(owner, key);
        }
        Ok(distribution)
    }

    /// A new ring with `name` added as the last member.
    pub fn with_node(&self, name: impl Into<String>) -> Result<Self> {
        let mut nodes = self.nodes.clone();
        nodes.push(Node::new(name)?);
        Self::build(nodes, self.vnodes, Arc::clone(&self.partitioner))
    }

    /// A new ring without `name`.
    pub fn without_node(&self, name: &str) -> Result<Self> {
        if !self.contains(name) {
            return Err(Error::UnknownNode(name.to_string()));
        }
        let nodes = self.nodes.iter().filter(|n| n.name != name).cloned().collect();
        Self::build(nodes, self.vnodes, Arc::clone(&self.partitioner))
    }

    /// A new ring with the same members and a different replica count.
    pub fn with_vnodes(&self, vnodes: usize) -> Result<Self> {
        Self::build(self.nodes.clone(), vnodes, Arc::clone(&self.partitioner))
    }
}

impl Default for HashRing {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("nodes", &self.nodes.len())
            .field("vnodes", &self.vnodes)
            .field("positions", &self.positions)
            .field("partitioner", &self.partitioner.name())
            .finish()
    }
}

/// Builds a ring from node names with `vnodes` replicas each.
///
/// Names must be non-empty and unique; the first offending name is reported.
pub fn build_ring<I, S>(names: I, vnodes: usize) -> Result<HashRing>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    RingBuilder::new().with_vnodes(vnodes).add_nodes(names).build()
}

/// Builder for [`HashRing`].
///
/// Name validation is deferred to [`build`](RingBuilder::build) so the
/// builder chain stays infallible.
pub struct RingBuilder {
    names: Vec<String>,
    vnodes: usize,
    partitioner: Arc<dyn Partitioner>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            vnodes: DEFAULT_VNODES,
            partitioner: Arc::new(RollingHashPartitioner),
        }
    }

    /// Virtual replicas per physical node.
    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.vnodes = vnodes;
        self
    }

    pub fn with_partitioner<P: Partitioner>(mut self, partitioner: P) -> Self {
        self.partitioner = Arc::new(partitioner);
        self
    }

    pub fn add_node(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    pub fn add_nodes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<HashRing> {
        let nodes = self
            .names
            .into_iter()
            .map(Node::new)
            .collect::<Result<Vec<_>>>()?;
        HashRing::build(nodes, self.vnodes, self.partitioner)
    }
}

impl Default for RingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Angle;

    fn demo_ring() -> HashRing {
        build_ring(["Node A", "Node B", "Node C"], 3).unwrap()
    }

    #[test]
    fn test_demo_ring_layout() {
        let ring = demo_ring();
        let layout: Vec<(u16, &str, bool)> = ring
            .positions()
            .iter()
            .map(|p| (p.hash.degrees(), p.owner.as_str(), p.is_virtual))
            .collect();
        assert_eq!(
            layout,
            vec![
                (41, "Node A", true),
                (42, "Node A", true),
                (43, "Node A", true),
                (130, "Node B", true),
                (131, "Node B", true),
                (132, "Node B", true),
                (219, "Node C", true),
                (220, "Node C", true),
                (221, "Node C", true),
                (307, "Node C", false),
                (308, "Node B", false),
                (309, "Node A", false),
            ]
        );
    }

    #[test]
    fn test_assign_clockwise_and_wrap() {
        let ring = demo_ring();
        // user:1 hashes to 182, next position clockwise is 219.
        assert_eq!(ring.assign("user:1").unwrap(), "Node C");
        // cart:789 hashes to 102 -> 130.
        assert_eq!(ring.assign("cart:789").unwrap(), "Node B");
        // hello hashes to 322, past every position: wraps to 41.
        assert_eq!(ring.assign("hello").unwrap(), "Node A");
        assert_eq!(ring.lookup_position("hello").unwrap().hash, Angle::new(41));
    }

    #[test]
    fn test_assign_exact_hit() {
        let ring = demo_ring();
        // "Node A" as a key lands exactly on Node A's physical position.
        let pos = ring.lookup_position("Node A").unwrap();
        assert_eq!(pos.hash.degrees(), 309);
        assert!(!pos.is_virtual);
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        // "Node B-v3" and "node-1" both hash to 130.
        let ring = build_ring(["Node B", "node-1"], 3).unwrap();
        assert_eq!(ring.assign("Node B-v3").unwrap(), "Node B");

        let ring = build_ring(["node-1", "Node B"], 3).unwrap();
        assert_eq!(ring.assign("Node B-v3").unwrap(), "node-1");
    }

    #[test]
    fn test_empty_ring_rejects_lookup() {
        let ring = build_ring(Vec::<String>::new(), 3).unwrap();
        assert!(ring.is_empty());
        assert_eq!(ring.assign("k"), Err(Error::EmptyRing));
        assert_eq!(HashRing::new().assign("k"), Err(Error::EmptyRing));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = build_ring(["a", "b", "a"], 1).unwrap_err();
        assert_eq!(err, Error::DuplicateNode("a".to_string()));
    }

    #[test]
    fn test_with_and_without_node() {
        let ring = demo_ring();
        let bigger = ring.with_node("Node D").unwrap();
        assert_eq!(bigger.node_count(), 4);
        assert_eq!(bigger.position_count(), 16);
        assert_eq!(ring.node_count(), 3, "original ring is untouched");

        assert_eq!(
            ring.with_node("Node A").unwrap_err(),
            Error::DuplicateNode("Node A".to_string())
        );

        let smaller = ring.without_node("Node B").unwrap();
        assert_eq!(smaller.node_names().collect::<Vec<_>>(), vec!["Node A", "Node C"]);
        assert_eq!(smaller.positions_for("Node B").count(), 0);
        assert_eq!(
            ring.without_node("Node Z").unwrap_err(),
            Error::UnknownNode("Node Z".to_string())
        );
    }

    #[test]
    fn test_with_vnodes_rebuilds() {
        let ring = demo_ring().with_vnodes(0).unwrap();
        assert_eq!(ring.position_count(), 3);
        assert!(ring.positions().iter().all(|p| !p.is_virtual));
    }
}
