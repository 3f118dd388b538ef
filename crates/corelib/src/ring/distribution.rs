//! Key-to-node groupings produced by [`HashRing::distribute`](crate::ring::HashRing::distribute).

use serde::{Deserialize, Serialize};

/// Keys assigned to a single node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeKeys {
    pub node: String,
    pub keys: Vec<String>,
}

/// Mapping from node name to its assigned keys, in ring membership order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution {
    entries: Vec<NodeKeys>,
}

impl Distribution {
    pub(crate) fn with_nodes<'a>(names: impl Iterator<Item = &'a str>) -> Self {
        Self {
            entries: names
                .map(|node| NodeKeys {
                    node: node.to_string(),
                    keys: Vec::new(),
                })
                .collect(),
        }
    }

    pub(crate) fn push(&mut self, node: &str, key: &str) {
        // Owners always come from the ring's own membership, so the entry exists.
        if let Some(entry) = self.entries.iter_mut().find(|e| e.node == node) {
            entry.keys.push(key.to_string());
        }
    }

    /// Keys owned by `node`, or `None` if it is not a member.
    pub fn get(&self, node: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.node == node)
            .map(|e| e.keys.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeKeys> {
        self.entries.iter()
    }

    /// Number of nodes in the mapping.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total keys across all nodes.
    pub fn key_count(&self) -> usize {
        self.entries.iter().map(|e| e.keys.len()).sum()
    }
}

impl IntoIterator for Distribution {
    type Item = NodeKeys;
    type IntoIter = std::vec::IntoIter<NodeKeys>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
