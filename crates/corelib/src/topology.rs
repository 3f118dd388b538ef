//! Ring topology views.
//!
//! High-level answers derived from a built ring: how much of the circle each
//! node owns, and which keys change owner when membership changes.

use crate::error::Result;
use crate::ring::HashRing;
use crate::token::RING_SIZE;
use serde::{Deserialize, Serialize};

/// Share of the ring owned by one physical node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ownership {
    pub node: String,
    /// Number of ring slots whose keys this node owns.
    pub degrees: u16,
    /// Number of positions (physical + virtual) the node holds.
    pub positions: usize,
}

impl Ownership {
    /// Owned fraction of the ring, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        f64::from(self.degrees) / f64::from(RING_SIZE)
    }
}

/// Computes per-node ownership in membership order.
///
/// A position owns the slots after its predecessor up to and including its
/// own hash. The lowest position also owns everything past the highest one.
/// Positions that share a hash with an earlier one own nothing. For a
/// non-empty ring the degrees always sum to [`RING_SIZE`].
pub fn ownership(ring: &HashRing) -> Vec<Ownership> {
    let mut shares: Vec<Ownership> = ring
        .node_names()
        .map(|node| Ownership {
            node: node.to_string(),
            degrees: 0,
            positions: 0,
        })
        .collect();

    let positions = ring.positions();
    let (Some(first), Some(last)) = (positions.first(), positions.last()) else {
        return shares;
    };

    for (i, pos) in positions.iter().enumerate() {
        let arc = if i == 0 {
            RING_SIZE - (last.hash.degrees() - first.hash.degrees())
        } else {
            positions[i - 1].hash.distance_to(pos.hash)
        };
        if let Some(share) = shares.iter_mut().find(|s| s.node == pos.owner) {
            share.degrees += arc;
            share.positions += 1;
        }
    }
    shares
}

/// A key whose owner differs between two rings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMove {
    pub key: String,
    pub from: String,
    pub to: String,
}

/// Lists keys that change owner going from `before` to `after`.
///
/// Both rings must be non-empty when `keys` is non-empty.
pub fn movement<I, K>(before: &HashRing, after: &HashRing, keys: I) -> Result<Vec<KeyMove>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let mut moves = Vec::new();
    for key in keys {
        let key = key.as_ref();
        let from = before.assign(key)?;
        let to = after.assign(key)?;
        if from != to {
            moves.push(KeyMove {
                key: key.to_string(),
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }
    Ok(moves)
}
