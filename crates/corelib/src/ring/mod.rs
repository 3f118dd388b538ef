//! Consistent hash ring implementation.
//!
//! The ring holds sorted positions for a fixed membership and answers
//! clockwise lookups. Membership changes always rebuild the ring.

pub mod cache;
pub mod distribution;
pub mod position;
pub mod ring;

pub use cache::RingCache;
pub use distribution::{Distribution, NodeKeys};
pub use position::RingPosition;
pub use ring::{build_ring, HashRing, RingBuilder, DEFAULT_VNODES};
