//! Partitioner abstraction for the hash ring.
//!
//! Partitioners are responsible for converting node names and keys into
//! angles that can be placed on the ring.

pub mod rolling;
pub mod traits;

pub use rolling::{hash, RollingHashPartitioner};
pub use traits::Partitioner;
