//! Core library for the consistent hashing ring.
//!
//! This crate provides the ring used to teach consistent hashing:
//! - A rolling string hash onto a 360-slot circle
//! - Partitioner seam for placing names and keys
//! - Physical and virtual node placement
//! - Clockwise key assignment and key distribution
//! - Ownership and key-movement views over a built ring
//!
//! All ring operations are pure: a ring is rebuilt from its membership list
//! whenever that list changes.
//!
//! ```rust
//! use corelib::build_ring;
//!
//! let ring = build_ring(["Node A", "Node B", "Node C"], 3)?;
//! assert_eq!(ring.assign("user:1")?, "Node C");
//! # Ok::<(), corelib::Error>(())
//! ```

pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod topology;
pub mod vnode;

pub use error::{Error, Result};
pub use node::Node;
pub use partitioner::{hash, Partitioner};
pub use ring::{build_ring, Distribution, HashRing, RingBuilder, RingCache, RingPosition};
pub use token::Angle;
pub use topology::{movement, ownership, KeyMove, Ownership};
pub use vnode::VirtualNode;
