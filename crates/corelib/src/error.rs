//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying a ring.
///
/// Every variant is an invalid-state rejection raised at the call boundary;
/// nothing is partially applied when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A lookup was attempted on a ring with no positions.
    #[error("ring has no positions; add a node before assigning keys")]
    EmptyRing,
    /// The same physical node name was supplied twice.
    #[error("duplicate node name: {0:?}")]
    DuplicateNode(String),
    /// The node name cannot be placed on the ring.
    #[error("invalid node: {0}")]
    InvalidNode(String),
    /// The node is not a member of the ring.
    #[error("unknown node: {0:?}")]
    UnknownNode(String),
}
