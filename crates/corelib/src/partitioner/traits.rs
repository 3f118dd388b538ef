//! Core partitioner trait definitions.

use crate::token::Angle;

/// A partitioner converts keys into angles for placement on the ring.
///
/// Partitioners are stateless and thread-safe, so one instance can be shared
/// by every ring built from it.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a key into a ring position.
    ///
    /// Must be pure: the same key always yields the same angle.
    fn partition(&self, key: &str) -> Angle;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
