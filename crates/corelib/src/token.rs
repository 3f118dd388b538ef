//! Ring token type.
//!
//! The ring is a circle of [`RING_SIZE`] slots, one per degree, so a token is
//! simply an angle. Keeping it a newtype stops raw integers from leaking into
//! ring arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of slots on the ring.
pub const RING_SIZE: u16 = 360;

/// Position on the ring, always in `[0, RING_SIZE)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(u16);

impl Angle {
    /// Smallest angle (start of ring).
    pub const ZERO: Angle = Angle(0);
    /// Largest angle (end of ring).
    pub const MAX: Angle = Angle(RING_SIZE - 1);

    /// Creates an angle, reducing the value onto the ring.
    pub fn new(degrees: u32) -> Self {
        Angle((degrees % u32::from(RING_SIZE)) as u16)
    }

    /// Returns the raw degree value.
    #[inline]
    pub fn degrees(self) -> u16 {
        self.0
    }

    /// Clockwise distance from `self` to `other`.
    ///
    /// Distance to itself is zero, not a full turn.
    pub fn distance_to(self, other: Angle) -> u16 {
        if other.0 >= self.0 {
            other.0 - self.0
        } else {
            RING_SIZE - self.0 + other.0
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl From<Angle> for u16 {
    fn from(angle: Angle) -> Self {
        angle.0
    }
}
