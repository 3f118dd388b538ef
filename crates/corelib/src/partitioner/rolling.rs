//! Rolling 31-multiplier string hash.
//!
//! # Algorithm
//!
//! For every UTF-16 code unit `c` of the input:
//!
//! ```text
//! h = (h << 5) - h + c      // i.e. h * 31 + c, truncated to a signed 32-bit int
//! ```
//!
//! The result is reduced with `|h % 360|`, where the remainder keeps the sign
//! of `h` before the absolute value is taken. This is a teaching hash: it is
//! neither cryptographic nor collision resistant, and strings that differ only
//! in their last character land on neighbouring angles.

use crate::partitioner::traits::Partitioner;
use crate::token::{Angle, RING_SIZE};

/// Hashes `s` onto the 360-slot ring.
///
/// ```rust
/// use corelib::partitioner::hash;
///
/// assert_eq!(hash("Node A").degrees(), 309);
/// assert_eq!(hash("").degrees(), 0);
/// ```
pub fn hash(s: &str) -> Angle {
    let h = s.encode_utf16().fold(0i32, |h, c| {
        (h << 5).wrapping_sub(h).wrapping_add(i32::from(c))
    });
    // `%` truncates toward zero, so i32::MIN is safe here and the abs never overflows.
    let slot = (h % i32::from(RING_SIZE)).unsigned_abs();
    Angle::new(slot)
}

/// Partitioner backed by [`hash`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RollingHashPartitioner;

impl Partitioner for RollingHashPartitioner {
    fn partition(&self, key: &str) -> Angle {
        hash(key)
    }

    fn name(&self) -> &'static str {
        "RollingHashPartitioner"
    }
}
