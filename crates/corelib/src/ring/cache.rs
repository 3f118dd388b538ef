//! Memoized ring construction.
//!
//! Rebuilding a ring is cheap, but a presentation layer asks for it on every
//! redraw. [`RingCache`] keeps the last ring and hands it back while the
//! inputs are unchanged.

use crate::error::Result;
use crate::ring::ring::{build_ring, HashRing};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug)]
struct Entry {
    names: Vec<String>,
    vnodes: usize,
    ring: Arc<HashRing>,
}

/// Single-slot cache keyed on `(names, vnodes)`.
///
/// Safe to share between threads; concurrent callers with the same inputs
/// all receive the same `Arc`.
#[derive(Debug, Default)]
pub struct RingCache {
    slot: Mutex<Option<Entry>>,
}

impl RingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ring for `(names, vnodes)`, rebuilding only if either changed.
    ///
    /// A failed build leaves the previous entry in place.
    pub fn get(&self, names: &[String], vnodes: usize) -> Result<Arc<HashRing>> {
        let mut slot = self.slot.lock();
        if let Some(entry) = slot.as_ref() {
            if entry.vnodes == vnodes && entry.names == names {
                trace!(vnodes, nodes = names.len(), "ring cache hit");
                return Ok(Arc::clone(&entry.ring));
            }
        }

        let ring = Arc::new(build_ring(names.iter().cloned(), vnodes)?);
        *slot = Some(Entry {
            names: names.to_vec(),
            vnodes,
            ring: Arc::clone(&ring),
        });
        Ok(ring)
    }

    /// Drops the cached ring.
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hit_returns_same_ring() {
        let cache = RingCache::new();
        let a = cache.get(&names(&["x", "y"]), 3).unwrap();
        let b = cache.get(&names(&["x", "y"]), 3).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_changed_inputs_rebuild() {
        let cache = RingCache::new();
        let a = cache.get(&names(&["x", "y"]), 3).unwrap();
        let b = cache.get(&names(&["x", "y"]), 4).unwrap();
        let c = cache.get(&names(&["y", "x"]), 4).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&b, &c));
        assert_eq!(b.position_count(), 10);
    }

    #[test]
    fn test_failed_build_keeps_previous() {
        let cache = RingCache::new();
        let a = cache.get(&names(&["x"]), 1).unwrap();
        assert_eq!(
            cache.get(&names(&["x", "x"]), 1).unwrap_err(),
            Error::DuplicateNode("x".to_string())
        );
        let b = cache.get(&names(&["x"]), 1).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        cache.clear();
        let c = cache.get(&names(&["x"]), 1).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
