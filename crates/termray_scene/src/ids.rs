//! Hit-id allocation.
//!
//! Every actor reserves a contiguous block of integer hit ids at
//! construction so that a ray query can report which face (or whole shape)
//! it struck with a single integer. The allocator is an explicit per-scene
//! object rather than process-wide state, which keeps tests independent:
//! each scene (or test) starts from a fresh counter.

use std::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;

/// Reserved id meaning "no hit". Allocation starts above it.
pub const NO_HIT: u32 = 0;

/// Errors raised when reserving hit ids.
#[derive(Error, Debug, PartialEq)]
pub enum IdError {
    #[error("hit id space exhausted: requested {requested}, {remaining} remaining")]
    Exhausted { requested: u32, remaining: u32 },
}

/// A contiguous block of hit ids owned by one actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdRange {
    start: u32,
    count: u32,
}

impl IdRange {
    /// First id in the block.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Number of ids in the block.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether an id belongs to this block.
    pub fn contains(&self, id: u32) -> bool {
        id >= self.start && id - self.start < self.count
    }

    /// Offset of an id within the block (e.g. a face index).
    ///
    /// Callers must check `contains` first.
    pub fn offset(&self, id: u32) -> usize {
        debug_assert!(self.contains(id));
        (id - self.start) as usize
    }

    /// The id at a given offset within the block.
    pub fn id_at(&self, offset: usize) -> u32 {
        debug_assert!((offset as u32) < self.count);
        self.start + offset as u32
    }
}

/// Per-scene allocator handing out non-overlapping id blocks.
///
/// The counter is atomic so a scene shared behind `Arc` can still construct
/// actors from multiple threads; ids are only ever reserved at construction
/// time, never during rendering.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU32,
}

impl IdAllocator {
    /// Create an allocator whose first handed-out id is `NO_HIT + 1`.
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(NO_HIT + 1),
        }
    }

    /// Reserve a contiguous block of `count` ids.
    pub fn reserve(&self, count: u32) -> Result<IdRange, IdError> {
        let start = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| {
                next.checked_add(count)
            })
            .map_err(|next| IdError::Exhausted {
                requested: count,
                remaining: u32::MAX - next,
            })?;
        Ok(IdRange { start, count })
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_never_overlap() {
        let allocator = IdAllocator::new();
        let a = allocator.reserve(6).unwrap();
        let b = allocator.reserve(4).unwrap();

        assert_eq!(a.start(), 1);
        assert_eq!(b.start(), 7);
        for id in b.start()..b.start() + b.count() {
            assert!(!a.contains(id));
        }
    }

    #[test]
    fn test_no_hit_is_never_allocated() {
        let allocator = IdAllocator::new();
        let range = allocator.reserve(3).unwrap();

        assert!(!range.contains(NO_HIT));
        assert_eq!(range.id_at(0), 1);
    }

    #[test]
    fn test_offset_round_trip() {
        let allocator = IdAllocator::new();
        allocator.reserve(10).unwrap();
        let range = allocator.reserve(5).unwrap();

        for offset in 0..5 {
            let id = range.id_at(offset);
            assert!(range.contains(id));
            assert_eq!(range.offset(id), offset);
        }
    }

    #[test]
    fn test_exhaustion() {
        let allocator = IdAllocator::new();
        let err = allocator.reserve(u32::MAX).unwrap_err();
        assert!(matches!(err, IdError::Exhausted { .. }));

        // A smaller request still succeeds afterwards.
        assert!(allocator.reserve(100).is_ok());
    }
}
