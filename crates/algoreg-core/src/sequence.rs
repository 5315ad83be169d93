//! # Id Sequence
//!
//! One monotonically increasing counter per registry. The counter is
//! incremented before assignment, so the first id handed out is 1. Ids are
//! never reused; there is no operation that rewinds the counter.
//!
//! A resumed counter is capped at [`IdSequence::MAX_RESUMABLE`]. Anything
//! above it is refused, so at least 2^63 allocations separate a restored
//! counter from the end of the `u64` space and `allocate` cannot wrap
//! onto an id already in use.

/// A per-registry id counter.
///
/// Holds the last id assigned (0 before any allocation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdSequence {
    last: u64,
}

impl IdSequence {
    /// A fresh sequence; the next allocation returns 1.
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Highest `last` value [`IdSequence::resume`] accepts.
    pub const MAX_RESUMABLE: u64 = i64::MAX as u64;

    /// Resume a sequence whose last assigned id was `last`.
    ///
    /// Returns `None` when `last` exceeds [`Self::MAX_RESUMABLE`].
    pub const fn resume(last: u64) -> Option<Self> {
        if last > Self::MAX_RESUMABLE {
            None
        } else {
            Some(Self { last })
        }
    }

    /// Increment and return the new id.
    ///
    /// Every sequence starts at 0 or at a resumed value no greater than
    /// [`Self::MAX_RESUMABLE`], so the increment cannot overflow in fewer
    /// than 2^63 allocations.
    pub fn allocate(&mut self) -> u64 {
        self.last += 1;
        self.last
    }

    /// The last id assigned, or 0 if none.
    pub const fn last(&self) -> u64 {
        self.last
    }

    /// The id the next `allocate()` will return.
    pub const fn peek_next(&self) -> u64 {
        self.last + 1
    }

    /// Whether `id` has been handed out by this sequence.
    pub const fn has_allocated(&self, id: u64) -> bool {
        id >= 1 && id <= self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_allocation_is_one() {
        let mut seq = IdSequence::new();
        assert_eq!(seq.last(), 0);
        assert_eq!(seq.peek_next(), 1);
        assert_eq!(seq.allocate(), 1);
        assert_eq!(seq.last(), 1);
    }

    #[test]
    fn test_resume_continues_after_last() {
        let mut seq = IdSequence::resume(41).unwrap();
        assert_eq!(seq.allocate(), 42);
    }

    #[test]
    fn test_resume_refuses_counter_near_u64_max() {
        assert!(IdSequence::resume(u64::MAX).is_none());
        assert!(IdSequence::resume(IdSequence::MAX_RESUMABLE + 1).is_none());

        let mut seq = IdSequence::resume(IdSequence::MAX_RESUMABLE).unwrap();
        assert_eq!(seq.allocate(), IdSequence::MAX_RESUMABLE + 1);
    }

    #[test]
    fn test_has_allocated() {
        let mut seq = IdSequence::new();
        assert!(!seq.has_allocated(0));
        assert!(!seq.has_allocated(1));
        seq.allocate();
        seq.allocate();
        assert!(seq.has_allocated(1));
        assert!(seq.has_allocated(2));
        assert!(!seq.has_allocated(3));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Allocations are exactly 1..=n with no gaps or repeats.
        #[test]
        fn allocations_are_dense_and_strictly_increasing(n in 1usize..500) {
            let mut seq = IdSequence::new();
            let ids: Vec<u64> = (0..n).map(|_| seq.allocate()).collect();
            let expected: Vec<u64> = (1..=n as u64).collect();
            prop_assert_eq!(ids, expected);
            prop_assert_eq!(seq.last(), n as u64);
        }

        /// A resumed sequence never hands out an id at or below its start.
        #[test]
        fn resumed_sequence_never_reuses(start in 0u64..1_000_000, n in 1usize..50) {
            let mut seq = IdSequence::resume(start).unwrap();
            for _ in 0..n {
                prop_assert!(seq.allocate() > start);
            }
        }
    }
}
