//! Identity types for the trove event store
//!
//! Row ids are 64-bit, allocator-issued and dense: a store of capacity N
//! uses exactly the ids `0..N`. Thread and event indices stay plain `u32`
//! values since they are coordinates into the capacity grid, not
//! identities of their own.

use std::fmt;

/// Row identity - dense index issued by the store's allocator.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RowId(pub u64);

impl RowId {
    pub const ZERO: RowId = RowId(0);

    #[inline]
    pub fn new(id: u64) -> Self {
        RowId(id)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Slot index for array-backed storage.
    #[inline]
    pub fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row({})", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RowId {
    #[inline]
    fn from(id: u64) -> Self {
        RowId(id)
    }
}
