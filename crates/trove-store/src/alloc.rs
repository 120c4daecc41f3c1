//! Identity allocator - atomic, dense, monotonic row ids

use std::sync::atomic::{AtomicU64, Ordering};

use trove_core::RowId;

/// Hands out unique, densely increasing row ids.
///
/// Relaxed ordering is sufficient for uniqueness; it does NOT make a row's
/// content visible to other threads. Publication is the backing store's
/// job (ready flags in dense mode, the lock in mapped mode).
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator {
            next: AtomicU64::new(0),
        }
    }

    /// Issue the next id. Ids follow allocation order, not write
    /// completion order.
    #[inline]
    pub fn next(&self) -> RowId {
        RowId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to [`next`](Self::next) would issue. After a
    /// complete run this equals the store's expected size; the verifier
    /// checks exactly that.
    #[inline]
    pub fn next_unissued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }

    /// Restart the sequence at zero. Callers must be quiescent; the store
    /// enforces this by taking `&mut self` on `clear()`.
    pub fn reset(&mut self) {
        *self.next.get_mut() = 0;
    }
}
