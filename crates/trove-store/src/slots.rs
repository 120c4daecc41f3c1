//! Row backing interface
//!
//! Two historical store variants - a pre-sized array and a lock-guarded
//! map - are two implementations of this one trait, selected by
//! [`BackingMode`](trove_core::BackingMode) at construction.

use trove_core::{Row, RowId, StoreResult};

/// Storage for published rows.
///
/// Implementations own the publish/acquire relationship: once `publish`
/// returns, any thread that `fetch`es the same id sees the complete row.
/// `fetch` of an id that was never published (or was cleared) is `None`,
/// never a partially-written row.
pub trait RowSlots: Send + Sync {
    /// Publish a row under its allocator-issued id. Dense mode fails when
    /// the id has no backing slot (past capacity) or when the slot was
    /// already claimed by an earlier publish; mapped mode accepts both and
    /// leaves the overrun for the structural pass.
    fn publish(&self, row: Row) -> StoreResult<()>;

    /// Snapshot of a published row.
    fn fetch(&self, id: RowId) -> Option<Row>;

    /// Number of published rows.
    fn published(&self) -> usize;

    /// Finite snapshot of currently valid ids. Not restartable; reflects
    /// the rows published before the call.
    fn ids(&self) -> Vec<RowId>;

    /// Logically empty the storage without releasing its backing memory.
    /// Exclusive access is required; the store passes `&mut` down from
    /// `clear()`.
    fn reset(&mut self);
}
