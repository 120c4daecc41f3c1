//! Mapped backing - id-keyed map behind one reader/writer lock
//!
//! Writers take the exclusive lock to insert, readers the shared lock to
//! look up; the lock supplies the publish/acquire relationship. Slower
//! than the dense array under heavy writer concurrency, but tolerant of
//! capacities that turn out to be estimates: ids past the planned size are
//! still accepted, and the structural pass reports the overrun afterward.

use std::collections::HashMap;

use parking_lot::RwLock;

use trove_core::{Row, RowId, StoreResult};

use crate::slots::RowSlots;

/// Elastic row storage guarded by a single `RwLock`.
pub struct MappedSlots {
    rows: RwLock<HashMap<u64, Row>>,
}

impl MappedSlots {
    /// Reserve for the planned capacity up front so the hot path does not
    /// pay for rehashing.
    pub fn with_capacity(capacity: usize) -> Self {
        MappedSlots {
            rows: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }
}

impl RowSlots for MappedSlots {
    fn publish(&self, row: Row) -> StoreResult<()> {
        self.rows.write().insert(row.id.as_u64(), row);
        Ok(())
    }

    fn fetch(&self, id: RowId) -> Option<Row> {
        self.rows.read().get(&id.as_u64()).cloned()
    }

    fn published(&self) -> usize {
        self.rows.read().len()
    }

    fn ids(&self) -> Vec<RowId> {
        let mut ids: Vec<RowId> = self.rows.read().keys().map(|&k| RowId::new(k)).collect();
        ids.sort_unstable();
        ids
    }

    fn reset(&mut self) {
        // HashMap::clear keeps the allocated table for reuse.
        self.rows.get_mut().clear();
    }
}
