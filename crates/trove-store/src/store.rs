//! The event store - write/read path over a selected backing
//!
//! `write` allocates an id, normalizes text fields, stamps the row and
//! publishes it through the backing. `read` returns an owned snapshot.
//! `clear` resets the allocator and logically empties storage without
//! releasing backing memory, so a store can be reused across repeated
//! benchmark runs with zero reallocation.

use std::sync::Arc;

use trove_core::{
    BackingMode, BoundedText, Row, RowId, RowView, StoreConfig, StoreResult, FALLBACK_LABEL,
    FALLBACK_PAYLOAD,
};

use crate::admission::{self, MemoryProbe, SystemMemoryProbe};
use crate::alloc::IdAllocator;
use crate::clock::EpochClock;
use crate::dense::DenseSlots;
use crate::mapped::MappedSlots;
use crate::slots::RowSlots;

/// Orderings for [`EventStore::ids_sorted`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    /// Allocation order (ids are already dense).
    Id,
    /// Producing thread, ties by id.
    Thread,
    /// Recorded timestamp, unstamped rows first, ties by id.
    Time,
    /// Payload bytes, lexicographic.
    Value,
}

/// Fixed-capacity concurrent event store.
///
/// Writers call [`write`](Self::write) concurrently; readers may overlap.
/// [`clear`](Self::clear) takes `&mut self`, so the borrow checker
/// enforces the writers-joined quiescence the reset protocol requires.
pub struct EventStore {
    config: StoreConfig,
    alloc: IdAllocator,
    clock: Arc<EpochClock>,
    slots: Box<dyn RowSlots>,
}

impl std::fmt::Debug for EventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EventStore {
    /// Open a store after an admission check against the running system.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        Self::open_with(config, &SystemMemoryProbe, Arc::new(EpochClock::new()))
    }

    /// Open with an injected memory probe and epoch clock. The admission
    /// check runs before any row storage is allocated; a refused shape
    /// allocates nothing.
    pub fn open_with(
        config: StoreConfig,
        probe: &dyn MemoryProbe,
        clock: Arc<EpochClock>,
    ) -> StoreResult<Self> {
        config.validate()?;
        admission::check(&config, probe)?;

        let capacity = config.expected_size() as usize;
        let slots: Box<dyn RowSlots> = match config.backing {
            BackingMode::Dense => Box::new(DenseSlots::with_capacity(capacity)),
            BackingMode::Mapped => Box::new(MappedSlots::with_capacity(capacity)),
        };

        Ok(EventStore {
            config,
            alloc: IdAllocator::new(),
            clock,
            slots,
        })
    }

    #[inline]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Total planned capacity.
    #[inline]
    pub fn expected_size(&self) -> u64 {
        self.config.expected_size()
    }

    /// The store's epoch clock.
    pub fn clock(&self) -> &Arc<EpochClock> {
        &self.clock
    }

    /// Claim an id and publish a row.
    ///
    /// Text fields are normalized, never rejected: oversized input is
    /// truncated at a char boundary, empty kind/category become
    /// `"UNKNOWN"`, an empty value becomes `"<no payload>"`. The row is
    /// stamped when timestamps are enabled or `debug` is set. Fails only
    /// on capacity exhaustion in dense mode.
    pub fn write(
        &self,
        thread_id: u32,
        event_id: u32,
        value: &str,
        kind: &str,
        category: &str,
        debug: bool,
    ) -> StoreResult<RowId> {
        let id = self.alloc.next();

        let timestamp_us =
            (self.config.use_timestamps || debug).then(|| self.clock.stamp());

        let row = Row {
            id,
            thread_id,
            event_id,
            is_debug: debug,
            kind: BoundedText::normalize(kind, self.config.max_kind_len, FALLBACK_LABEL),
            category: BoundedText::normalize(
                category,
                self.config.max_category_len,
                FALLBACK_LABEL,
            ),
            value: BoundedText::normalize(value, self.config.max_value_len, FALLBACK_PAYLOAD),
            timestamp_us,
        };

        self.slots.publish(row)?;
        Ok(id)
    }

    /// Snapshot of a published row; `None` for unpublished or cleared ids.
    pub fn read(&self, id: RowId) -> Option<RowView> {
        self.slots.fetch(id).map(RowView::from)
    }

    /// Number of published rows.
    pub fn size(&self) -> usize {
        self.slots.published()
    }

    /// Finite snapshot of currently valid ids.
    pub fn all_ids(&self) -> Vec<RowId> {
        self.slots.ids()
    }

    /// The id the allocator would issue next. Equals `expected_size()`
    /// after a complete, gap-free run.
    pub fn next_unissued(&self) -> u64 {
        self.alloc.next_unissued()
    }

    /// Recorded timestamp for a row, if the row exists and was stamped.
    pub fn timestamp_us(&self, id: RowId) -> Option<u64> {
        self.slots.fetch(id)?.timestamp_us
    }

    /// Span from the first to the last recorded timestamp across all
    /// published rows, in microseconds. `None` when no rows are stamped;
    /// a single stamped row spans zero.
    pub fn claim_span_micros(&self) -> Option<u64> {
        let mut first: Option<u64> = None;
        let mut last: Option<u64> = None;
        for id in self.slots.ids() {
            if let Some(ts) = self.slots.fetch(id).and_then(|row| row.timestamp_us) {
                first = Some(first.map_or(ts, |f: u64| f.min(ts)));
                last = Some(last.map_or(ts, |l: u64| l.max(ts)));
            }
        }
        Some(last? - first?)
    }

    /// Published ids ordered by the given key. A support API for
    /// presentation layers; not part of the hot path.
    pub fn ids_sorted(&self, key: SortKey) -> Vec<RowId> {
        let ids = self.slots.ids();
        match key {
            SortKey::Id => ids,
            SortKey::Thread => self.sort_by(ids, |row| (row.thread_id, row.id)),
            SortKey::Time => self.sort_by(ids, |row| (row.timestamp_us, row.id)),
            SortKey::Value => {
                self.sort_by(ids, |row| (row.value.as_str().as_bytes().to_vec(), row.id))
            }
        }
    }

    fn sort_by<K: Ord>(&self, ids: Vec<RowId>, key: impl Fn(&Row) -> K) -> Vec<RowId> {
        let mut rows: Vec<(K, RowId)> = ids
            .into_iter()
            .filter_map(|id| self.slots.fetch(id).map(|row| (key(&row), id)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows.into_iter().map(|(_, id)| id).collect()
    }

    /// Reset the id sequence and logically empty the store. Backing
    /// memory is retained, enabling zero-allocation reuse. The epoch
    /// baseline is NOT reset; it belongs to the clock, not the run.
    pub fn clear(&mut self) {
        self.slots.reset();
        self.alloc.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::FixedMemoryProbe;
    use trove_core::StoreError;

    const ROOMY: FixedMemoryProbe = FixedMemoryProbe(64 << 30);

    fn open(config: StoreConfig) -> EventStore {
        EventStore::open_with(config, &ROOMY, Arc::new(EpochClock::new())).unwrap()
    }

    #[test]
    fn test_write_read_roundtrip() {
        let store = open(StoreConfig::new(2, 4));
        let id = store.write(1, 2, "payload-1-2", "INFO", "NET", false).unwrap();

        let view = store.read(id).unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.thread_id, 1);
        assert_eq!(view.event_id, 2);
        assert_eq!(view.value, "payload-1-2");
        assert_eq!(view.kind, "INFO");
        assert_eq!(view.category, "NET");
        assert!(view.timestamp_us.is_some());
    }

    #[test]
    fn test_empty_fields_take_fallbacks() {
        let store = open(StoreConfig::new(1, 2));
        let id = store.write(0, 0, "", "", "", false).unwrap();

        let view = store.read(id).unwrap();
        assert_eq!(view.value, FALLBACK_PAYLOAD);
        assert_eq!(view.kind, FALLBACK_LABEL);
        assert_eq!(view.category, FALLBACK_LABEL);
    }

    #[test]
    fn test_oversized_payload_truncated_not_rejected() {
        let store = open(StoreConfig::new(1, 2).with_value_len(16));
        let long = "x".repeat(100);
        let id = store.write(0, 0, &long, "INFO", "NET", false).unwrap();

        let view = store.read(id).unwrap();
        assert_eq!(view.value.len(), 16);
        assert!(long.starts_with(&view.value));
    }

    #[test]
    fn test_unknown_id_reads_none() {
        let store = open(StoreConfig::new(1, 4));
        assert!(store.read(RowId::new(2)).is_none());
    }

    #[test]
    fn test_dense_capacity_exhaustion_is_rejected() {
        let store = open(StoreConfig::new(1, 2));
        store.write(0, 0, "a", "INFO", "NET", false).unwrap();
        store.write(0, 1, "b", "INFO", "NET", false).unwrap();

        let err = store.write(0, 2, "c", "INFO", "NET", false).unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded { id: 2, .. }));
        assert_eq!(store.size(), 2);
        // The id was burned: the allocator has moved past capacity.
        assert_eq!(store.next_unissued(), 3);
    }

    #[test]
    fn test_mapped_mode_accepts_overrun() {
        let store = open(StoreConfig::new(1, 2).with_backing(BackingMode::Mapped));
        for e in 0..3 {
            store.write(0, e, "x", "INFO", "NET", false).unwrap();
        }
        assert_eq!(store.size(), 3);
    }

    #[test]
    fn test_clear_resets_ids_and_size() {
        let mut store = open(StoreConfig::new(2, 2));
        for e in 0..2 {
            store.write(0, e, "x", "INFO", "NET", false).unwrap();
            store.write(1, e, "y", "INFO", "DB", false).unwrap();
        }
        assert_eq!(store.size(), 4);

        store.clear();
        assert_eq!(store.size(), 0);
        assert_eq!(store.next_unissued(), 0);
        assert!(store.all_ids().is_empty());

        // A second identical workload fits again.
        for e in 0..2 {
            store.write(0, e, "x", "INFO", "NET", false).unwrap();
            store.write(1, e, "y", "INFO", "DB", false).unwrap();
        }
        assert_eq!(store.size(), 4);
    }

    #[test]
    fn test_clear_keeps_epoch_baseline() {
        let mut store = open(StoreConfig::new(1, 2));
        store.write(0, 0, "x", "INFO", "NET", false).unwrap();
        let baseline = store.clock().baseline_micros().unwrap();

        store.clear();
        store.write(0, 0, "x", "INFO", "NET", false).unwrap();
        assert_eq!(store.clock().baseline_micros(), Some(baseline));
    }

    #[test]
    fn test_timestamps_disabled_unless_debug() {
        let store = open(StoreConfig::new(1, 4).with_timestamps(false));
        let plain = store.write(0, 0, "x", "INFO", "NET", false).unwrap();
        let debug = store.write(0, 1, "x", "INFO", "NET", true).unwrap();

        assert_eq!(store.timestamp_us(plain), None);
        assert!(store.timestamp_us(debug).is_some());
    }

    #[test]
    fn test_claim_span_covers_first_to_last() {
        let store = open(StoreConfig::new(1, 8));
        for e in 0..8 {
            store.write(0, e, "x", "INFO", "NET", false).unwrap();
        }
        let span = store.claim_span_micros().unwrap();

        let stamps: Vec<u64> = (0..8)
            .filter_map(|i| store.timestamp_us(RowId::new(i)))
            .collect();
        let expected = stamps.iter().max().unwrap() - stamps.iter().min().unwrap();
        assert_eq!(span, expected);
    }

    #[test]
    fn test_claim_span_none_when_unstamped_zero_when_single() {
        let store = open(StoreConfig::new(1, 2).with_timestamps(false));
        assert_eq!(store.claim_span_micros(), None);

        store.write(0, 0, "x", "INFO", "NET", false).unwrap();
        assert_eq!(store.claim_span_micros(), None);

        // One stamped row is a zero-width span, not an empty one.
        store.write(0, 1, "x", "INFO", "NET", true).unwrap();
        assert_eq!(store.claim_span_micros(), Some(0));
    }

    #[test]
    fn test_ids_sorted_by_thread_and_value() {
        let store = open(StoreConfig::new(3, 1));
        store.write(2, 0, "c", "INFO", "NET", false).unwrap(); // id 0
        store.write(0, 0, "a", "INFO", "NET", false).unwrap(); // id 1
        store.write(1, 0, "b", "INFO", "NET", false).unwrap(); // id 2

        let by_thread: Vec<u64> = store
            .ids_sorted(SortKey::Thread)
            .iter()
            .map(|id| id.as_u64())
            .collect();
        assert_eq!(by_thread, vec![1, 2, 0]);

        let by_value: Vec<u64> = store
            .ids_sorted(SortKey::Value)
            .iter()
            .map(|id| id.as_u64())
            .collect();
        assert_eq!(by_value, vec![1, 2, 0]);

        let by_id: Vec<u64> = store
            .ids_sorted(SortKey::Id)
            .iter()
            .map(|id| id.as_u64())
            .collect();
        assert_eq!(by_id, vec![0, 1, 2]);
    }

    #[test]
    fn test_refused_shape_allocates_nothing() {
        let config = StoreConfig::new(250, 4000).with_value_len(100);
        let tiny_host = FixedMemoryProbe(128 << 20);

        let err = EventStore::open_with(config, &tiny_host, Arc::new(EpochClock::new()))
            .unwrap_err();
        assert!(matches!(err, StoreError::InsufficientMemory { .. }));
    }

    #[test]
    fn test_invalid_shape_fails_before_admission() {
        let err = EventStore::open_with(
            StoreConfig::new(0, 8),
            &ROOMY,
            Arc::new(EpochClock::new()),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfiguration(_)));
    }
}
