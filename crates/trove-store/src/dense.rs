//! Dense array backing - one pre-allocated slot per id
//!
//! Writers for distinct ids touch disjoint slots and never contend. Each
//! slot carries a three-state flag: a writer must win the empty->writing
//! claim before touching the row, stores ready with release ordering after
//! filling it, and readers load the flag with acquire ordering before
//! touching any field. A reader that observes an id between allocation and
//! publication simply gets `None`; a second publish of the same id loses
//! the claim and is rejected instead of racing the first.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use trove_core::{Row, RowId, StoreError, StoreResult};

use crate::slots::RowSlots;

const EMPTY: u8 = 0;
const WRITING: u8 = 1;
const READY: u8 = 2;

#[derive(Default)]
struct Slot {
    state: AtomicU8,
    row: UnsafeCell<Row>,
}

// SAFETY: slot content is only written by the single thread that won the
// EMPTY->WRITING claim, and only read after an acquire load observes the
// writer's READY release store. Rewrites happen only via `reset`, which
// requires exclusive access.
unsafe impl Sync for Slot {}

/// Fixed-capacity slot array.
pub struct DenseSlots {
    slots: Box<[Slot]>,
    published: AtomicUsize,
}

impl DenseSlots {
    /// Pre-allocate every slot. Default-valued placeholder rows exist from
    /// here on; they become visible only once claimed and published.
    pub fn with_capacity(capacity: usize) -> Self {
        let slots: Box<[Slot]> = (0..capacity).map(|_| Slot::default()).collect();
        DenseSlots {
            slots,
            published: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl RowSlots for DenseSlots {
    fn publish(&self, row: Row) -> StoreResult<()> {
        let id = row.id;
        let Some(slot) = self.slots.get(id.as_index()) else {
            // The allocator issued an id past the planned capacity. Reject
            // instead of writing out of bounds; the id stays burned and
            // the structural pass will report the overrun.
            return Err(StoreError::CapacityExceeded {
                id: id.as_u64(),
                capacity: self.slots.len() as u64,
            });
        };

        if slot
            .state
            .compare_exchange(EMPTY, WRITING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // Losing the claim means another publish already holds or
            // published this slot. The first write stands.
            return Err(StoreError::SlotAlreadyClaimed { id: id.as_u64() });
        }

        // SAFETY: winning the claim above made this thread the slot's only
        // writer, and no reader dereferences the row until the release
        // store below.
        unsafe {
            *slot.row.get() = row;
        }
        slot.state.store(READY, Ordering::Release);
        self.published.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn fetch(&self, id: RowId) -> Option<Row> {
        let slot = self.slots.get(id.as_index())?;
        if slot.state.load(Ordering::Acquire) != READY {
            return None;
        }
        // SAFETY: the acquire load above synchronizes with the writer's
        // release store, so the row is fully written; the single-shot
        // claim means a ready slot is never rewritten until `reset`,
        // which needs `&mut self`.
        Some(unsafe { (*slot.row.get()).clone() })
    }

    fn published(&self) -> usize {
        self.published.load(Ordering::Relaxed)
    }

    fn ids(&self) -> Vec<RowId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.state.load(Ordering::Acquire) == READY)
            .map(|(i, _)| RowId::new(i as u64))
            .collect()
    }

    fn reset(&mut self) {
        // `&mut self` guarantees quiescence; the flags drop back to empty
        // while the row allocations stay in place for reuse.
        for slot in self.slots.iter_mut() {
            *slot.state.get_mut() = EMPTY;
        }
        *self.published.get_mut() = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_core::{BoundedText, FALLBACK_LABEL, FALLBACK_PAYLOAD};

    fn row(id: u64, thread_id: u32, event_id: u32) -> Row {
        Row {
            id: RowId::new(id),
            thread_id,
            event_id,
            is_debug: false,
            kind: BoundedText::normalize("INFO", 16, FALLBACK_LABEL),
            category: BoundedText::normalize("NET", 32, FALLBACK_LABEL),
            value: BoundedText::normalize(&format!("payload-{thread_id}-{event_id}"), 80, FALLBACK_PAYLOAD),
            timestamp_us: None,
        }
    }

    #[test]
    fn test_unpublished_slot_reads_none() {
        let slots = DenseSlots::with_capacity(4);
        assert_eq!(slots.fetch(RowId::new(0)), None);
        assert_eq!(slots.published(), 0);
        assert!(slots.ids().is_empty());
    }

    #[test]
    fn test_publish_then_fetch_roundtrips() {
        let slots = DenseSlots::with_capacity(4);
        slots.publish(row(2, 1, 0)).unwrap();

        let fetched = slots.fetch(RowId::new(2)).unwrap();
        assert_eq!(fetched.thread_id, 1);
        assert_eq!(fetched.value, "payload-1-0");
        assert_eq!(slots.published(), 1);
        assert_eq!(slots.ids(), vec![RowId::new(2)]);
    }

    #[test]
    fn test_publish_past_capacity_rejected() {
        let slots = DenseSlots::with_capacity(2);
        let err = slots.publish(row(2, 0, 2)).unwrap_err();
        assert_eq!(
            err,
            StoreError::CapacityExceeded {
                id: 2,
                capacity: 2
            }
        );
        assert_eq!(slots.published(), 0);
    }

    #[test]
    fn test_second_publish_to_same_id_rejected() {
        let slots = DenseSlots::with_capacity(4);
        slots.publish(row(1, 0, 1)).unwrap();

        let err = slots.publish(row(1, 0, 9)).unwrap_err();
        assert_eq!(err, StoreError::SlotAlreadyClaimed { id: 1 });
        // The first write stands; the rejected one never touched the slot.
        assert_eq!(slots.fetch(RowId::new(1)).unwrap().event_id, 1);
        assert_eq!(slots.published(), 1);
    }

    #[test]
    fn test_slot_reclaimable_after_reset() {
        let mut slots = DenseSlots::with_capacity(2);
        slots.publish(row(0, 0, 0)).unwrap();
        slots.reset();

        slots.publish(row(0, 0, 7)).unwrap();
        assert_eq!(slots.fetch(RowId::new(0)).unwrap().event_id, 7);
    }

    #[test]
    fn test_reset_keeps_capacity_and_empties() {
        let mut slots = DenseSlots::with_capacity(4);
        slots.publish(row(0, 0, 0)).unwrap();
        slots.publish(row(1, 0, 1)).unwrap();

        slots.reset();
        assert_eq!(slots.capacity(), 4);
        assert_eq!(slots.published(), 0);
        assert_eq!(slots.fetch(RowId::new(0)), None);
    }

    #[test]
    fn test_concurrent_disjoint_publishes_all_visible() {
        let slots = std::sync::Arc::new(DenseSlots::with_capacity(8 * 64));

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let slots = std::sync::Arc::clone(&slots);
                std::thread::spawn(move || {
                    for e in 0..64u32 {
                        let id = (t * 64 + e) as u64;
                        slots.publish(row(id, t, e)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(slots.published(), 8 * 64);
        for id in 0..(8 * 64) as u64 {
            assert!(slots.fetch(RowId::new(id)).is_some(), "row {id} missing");
        }
    }

    #[test]
    fn test_reader_overlapping_writers_sees_none_or_whole_rows() {
        // A reader polls while the writers are still in flight: every
        // fetch must be either None or a row whose fields all belong to
        // the same publish.
        const THREADS: u32 = 4;
        const EVENTS: u32 = 256;
        let slots = DenseSlots::with_capacity((THREADS * EVENTS) as usize);

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let slots = &slots;
                scope.spawn(move || {
                    for e in 0..EVENTS {
                        let id = (t * EVENTS + e) as u64;
                        slots.publish(row(id, t, e)).unwrap();
                    }
                });
            }

            let slots = &slots;
            scope.spawn(move || {
                let total = (THREADS * EVENTS) as usize;
                while slots.published() < total {
                    for id in 0..total as u64 {
                        let Some(fetched) = slots.fetch(RowId::new(id)) else {
                            continue;
                        };
                        let t = (id / EVENTS as u64) as u32;
                        let e = (id % EVENTS as u64) as u32;
                        assert_eq!(fetched.id, RowId::new(id));
                        assert_eq!(fetched.thread_id, t);
                        assert_eq!(fetched.event_id, e);
                        assert_eq!(fetched.value, format!("payload-{t}-{e}").as_str());
                    }
                }
            });
        });
    }

    #[test]
    fn test_racing_publishes_to_one_id_exactly_one_wins() {
        let slots = std::sync::Arc::new(DenseSlots::with_capacity(1));

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let slots = std::sync::Arc::clone(&slots);
                std::thread::spawn(move || slots.publish(row(0, t, t)).is_ok())
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();

        assert_eq!(wins, 1);
        assert_eq!(slots.published(), 1);
        assert!(slots.fetch(RowId::new(0)).is_some());
    }
}
