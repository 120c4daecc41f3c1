//! Structural pass - id space, coverage and allocator consistency
//!
//! Runs only after all writers have joined. Proves that the id space is
//! dense and fully published, that every row sits inside the capacity
//! grid, and that no `(thread, event)` coordinate was claimed twice. Pair
//! coverage is checked with a `max_threads × events_per_thread` presence
//! matrix recording the first row id seen at each coordinate.

use tracing::{info, warn};

use trove_core::RowId;
use trove_store::EventStore;

use crate::report::{StructuralFailure, StructuralReport};

/// Run the structural pass over a quiescent store.
pub fn verify_structure(store: &EventStore) -> StructuralReport {
    let mut report = StructuralReport::default();
    let config = store.config();
    let expected = config.expected_size();

    let actual = store.size() as u64;
    if actual != expected {
        report.push(StructuralFailure::CountMismatch { expected, actual });
        warn!(expected, actual, "structural pass: store not fully written");
        // An incomplete store fails every downstream check trivially;
        // stop at the headline number.
        return report;
    }

    let next = store.next_unissued();
    if next != expected {
        report.push(StructuralFailure::AllocatorSkew {
            expected,
            actual: next,
        });
    }

    // First-seen row id per (thread, event) coordinate.
    let mut matrix: Vec<Option<RowId>> = vec![None; expected as usize];

    for id in store.all_ids() {
        let Some(row) = store.read(id) else {
            report.push(StructuralFailure::MissingRow { id });
            continue;
        };

        let mut in_range = true;
        if row.thread_id >= config.max_threads {
            report.push(StructuralFailure::ThreadOutOfRange {
                id,
                thread_id: row.thread_id,
                max_threads: config.max_threads,
            });
            in_range = false;
        }
        if row.event_id >= config.events_per_thread {
            report.push(StructuralFailure::EventOutOfRange {
                id,
                event_id: row.event_id,
                events_per_thread: config.events_per_thread,
            });
            in_range = false;
        }
        if !in_range {
            continue;
        }

        let cell = (row.thread_id as u64 * config.events_per_thread as u64
            + row.event_id as u64) as usize;
        match matrix[cell] {
            None => matrix[cell] = Some(id),
            Some(first) => report.push(StructuralFailure::DuplicatePair {
                thread_id: row.thread_id,
                event_id: row.event_id,
                first,
                second: id,
            }),
        }
    }

    if report.is_ok() {
        info!(rows = expected, "structural pass: all entries consistent");
    } else {
        for failure in report.failures() {
            warn!(%failure, "structural pass failure");
        }
    }

    report
}
