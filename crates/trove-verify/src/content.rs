//! Content pass - payloads against the canonical catalog
//!
//! Benchmark and test drivers write catalog payloads, so after a run
//! every row's value must equal the canonical text for its event id,
//! normalized exactly the way the write path normalizes. Mismatches are
//! collected up to a bound, sorted by id, and carry actual and expected
//! side by side.

use tracing::{info, warn};

use trove_core::catalog;
use trove_store::EventStore;

use crate::report::{ContentMismatch, ContentReport};

/// Default mismatch report bound.
pub const DEFAULT_MAX_REPORT: usize = 64;

/// Run the content pass over a quiescent store, collecting at most
/// `max_report` mismatches.
pub fn verify_content(store: &EventStore, max_report: usize) -> ContentReport {
    let mut report = ContentReport::default();
    let max_value_len = store.config().max_value_len;

    for id in store.all_ids() {
        let Some(row) = store.read(id) else {
            continue; // structural pass owns missing-row reporting
        };

        let expected = catalog::expected_value(row.event_id, max_value_len);
        if row.value != expected.as_str() {
            if report.mismatches().len() == max_report {
                report.mark_truncated();
                break;
            }
            report.push(ContentMismatch {
                id,
                actual: row.value,
                expected: expected.as_str().to_owned(),
            });
        }
    }

    report.sort();

    if report.is_ok() {
        info!(rows = store.size(), "content pass: all payloads canonical");
    } else {
        for mismatch in report.mismatches() {
            warn!(%mismatch, "content pass failure");
        }
        if report.is_truncated() {
            warn!(bound = max_report, "content pass report truncated");
        }
    }

    report
}
