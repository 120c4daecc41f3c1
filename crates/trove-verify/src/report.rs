//! Verification reports

use thiserror::Error;

use trove_core::RowId;

/// One structural defect found in a store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralFailure {
    /// Published count differs from the planned capacity.
    #[error("count mismatch: expected {expected} rows, found {actual}")]
    CountMismatch { expected: u64, actual: u64 },

    /// The allocator's next id differs from the planned capacity: ids
    /// were skipped, burned past capacity, or never issued.
    #[error("allocator skew: next id should be {expected}, is {actual}")]
    AllocatorSkew { expected: u64, actual: u64 },

    /// A row's thread id is outside `0..max_threads`.
    #[error("row {id}: thread_id {thread_id} out of range (max allowed {})", .max_threads - 1)]
    ThreadOutOfRange {
        id: RowId,
        thread_id: u32,
        max_threads: u32,
    },

    /// A row's event id is outside `0..events_per_thread`.
    #[error("row {id}: event_id {event_id} out of range (max allowed {})", .events_per_thread - 1)]
    EventOutOfRange {
        id: RowId,
        event_id: u32,
        events_per_thread: u32,
    },

    /// Two rows claim the same `(thread, event)` coordinate.
    #[error("pair ({thread_id}, {event_id}) claimed twice: rows {first} and {second}")]
    DuplicatePair {
        thread_id: u32,
        event_id: u32,
        first: RowId,
        second: RowId,
    },

    /// An id was listed as valid but its row could not be fetched.
    #[error("row {id}: listed as valid but not readable")]
    MissingRow { id: RowId },
}

/// Result of the structural pass.
#[derive(Clone, Debug, Default)]
pub struct StructuralReport {
    failures: Vec<StructuralFailure>,
}

impl StructuralReport {
    pub(crate) fn push(&mut self, failure: StructuralFailure) {
        self.failures.push(failure);
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[StructuralFailure] {
        &self.failures
    }
}

/// One payload that differs from its canonical expectation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {id}: actual '{actual}' expected '{expected}'")]
pub struct ContentMismatch {
    pub id: RowId,
    pub actual: String,
    pub expected: String,
}

/// Result of the content pass.
#[derive(Clone, Debug, Default)]
pub struct ContentReport {
    mismatches: Vec<ContentMismatch>,
    /// More mismatches existed than the report bound allowed.
    truncated: bool,
}

impl ContentReport {
    pub(crate) fn push(&mut self, mismatch: ContentMismatch) {
        self.mismatches.push(mismatch);
    }

    pub(crate) fn mark_truncated(&mut self) {
        self.truncated = true;
    }

    pub(crate) fn sort(&mut self) {
        self.mismatches.sort_by_key(|m| m.id);
    }

    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn mismatches(&self) -> &[ContentMismatch] {
        &self.mismatches
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}
