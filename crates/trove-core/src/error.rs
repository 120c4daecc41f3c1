//! Error types for the trove event store

use thiserror::Error;

/// Store errors.
///
/// Missing rows are not errors: `read` returns `Option`. Oversized text is
/// not an error either - the write path truncates with a fallback so the
/// hot path cannot fail on payload length.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Construction-time rejection of an unusable shape.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Array-backed write beyond the planned capacity. The id was issued
    /// but has no backing slot; nothing was written.
    #[error("capacity exceeded: id {id} has no slot (capacity {capacity})")]
    CapacityExceeded { id: u64, capacity: u64 },

    /// Array-backed write to a slot another publish already claimed. The
    /// store never issues an id twice between resets, so this marks direct
    /// misuse of the backing; the first write stands untouched.
    #[error("slot for id {id} already claimed")]
    SlotAlreadyClaimed { id: u64 },

    /// Admission guard verdict: the requested shape would not fit in
    /// available memory. Returned before any row storage is allocated.
    #[error("insufficient memory: required {required_bytes} B, available {available_bytes} B")]
    InsufficientMemory {
        required_bytes: u64,
        available_bytes: u64,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
