//! Row records
//!
//! A row is the store's atomic unit of write. Ids are allocator-issued and
//! immutable; `(thread_id, event_id)` locate the row in the capacity grid.
//! Text fields are already normalized when a row is built - a `Row` never
//! holds oversized or empty text.

use crate::bounded::BoundedText;
use crate::ids::RowId;

/// One stored event record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    /// Dense, allocator-issued id.
    pub id: RowId,
    /// Producing thread, `0..max_threads`.
    pub thread_id: u32,
    /// Producer-local sequence number, `0..events_per_thread`.
    pub event_id: u32,
    /// Row was written on a debug path.
    pub is_debug: bool,
    /// Event kind label.
    pub kind: BoundedText,
    /// Event category label.
    pub category: BoundedText,
    /// Event payload.
    pub value: BoundedText,
    /// Microseconds since the store's epoch baseline, if stamping was on.
    pub timestamp_us: Option<u64>,
}

/// Read-only snapshot of a row, detached from the store's backing.
///
/// Views are owned copies so readers never hold a lock or a slot reference
/// while inspecting fields.
#[derive(Clone, Debug, PartialEq)]
pub struct RowView {
    pub id: RowId,
    pub thread_id: u32,
    pub event_id: u32,
    pub is_debug: bool,
    pub kind: String,
    pub category: String,
    pub value: String,
    pub timestamp_us: Option<u64>,
}

impl From<Row> for RowView {
    fn from(row: Row) -> Self {
        RowView {
            id: row.id,
            thread_id: row.thread_id,
            event_id: row.event_id,
            is_debug: row.is_debug,
            kind: row.kind.as_str().to_owned(),
            category: row.category.as_str().to_owned(),
            value: row.value.as_str().to_owned(),
            timestamp_us: row.timestamp_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounded::{FALLBACK_LABEL, FALLBACK_PAYLOAD};

    #[test]
    fn test_view_carries_all_fields() {
        let row = Row {
            id: RowId::new(42),
            thread_id: 3,
            event_id: 5,
            is_debug: true,
            kind: BoundedText::normalize("INFO", 16, FALLBACK_LABEL),
            category: BoundedText::normalize("NET", 32, FALLBACK_LABEL),
            value: BoundedText::normalize("payload-3-5", 80, FALLBACK_PAYLOAD),
            timestamp_us: Some(1234),
        };

        let view = RowView::from(row);
        assert_eq!(view.id, RowId::new(42));
        assert_eq!(view.thread_id, 3);
        assert_eq!(view.event_id, 5);
        assert!(view.is_debug);
        assert_eq!(view.kind, "INFO");
        assert_eq!(view.category, "NET");
        assert_eq!(view.value, "payload-3-5");
        assert_eq!(view.timestamp_us, Some(1234));
    }
}
