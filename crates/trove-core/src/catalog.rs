//! Canonical benchmark payload catalog
//!
//! Benchmark and test drivers write payloads drawn from a small fixed
//! catalog keyed by event id, so the content verification pass can compute
//! the exact expected text for every row after the fact. The catalog is
//! severity-themed: event id `e` maps to severity `e % 8` and to the
//! message for that severity.

use crate::bounded::{BoundedText, FALLBACK_PAYLOAD};

/// Severity ladder carried by catalog payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    NotSet = 0,
    Trace = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Critical = 6,
    Fatal = 7,
}

impl Severity {
    pub const COUNT: usize = 8;

    /// Severity for a producer-local event id.
    #[inline]
    pub fn from_event(event_id: u32) -> Self {
        match event_id % 8 {
            1 => Severity::Trace,
            2 => Severity::Debug,
            3 => Severity::Info,
            4 => Severity::Warn,
            5 => Severity::Error,
            6 => Severity::Critical,
            7 => Severity::Fatal,
            _ => Severity::NotSet,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::NotSet => "NOTSET",
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Fatal => "FATAL",
        }
    }
}

/// Category labels cycled over thread ids.
pub const CATEGORIES: [&str; 5] = ["NET", "DB", "UI", "SYS", "GFX"];

/// One canonical message per severity, indexed by `event_id % 8`.
pub const MESSAGES: [&str; Severity::COUNT] = [
    "Not Set, default payload 😎",
    "Trace processing request 😎",
    "Debug processing request 😎",
    "Info processing request 😊",
    "Warning in processing notification 😕",
    "Error in processing notification 😣",
    "Critical processing request 😣",
    "Fatal error in processing notification 💀",
];

/// Canonical raw message for an event id.
#[inline]
pub fn message_for(event_id: u32) -> &'static str {
    MESSAGES[(event_id % 8) as usize]
}

/// Category for a thread id.
#[inline]
pub fn category_for(thread_id: u32) -> &'static str {
    CATEGORIES[(thread_id % 5) as usize]
}

/// The exact value the content pass expects for `event_id` in a store with
/// the given payload cap: the canonical message, passed through the same
/// normalization the write path applies.
pub fn expected_value(event_id: u32, max_value_len: usize) -> BoundedText {
    BoundedText::normalize(message_for(event_id), max_value_len, FALLBACK_PAYLOAD)
}
