//! Trove Verify - Integrity verification for completed runs
//!
//! Two independent passes over a quiescent store:
//! - Structural: counts, allocator state, thread/event bounds and
//!   `(thread, event)` pair uniqueness checked against a presence matrix.
//! - Content: every payload compared against the canonical catalog text
//!   for its event id.
//!
//! Both passes report the offending row ids with actual and expected
//! values; a bare boolean is never the whole answer.

pub mod report;
pub mod structural;
pub mod content;

pub use report::*;
pub use structural::*;
pub use content::*;
