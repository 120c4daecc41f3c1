//! Trove Store - The concurrent row store
//!
//! This crate implements the write/read core:
//! - Epoch clock (one-shot baseline, microsecond offsets)
//! - Identity allocator (atomic, dense ids)
//! - Admission guard (memory footprint vs. OS-available memory)
//! - Two row backings behind one interface (dense array, locked map)
//! - The `EventStore` write/read path

pub mod clock;
pub mod alloc;
pub mod admission;
pub mod slots;
pub mod dense;
pub mod mapped;
pub mod store;

pub use clock::*;
pub use alloc::*;
pub use admission::*;
pub use slots::*;
pub use store::*;
