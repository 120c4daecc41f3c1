//! Trove Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout the trove event store:
//! - Identifiers (RowId)
//! - Row records and read-only views
//! - Store configuration with enforced floors
//! - Bounded text normalization
//! - Benchmark payload catalog and severity ladder
//! - Error types

pub mod ids;
pub mod bounded;
pub mod config;
pub mod row;
pub mod catalog;
pub mod error;

pub use ids::*;
pub use bounded::*;
pub use config::*;
pub use row::*;
pub use catalog::*;
pub use error::*;
