//! Trove Test - Workload harness for store validation
//!
//! This crate provides:
//! - Multi-threaded write workloads with catalog payloads
//! - Post-run structural and content verification
//! - Throughput reporting
//! - Criterion benchmarks (see `benches/`)

pub mod harness;

pub use harness::*;
