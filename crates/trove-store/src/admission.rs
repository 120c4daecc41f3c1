//! Admission guard - memory footprint check before construction
//!
//! Estimates the worst-case footprint of a store shape and compares it
//! against OS-reported available memory. A shape that would consume more
//! than 92% of what the OS reports is refused before any row storage is
//! allocated, which is strictly better than letting the OOM killer end the
//! run halfway through. The guard is advisory: it reserves nothing, and it
//! runs once per distinct shape per process.

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::Mutex;
use sysinfo::System;
use tracing::{error, info};

use trove_core::{StoreConfig, StoreError, StoreResult};

/// Fixed per-entry bookkeeping overhead (map metadata, slot headers).
const ENTRY_OVERHEAD_BYTES: u64 = 40;
/// Flat safety margin: stacks, logging, fragmentation.
const SAFETY_MARGIN_BYTES: u64 = 150 << 20;
/// Conservative assumption when the OS reports nothing.
const FALLBACK_AVAILABLE_BYTES: u64 = 8 << 30;
/// Refuse shapes above this share of available memory.
const CEILING_PERCENT: u64 = 92;

/// Source of OS-reported available memory (free + buffers + cache).
///
/// Injectable so tests can model hosts of any size; the guard falls back
/// to a fixed conservative figure when the probe reports nothing.
pub trait MemoryProbe: Send + Sync {
    fn available_bytes(&self) -> Option<u64>;
}

/// Probe backed by the running system.
#[derive(Debug, Default)]
pub struct SystemMemoryProbe;

impl MemoryProbe for SystemMemoryProbe {
    fn available_bytes(&self) -> Option<u64> {
        let mut sys = System::new();
        sys.refresh_memory();
        let available = sys.available_memory();
        (available > 0).then_some(available)
    }
}

/// Probe reporting a fixed figure; for tests and capacity planning.
#[derive(Debug, Clone, Copy)]
pub struct FixedMemoryProbe(pub u64);

impl MemoryProbe for FixedMemoryProbe {
    fn available_bytes(&self) -> Option<u64> {
        Some(self.0)
    }
}

/// Outcome of a passed admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionReport {
    pub required_bytes: u64,
    pub available_bytes: u64,
}

/// Footprint inputs that identify a store shape.
type ShapeKey = (u32, u32, usize, usize, usize, bool);

fn shape_key(config: &StoreConfig) -> ShapeKey {
    (
        config.max_threads,
        config.events_per_thread,
        config.max_value_len,
        config.max_kind_len,
        config.max_category_len,
        config.use_timestamps,
    )
}

fn admitted_shapes() -> &'static Mutex<HashMap<ShapeKey, AdmissionReport>> {
    static ADMITTED: OnceLock<Mutex<HashMap<ShapeKey, AdmissionReport>>> = OnceLock::new();
    ADMITTED.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Worst-case footprint for a shape: per-row bytes plus fixed per-entry
/// overhead, growth headroom for large stores, and the flat margin.
///
/// Saturating arithmetic throughout: a shape extreme enough to overflow
/// `u64` must read as "everything", never wrap around and slip past the
/// ceiling check.
pub fn footprint_bytes(config: &StoreConfig) -> u64 {
    let n = config.expected_size();

    // Fixed row header: thread_id + event_id + debug flag, 8-byte aligned.
    let row_bytes = 8u64
        .saturating_add(config.max_kind_len as u64)
        .saturating_add(config.max_category_len as u64)
        .saturating_add(config.max_value_len as u64)
        .saturating_add(if config.use_timestamps { 8 } else { 0 });

    let growth_headroom = if n > 1000 {
        n.saturating_add(1000).saturating_mul(8)
    } else {
        0
    };

    n.saturating_mul(row_bytes.saturating_add(ENTRY_OVERHEAD_BYTES))
        .saturating_add(growth_headroom)
        .saturating_add(SAFETY_MARGIN_BYTES)
}

/// Check a shape against available memory.
///
/// Returns the passing report, or `InsufficientMemory` carrying both
/// figures. Passing shapes are memoized per process; failures are not, so
/// a retry after memory frees up gets a fresh reading.
pub fn check(config: &StoreConfig, probe: &dyn MemoryProbe) -> StoreResult<AdmissionReport> {
    let key = shape_key(config);
    if let Some(report) = admitted_shapes().lock().get(&key) {
        return Ok(*report);
    }

    let required_bytes = footprint_bytes(config);
    let available_bytes = probe
        .available_bytes()
        .unwrap_or(FALLBACK_AVAILABLE_BYTES);

    info!(
        threads = config.max_threads,
        events_per_thread = config.events_per_thread,
        required_mib = required_bytes >> 20,
        available_mib = available_bytes >> 20,
        "memory guard check"
    );

    if required_bytes > available_bytes / 100 * CEILING_PERCENT {
        error!(
            required_mib = required_bytes >> 20,
            available_mib = available_bytes >> 20,
            "memory guard refused store shape"
        );
        return Err(StoreError::InsufficientMemory {
            required_bytes,
            available_bytes,
        });
    }

    let report = AdmissionReport {
        required_bytes,
        available_bytes,
    };
    admitted_shapes().lock().insert(key, report);
    Ok(report)
}
