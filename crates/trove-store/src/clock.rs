//! Epoch clock - one-shot baseline for a store's timestamps
//!
//! The first timestamped write establishes the baseline; every later stamp
//! is `now - baseline` in microseconds. The clock is owned by its store
//! and injected at construction, so independent stores carry independent
//! epochs and tests can share one clock across stores when they want
//! comparable offsets.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Sentinel for "baseline not yet established".
const UNSET: u64 = u64::MAX;

/// Monotonic clock with a one-shot, race-agreed baseline.
///
/// INVARIANT: the baseline is written exactly once; every thread observes
/// the same value regardless of who wins the establishing race.
#[derive(Debug)]
pub struct EpochClock {
    /// Construction instant; all internal readings are offsets from here.
    origin: Instant,
    /// Baseline in microseconds past `origin`, or `UNSET`.
    baseline_us: AtomicU64,
}

impl EpochClock {
    pub fn new() -> Self {
        EpochClock {
            origin: Instant::now(),
            baseline_us: AtomicU64::new(UNSET),
        }
    }

    /// Microseconds since the epoch baseline, establishing the baseline on
    /// first use. Never fails; a thread that loses the establishing race
    /// discards its speculative reading and adopts the winner's baseline,
    /// saturating at zero if its own capture came earlier.
    pub fn stamp(&self) -> u64 {
        let now = self.origin.elapsed().as_micros() as u64;

        let mut base = self.baseline_us.load(Ordering::Acquire);
        if base == UNSET {
            base = match self.baseline_us.compare_exchange(
                UNSET,
                now,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => now,
                Err(winner) => winner,
            };
        }

        now.saturating_sub(base)
    }

    /// The established baseline in microseconds past clock construction,
    /// or `None` before the first stamp.
    pub fn baseline_micros(&self) -> Option<u64> {
        let base = self.baseline_us.load(Ordering::Acquire);
        (base != UNSET).then_some(base)
    }
}

impl Default for EpochClock {
    fn default() -> Self {
        Self::new()
    }
}
