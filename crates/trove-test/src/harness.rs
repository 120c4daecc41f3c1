//! Concurrent write workloads
//!
//! A workload spawns one OS thread per configured producer; each thread
//! claims its `events_per_thread` catalog payloads as fast as it can.
//! After the join barrier both verification passes run and the report
//! carries pass/fail plus write-phase throughput.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rand::Rng;
use tracing::info;

use trove_core::{catalog, BackingMode, Severity, StoreConfig, StoreResult};
use trove_store::{EventStore, MemoryProbe, SystemMemoryProbe};
use trove_verify::{verify_content, verify_structure, ContentReport, StructuralReport};

/// Shape and behavior of one write workload.
#[derive(Clone, Debug)]
pub struct WorkloadSpec {
    pub threads: u32,
    pub events_per_thread: u32,
    pub backing: BackingMode,
    pub use_timestamps: bool,
    /// Probability that a write goes through the debug path. Always in
    /// `0.0..=1.0`; the builder clamps out-of-range values.
    pub debug_sample_rate: f64,
}

impl WorkloadSpec {
    pub fn new(threads: u32, events_per_thread: u32) -> Self {
        WorkloadSpec {
            threads,
            events_per_thread,
            backing: BackingMode::Dense,
            use_timestamps: true,
            debug_sample_rate: 0.0,
        }
    }

    pub fn with_backing(mut self, backing: BackingMode) -> Self {
        self.backing = backing;
        self
    }

    pub fn with_timestamps(mut self, use_timestamps: bool) -> Self {
        self.use_timestamps = use_timestamps;
        self
    }

    pub fn with_debug_sample_rate(mut self, rate: f64) -> Self {
        // gen_bool requires a probability in [0, 1].
        self.debug_sample_rate = if rate.is_nan() {
            0.0
        } else {
            rate.clamp(0.0, 1.0)
        };
        self
    }

    pub fn config(&self) -> StoreConfig {
        StoreConfig::new(self.threads, self.events_per_thread)
            .with_backing(self.backing)
            .with_timestamps(self.use_timestamps)
    }
}

/// Outcome of one workload run.
#[derive(Debug)]
pub struct RunReport {
    pub rows_written: u64,
    pub failed_writes: u64,
    pub write_micros: u64,
    pub ops_per_sec: f64,
    pub structural: StructuralReport,
    pub content: ContentReport,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.failed_writes == 0 && self.structural.is_ok() && self.content.is_ok()
    }
}

/// Open a store for the workload and run it once.
pub fn run_workload(spec: &WorkloadSpec) -> StoreResult<RunReport> {
    run_workload_with(spec, &SystemMemoryProbe)
}

/// Like [`run_workload`] with an injected memory probe.
pub fn run_workload_with(
    spec: &WorkloadSpec,
    probe: &dyn MemoryProbe,
) -> StoreResult<RunReport> {
    let mut store = EventStore::open_with(
        spec.config(),
        probe,
        std::sync::Arc::new(trove_store::EpochClock::new()),
    )?;
    Ok(run_once(&mut store, spec))
}

/// Run one write/verify cycle against an existing store. The store is
/// cleared first, so repeated calls model the zero-allocation reuse path.
pub fn run_once(store: &mut EventStore, spec: &WorkloadSpec) -> RunReport {
    store.clear();

    let failed_writes = AtomicU64::new(0);
    let start = Instant::now();

    {
        let store = &*store;
        let failed = &failed_writes;
        std::thread::scope(|scope| {
            for t in 0..spec.threads {
                let rate = spec.debug_sample_rate;
                scope.spawn(move || {
                    let mut rng = rand::thread_rng();
                    for e in 0..spec.events_per_thread {
                        let debug = rate > 0.0 && rng.gen_bool(rate);
                        let outcome = store.write(
                            t,
                            e,
                            catalog::message_for(e),
                            Severity::from_event(e).label(),
                            catalog::category_for(t),
                            debug,
                        );
                        if outcome.is_err() {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });
    }

    let write_micros = start.elapsed().as_micros() as u64;
    let rows_written = store.size() as u64;
    let ops_per_sec = if write_micros > 0 {
        rows_written as f64 * 1_000_000.0 / write_micros as f64
    } else {
        f64::INFINITY
    };

    let structural = verify_structure(store);
    let content = verify_content(store, trove_verify::DEFAULT_MAX_REPORT);

    info!(
        rows_written,
        write_micros,
        ops_per_sec = ops_per_sec as u64,
        structural_ok = structural.is_ok(),
        content_ok = content.is_ok(),
        "workload run complete"
    );

    RunReport {
        rows_written,
        failed_writes: failed_writes.load(Ordering::Relaxed),
        write_micros,
        ops_per_sec,
        structural,
        content,
    }
}
