//! Store configuration
//!
//! A store's shape is fixed at construction: `max_threads ×
//! events_per_thread` rows, each with bounded text fields. The field caps
//! carry enforced floors so fallback text and catalog payloads always fit
//! something meaningful.

use crate::error::{StoreError, StoreResult};

/// Minimum payload cap in bytes.
pub const MIN_VALUE_LEN: usize = 16;
/// Minimum kind cap in bytes.
pub const MIN_KIND_LEN: usize = 5;
/// Minimum category cap in bytes.
pub const MIN_CATEGORY_LEN: usize = 8;

/// Backing strategy for row storage.
///
/// `Dense` pre-allocates one slot per id and never blocks on a lock;
/// writes beyond capacity are rejected. `Mapped` grows on demand behind a
/// single reader/writer lock and tolerates capacities that turn out to be
/// estimates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BackingMode {
    #[default]
    Dense,
    Mapped,
}

/// Construction parameters for an event store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreConfig {
    /// Writer threads the store is sized for.
    pub max_threads: u32,
    /// Events each writer thread will produce.
    pub events_per_thread: u32,
    /// Payload cap in bytes.
    pub max_value_len: usize,
    /// Kind cap in bytes.
    pub max_kind_len: usize,
    /// Category cap in bytes.
    pub max_category_len: usize,
    /// Stamp rows with microseconds since the epoch baseline.
    pub use_timestamps: bool,
    /// Row storage strategy.
    pub backing: BackingMode,
}

impl StoreConfig {
    /// Config with the default field caps (80-byte payload, 16-byte kind,
    /// 32-byte category), timestamps on, dense backing.
    pub fn new(max_threads: u32, events_per_thread: u32) -> Self {
        StoreConfig {
            max_threads,
            events_per_thread,
            max_value_len: 80,
            max_kind_len: 16,
            max_category_len: 32,
            use_timestamps: true,
            backing: BackingMode::Dense,
        }
    }

    pub fn with_value_len(mut self, max_value_len: usize) -> Self {
        self.max_value_len = max_value_len;
        self
    }

    pub fn with_kind_len(mut self, max_kind_len: usize) -> Self {
        self.max_kind_len = max_kind_len;
        self
    }

    pub fn with_category_len(mut self, max_category_len: usize) -> Self {
        self.max_category_len = max_category_len;
        self
    }

    pub fn with_timestamps(mut self, use_timestamps: bool) -> Self {
        self.use_timestamps = use_timestamps;
        self
    }

    pub fn with_backing(mut self, backing: BackingMode) -> Self {
        self.backing = backing;
        self
    }

    /// Total planned capacity: `max_threads × events_per_thread`.
    #[inline]
    pub fn expected_size(&self) -> u64 {
        self.max_threads as u64 * self.events_per_thread as u64
    }

    /// Reject shapes the store cannot honor.
    pub fn validate(&self) -> StoreResult<()> {
        if self.max_threads == 0 {
            return Err(StoreError::InvalidConfiguration(
                "max_threads must be at least 1".into(),
            ));
        }
        if self.events_per_thread == 0 {
            return Err(StoreError::InvalidConfiguration(
                "events_per_thread must be at least 1".into(),
            ));
        }
        if self.max_value_len < MIN_VALUE_LEN {
            return Err(StoreError::InvalidConfiguration(format!(
                "max_value_len {} is below the floor of {}",
                self.max_value_len, MIN_VALUE_LEN
            )));
        }
        if self.max_kind_len < MIN_KIND_LEN {
            return Err(StoreError::InvalidConfiguration(format!(
                "max_kind_len {} is below the floor of {}",
                self.max_kind_len, MIN_KIND_LEN
            )));
        }
        if self.max_category_len < MIN_CATEGORY_LEN {
            return Err(StoreError::InvalidConfiguration(format!(
                "max_category_len {} is below the floor of {}",
                self.max_category_len, MIN_CATEGORY_LEN
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_size_is_product() {
        let config = StoreConfig::new(250, 4000);
        assert_eq!(config.expected_size(), 1_000_000);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let config = StoreConfig::new(0, 8);
        assert!(matches!(
            config.validate(),
            Err(StoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_events_rejected() {
        let config = StoreConfig::new(8, 0);
        assert!(matches!(
            config.validate(),
            Err(StoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_cap_floors_enforced() {
        assert!(StoreConfig::new(1, 1).with_value_len(15).validate().is_err());
        assert!(StoreConfig::new(1, 1).with_kind_len(4).validate().is_err());
        assert!(StoreConfig::new(1, 1)
            .with_category_len(7)
            .validate()
            .is_err());
        assert!(StoreConfig::new(1, 1)
            .with_value_len(MIN_VALUE_LEN)
            .with_kind_len(MIN_KIND_LEN)
            .with_category_len(MIN_CATEGORY_LEN)
            .validate()
            .is_ok());
    }
}
