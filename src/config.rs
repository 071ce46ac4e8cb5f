//! TableConfig: construction-time parameters for `ChainedHashMap`.

use crate::error::TableError;

/// Number of buckets a map starts with when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 16;

/// Upper bound on `len / capacity` enforced after every insertion.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Smallest accepted maximum load factor. Growth needs about
/// `len / max_load_factor` buckets, so this caps the table at 1024 buckets
/// per stored entry.
pub const MIN_MAX_LOAD_FACTOR: f64 = 1.0 / 1024.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub max_load_factor: f64,
}

impl TableConfig {
    pub const fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Check both parameters. A NaN load factor is rejected along with any
    /// below `MIN_MAX_LOAD_FACTOR`.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.initial_capacity == 0 {
            return Err(TableError::InvalidCapacity);
        }
        if self.max_load_factor.is_nan() || self.max_load_factor < MIN_MAX_LOAD_FACTOR {
            return Err(TableError::InvalidLoadFactor(self.max_load_factor));
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}
