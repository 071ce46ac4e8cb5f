//! Construction and growth errors.

use thiserror::Error;

/// Rejected construction parameters, or a table that cannot grow further.
/// No map is built when a construction error is returned.
#[derive(Error, Debug, Clone, Copy)]
pub enum TableError {
    #[error("capacity must be at least one bucket")]
    InvalidCapacity,
    /// Carries the rejected value. Equality compares bit patterns, so a NaN
    /// equals the same NaN.
    #[error("max load factor must be at least {min}, got {0}", min = crate::config::MIN_MAX_LOAD_FACTOR)]
    InvalidLoadFactor(f64),
    /// Holding `{0}` entries under the load factor needs more buckets than
    /// `usize` can count.
    #[error("capacity overflow: no bucket count can hold {0} entries")]
    CapacityOverflow(usize),
}

impl PartialEq for TableError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidCapacity, Self::InvalidCapacity) => true,
            (Self::InvalidLoadFactor(a), Self::InvalidLoadFactor(b)) => a.to_bits() == b.to_bits(),
            (Self::CapacityOverflow(a), Self::CapacityOverflow(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TableError {}
