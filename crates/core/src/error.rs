//! Simulation error type and fallible allocation helpers

use std::fmt;

/// Errors reported by reconfiguration operations
///
/// Everything else in the core is either clamped (parameter ranges) or a defined
/// idle state (degenerate viewport, unsupported compute backend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// A particle store, trail buffer or frame buffer could not be sized.
    /// The previous buffers are left in place.
    AllocationFailed {
        /// Which resource was being allocated
        resource: &'static str,
        /// Requested size in bytes (saturated on overflow)
        requested_bytes: usize,
    },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::AllocationFailed {
                resource,
                requested_bytes,
            } => write!(
                f,
                "Failed to allocate {resource}: {requested_bytes} bytes requested"
            ),
        }
    }
}

impl std::error::Error for SimulationError {}

/// Allocate a vector of `len` elements produced by `make`, failing gracefully
/// instead of aborting when memory is unavailable.
pub(crate) fn try_allocate_with<T>(
    len: usize,
    resource: &'static str,
    mut make: impl FnMut() -> T,
) -> Result<Vec<T>, SimulationError> {
    let mut values = Vec::new();
    values
        .try_reserve_exact(len)
        .map_err(|_| SimulationError::AllocationFailed {
            resource,
            requested_bytes: len.saturating_mul(std::mem::size_of::<T>()),
        })?;
    values.extend(std::iter::repeat_with(&mut make).take(len));
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_succeeds_for_small_sizes() {
        let values = try_allocate_with(16, "test buffer", || 7_u32).unwrap();
        assert_eq!(values.len(), 16);
        assert!(values.iter().all(|&v| v == 7));
    }

    #[test]
    fn test_allocation_failure_is_reported() {
        let err = try_allocate_with(usize::MAX / 2, "huge buffer", || 0_u64).unwrap_err();
        match err {
            SimulationError::AllocationFailed {
                resource,
                requested_bytes,
            } => {
                assert_eq!(resource, "huge buffer");
                assert_eq!(requested_bytes, usize::MAX);
            }
        }
        assert!(err.to_string().contains("huge buffer"));
    }
}
