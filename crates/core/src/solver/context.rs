//! Compute capability check
//!
//! Builds the worker pool the CPU backend runs on. Failure is not an error
//! for the caller: the simulation falls back to the skip backend and idles.

use tracing::debug;

/// Result of the compute capability probe
#[derive(Debug)]
pub enum ComputeInitResult {
    /// Worker pool ready to use
    Ready(rayon::ThreadPool),
    /// No worker pool could be created
    Unsupported {
        /// Why the pool could not be built
        reason: String,
    },
}

/// Try to build the step worker pool
///
/// `None` (or `Some(0)`) uses one worker per available core.
pub fn probe_compute(threads: Option<usize>) -> ComputeInitResult {
    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|index| format!("slime-step-{index}"));
    if let Some(count) = threads {
        builder = builder.num_threads(count);
    }

    match builder.build() {
        Ok(pool) => {
            debug!("Worker pool ready with {} threads", pool.current_num_threads());
            ComputeInitResult::Ready(pool)
        }
        Err(error) => ComputeInitResult::Unsupported {
            reason: error.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_builds_requested_pool() {
        match probe_compute(Some(2)) {
            ComputeInitResult::Ready(pool) => assert_eq!(pool.current_num_threads(), 2),
            ComputeInitResult::Unsupported { reason } => panic!("pool unavailable: {reason}"),
        }
    }
}
