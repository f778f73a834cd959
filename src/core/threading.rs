//! Thread count handling.
//!
//! Cross-validation runs the per-round fold updates, and the split search
//! nested inside them, on a dedicated rayon pool whose size is the requested
//! thread count capped at the hardware concurrency.

use crate::core::error::{BoostError, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Number of hardware threads on this machine.
pub fn hardware_threads() -> usize {
    num_cpus::get().max(1)
}

/// Clamp a requested thread count to `[1, hardware_threads()]`.
///
/// A request of 0 means "use every available core".
pub fn clamp_nthread(requested: usize) -> usize {
    let hardware = hardware_threads();
    if requested == 0 {
        hardware
    } else {
        requested.min(hardware)
    }
}

/// Build a rayon pool with `clamp_nthread(requested)` workers.
pub fn build_pool(requested: usize) -> Result<ThreadPool> {
    let num_threads = clamp_nthread(requested);
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("boostfit-worker-{}", i))
        .build()
        .map_err(|e| BoostError::threading(format!("failed to build thread pool: {}", e)))
}
