//! Core infrastructure for boostfit.
//!
//! - [`types`]: scalar aliases, objective/booster/metric enums, hyperparameter values
//! - [`constants`]: configuration defaults
//! - [`error`]: the crate error type
//! - [`traits`]: objective and fitness-model abstractions
//! - [`threading`]: thread count clamping and the bounded rayon pool
//!
//! ```rust
//! use boostfit::core::{
//!     constants::DEFAULT_KFOLD,
//!     error::{BoostError, Result},
//!     types::{MetricType, ObjectiveType},
//! };
//!
//! let objective: ObjectiveType = "binary:logistic".parse()?;
//! assert_eq!(objective.to_string(), "binary:logistic");
//! assert_eq!(DEFAULT_KFOLD, 5);
//! # Ok::<(), BoostError>(())
//! ```

pub mod constants;
pub mod error;
pub mod threading;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{BoostError, Result};
pub use traits::*;
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static CORE_INIT: Once = Once::new();
static CORE_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize the core module.
///
/// Installs `env_logger` as the `log` backend (honouring `RUST_LOG`). Safe
/// to call any number of times; a logger installed by the host application
/// takes precedence.
pub fn initialize_core() -> Result<()> {
    CORE_INIT.call_once(|| {
        // Another logger may already be installed by the embedding program.
        let _ = env_logger::try_init();
        CORE_INITIALIZED.store(true, Ordering::SeqCst);
        log::debug!(
            "boostfit {} initialized, {} hardware threads available",
            BOOSTFIT_VERSION,
            threading::hardware_threads()
        );
    });
    Ok(())
}

/// Check if the core module has been initialized.
pub fn is_core_initialized() -> bool {
    CORE_INITIALIZED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_initialization() {
        assert!(initialize_core().is_ok());
        assert!(is_core_initialized());
        // Second call is a no-op
        assert!(initialize_core().is_ok());
    }

    #[test]
    fn test_version_constants() {
        assert!(!BOOSTFIT_VERSION.is_empty());
    }
}
