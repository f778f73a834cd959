//! Default values shared by the configuration, the boosters and the fitness
//! adapter.

use static_assertions::const_assert;

/// Default booster family name.
pub const DEFAULT_BOOSTER: &str = "gbtree";

/// Default objective name (legacy alias of squared error regression).
pub const DEFAULT_OBJECTIVE: &str = "reg:linear";

/// Default evaluation metric name.
pub const DEFAULT_EVAL_METRIC: &str = "rmse";

/// Default number of cross-validation folds.
pub const DEFAULT_KFOLD: usize = 5;

/// Default round budget for one fitness evaluation.
pub const DEFAULT_NUM_BOOST_ROUND: usize = 5000;

/// Default early stopping patience.
pub const DEFAULT_EARLY_STOPPING_ROUNDS: usize = 100;

/// Default requested thread count, before clamping to the hardware.
pub const DEFAULT_NTHREAD: usize = 8;

/// Default shrinkage applied to each round.
pub const DEFAULT_ETA: f64 = 0.3;

/// Default maximum tree depth.
pub const DEFAULT_MAX_DEPTH: usize = 6;

/// Default minimum sum of hessian in a child.
pub const DEFAULT_MIN_CHILD_WEIGHT: f64 = 1.0;

/// Default L2 regularization on leaf weights.
pub const DEFAULT_LAMBDA: f64 = 1.0;

/// Default global bias (the initial prediction).
pub const DEFAULT_BASE_SCORE: f64 = 0.5;

/// Default random seed for fold shuffling and row/column sampling.
pub const DEFAULT_SEED: u64 = 0;

/// Probability clamp used by logistic losses.
pub const PROB_EPSILON: f64 = 1e-16;

/// Lower bound on hessians so leaf weights stay finite.
pub const MIN_HESSIAN: f64 = 1e-16;

/// Smallest split gain that is still considered an improvement.
pub const RT_EPS: f64 = 1e-6;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "BOOSTFIT_";

/// Library version.
pub const BOOSTFIT_VERSION: &str = env!("CARGO_PKG_VERSION");

const_assert!(DEFAULT_KFOLD >= 2);
const_assert!(DEFAULT_NTHREAD >= 1);
const_assert!(DEFAULT_EARLY_STOPPING_ROUNDS <= DEFAULT_NUM_BOOST_ROUND);
