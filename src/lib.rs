//! # boostfit
//!
//! Cross-validated gradient boosting used as the fitness function of a
//! genetic hyperparameter search.
//!
//! Each candidate hyperparameter set is scored by running k-fold
//! cross-validation of a gradient boosted model with early stopping. The
//! score is the mean held-out metric at the last kept round. The held-out
//! (out-of-fold) predictions of that round are kept next to the score so the
//! search can reuse them, for example to stack the best candidates.
//!
//! ## Features
//!
//! - **Tree and linear boosters**: `gbtree` regression trees with second
//!   order split gains, or `gblinear` coordinate descent.
//! - **Objectives**: squared error, logistic, softmax and Poisson losses.
//! - **Cross-validation**: shuffled or stratified folds, per-round mean and
//!   standard deviation of every metric, early stopping and round callbacks.
//! - **Parallel folds**: folds train concurrently on a Rayon pool bounded by
//!   the hardware thread count.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use boostfit::{BoosterFitness, FitnessModel, Hyperparameters};
//! use ndarray::{Array1, Array2};
//!
//! # fn main() -> boostfit::Result<()> {
//! boostfit::init()?;
//!
//! let x = Array2::from_shape_fn((200, 4), |(i, j)| ((i * (j + 1)) % 23) as f32);
//! let y = Array1::from_shape_fn(200, |i| (i % 7) as f32);
//!
//! // One candidate produced by the search
//! let mut candidate = Hyperparameters::new();
//! candidate.insert("eta".into(), 0.1.into());
//! candidate.insert("max_depth".into(), 4.into());
//! candidate.insert("subsample".into(), 0.8.into());
//!
//! let mut model = BoosterFitness::new(x, y, candidate)?;
//! let rmse = model.cross_validate()?;
//!
//! println!("fitness {} with {:?} rounds", rmse, model.best_ntree_limit());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: types, constants, errors, traits and thread pools
//! - [`config`]: booster parameters and fitness settings
//! - [`dataset`]: training matrices, subsets and CSV loading
//! - [`metrics`]: evaluation metrics
//! - [`tree`]: regression trees and the exact greedy learner
//! - [`boosting`]: objectives, the booster and early stopping
//! - [`cv`]: k-fold cross-validation
//! - [`fitness`]: the fitness adapter

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module
pub mod core;

// Configuration management module
pub mod config;

// Dataset management module
pub mod dataset;

// Evaluation metrics
pub mod metrics;

// Tree learning
pub mod tree;

// Boosting module
pub mod boosting;

// Cross-validation
pub mod cv;

// Fitness adapter
pub mod fitness;

// Re-export core functionality for convenience
pub use core::{
    constants::*,
    error::{BoostError, Result},
    traits::*,
    types::*,
};

pub use config::{Config, ConfigBuilder, FitnessConfig};

pub use dataset::Dataset;

#[cfg(feature = "csv")]
pub use dataset::{load_csv, CsvOptions};

pub use boosting::{Booster, EarlyStopping, EarlyStoppingConfig};

pub use cv::{
    cross_validate, make_folds, CvCallback, CvEnv, CvOptions, CvResult, OofHistory,
    OofRecorder, OutOfFold,
};

pub use fitness::{BoosterFitness, BoosterFitnessBuilder};

pub use core::constants::BOOSTFIT_VERSION as VERSION;

/// Initialize the library.
///
/// Installs the `env_logger` backend so `RUST_LOG` controls the log output.
/// Calling it is optional and repeated calls are no-ops.
///
/// # Examples
///
/// ```rust
/// fn main() -> boostfit::Result<()> {
///     boostfit::init()?;
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    core::is_core_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_initialization() {
        assert!(init().is_ok());
        assert!(is_initialized());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .eta(0.05)
            .max_depth(3)
            .objective(ObjectiveType::BinaryLogistic)
            .build()
            .unwrap();

        assert_eq!(config.eta, 0.05);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.objective, ObjectiveType::BinaryLogistic);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let mut invalid = Config::default();
        invalid.eta = -0.1;
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_integration() {
        let err = BoostError::config("test error");
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn test_fitness_defaults() {
        let features = ndarray::Array2::zeros((10, 2));
        let labels = ndarray::Array1::zeros(10);
        let model = BoosterFitness::new(features, labels, Hyperparameters::new()).unwrap();

        assert_eq!(model.kfold(), DEFAULT_KFOLD);
        assert_eq!(model.eval_metric(), DEFAULT_EVAL_METRIC);
        assert_eq!(model.x_train().dim(), (10, 2));
        assert_eq!(model.y_train().len(), 10);
    }
}
