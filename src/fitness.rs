//! Cross-validated boosting as a fitness function.
//!
//! A genetic hyperparameter search scores each candidate by building a
//! [`BoosterFitness`] with the candidate's hyperparameters and calling
//! [`BoosterFitness::cross_validate`]. The returned value is the mean held-out
//! metric at the round where cross-validation stopped; lower is better for
//! error metrics, higher for `auc`. The search decides what to do with it.
//!
//! ```rust
//! use boostfit::{BoosterFitness, Hyperparameters};
//! use ndarray::{Array1, Array2};
//!
//! let x = Array2::from_shape_fn((40, 3), |(i, j)| ((i * (j + 2)) % 13) as f32);
//! let y = Array1::from_shape_fn(40, |i| ((i * 2) % 13) as f32);
//!
//! let mut hyperparameters = Hyperparameters::new();
//! hyperparameters.insert("eta".into(), 0.3.into());
//! hyperparameters.insert("max_depth".into(), 3.into());
//!
//! let mut model = BoosterFitness::builder(x, y)
//!     .with_hyperparameters(hyperparameters)
//!     .with_kfold(4)
//!     .with_num_boost_round(50)
//!     .with_early_stopping_rounds(5)
//!     .build()?;
//!
//! let fitness = model.cross_validate()?;
//! assert!(fitness.is_finite());
//! assert!(model.best_ntree_limit().is_some());
//! assert_eq!(model.oof().map(|o| o.num_folds()), Some(4));
//! # Ok::<(), boostfit::BoostError>(())
//! ```

use crate::config::FitnessConfig;
use crate::core::constants::*;
use crate::core::error::{BoostError, Result};
use crate::core::threading::clamp_nthread;
use crate::core::traits::FitnessModel;
use crate::core::types::*;
use crate::cv::{cross_validate, CvOptions, CvResult, OofRecorder, OutOfFold};
use crate::dataset::Dataset;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Fitness adapter: k-fold cross-validated boosting on fixed training data.
#[derive(Debug, Clone)]
pub struct BoosterFitness {
    x_train: Array2<f32>,
    y_train: Array1<f32>,
    weights: Option<Array1<f32>>,
    params: Hyperparameters,
    kfold: usize,
    num_boost_round: usize,
    early_stopping_rounds: usize,
    missing: Option<f32>,
    nthread: usize,
    seed: u64,
    stratified: bool,
    best_ntree_limit: Option<usize>,
    oof: Option<OutOfFold>,
    cv_result: Option<CvResult>,
}

impl BoosterFitness {
    /// Adapter with default options and the given hyperparameters.
    pub fn new(
        x_train: Array2<f32>,
        y_train: Array1<f32>,
        hyperparameters: Hyperparameters,
    ) -> Result<Self> {
        Self::builder(x_train, y_train)
            .with_hyperparameters(hyperparameters)
            .build()
    }

    /// Start configuring an adapter for the given training data.
    pub fn builder(x_train: Array2<f32>, y_train: Array1<f32>) -> BoosterFitnessBuilder {
        BoosterFitnessBuilder::new(x_train, y_train)
    }

    /// Build an adapter from a [`FitnessConfig`].
    pub fn from_config(
        x_train: Array2<f32>,
        y_train: Array1<f32>,
        config: FitnessConfig,
    ) -> Result<Self> {
        let mut builder = Self::builder(x_train, y_train)
            .with_booster(config.booster)
            .with_objective(config.objective)
            .with_eval_metric(config.eval_metric)
            .with_kfold(config.kfold)
            .with_num_boost_round(config.num_boost_round)
            .with_early_stopping_rounds(config.early_stopping_rounds)
            .with_nthread(config.nthread)
            .with_seed(config.seed)
            .with_stratified(config.stratified)
            .with_hyperparameters(config.hyperparameters);
        if let Some(num_class) = config.num_class {
            builder = builder.with_num_class(num_class);
        }
        if let Some(missing) = config.missing {
            builder = builder.with_missing(missing);
        }
        builder.build()
    }

    /// The merged parameter map handed to cross-validation.
    pub fn params(&self) -> &Hyperparameters {
        &self.params
    }

    /// Worker threads after clamping to the hardware.
    pub fn nthread(&self) -> usize {
        self.nthread
    }

    pub fn kfold(&self) -> usize {
        self.kfold
    }

    /// Metric whose held-out mean is the fitness: the last entry of
    /// `eval_metric`, which is also the one early stopping watches.
    pub fn eval_metric(&self) -> &str {
        self.params
            .get("eval_metric")
            .and_then(ParamValue::as_str)
            .and_then(|m| m.rsplit(',').next())
            .map(str::trim)
            .unwrap_or(DEFAULT_EVAL_METRIC)
    }

    /// Number of rounds kept by the last [`cross_validate`](Self::cross_validate).
    pub fn best_ntree_limit(&self) -> Option<usize> {
        self.best_ntree_limit
    }

    /// Held-out predictions of every fold at the kept round.
    pub fn oof(&self) -> Option<&OutOfFold> {
        self.oof.as_ref()
    }

    /// Full per-round table of the last run.
    pub fn cv_result(&self) -> Option<&CvResult> {
        self.cv_result.as_ref()
    }

    fn cv_options(&self) -> CvOptions {
        CvOptions::new()
            .with_nfold(self.kfold)
            .with_num_boost_round(self.num_boost_round)
            .with_early_stopping_rounds(self.early_stopping_rounds)
            .with_stratified(self.stratified)
            .with_seed(self.seed)
    }

    /// Run k-fold cross-validation and return the final
    /// `test-<eval_metric>-mean`.
    ///
    /// Afterwards [`best_ntree_limit`](Self::best_ntree_limit) holds the
    /// number of kept rounds and [`oof`](Self::oof) the held-out predictions
    /// of that last kept round. Both are replaced on every call.
    pub fn cross_validate(&mut self) -> Result<f64> {
        self.best_ntree_limit = None;
        self.oof = None;
        self.cv_result = None;

        let dtrain = Dataset::new(
            self.x_train.clone(),
            self.y_train.clone(),
            self.weights.clone(),
            self.missing,
        )?;
        let options = self.cv_options();
        let mut recorder = OofRecorder::new();
        let result = cross_validate(&self.params, &dtrain, &options, &mut [&mut recorder])?;

        let rounds = result.len();
        if rounds == 0 {
            return Err(BoostError::cross_validation("no boosting rounds were run"));
        }
        let key = format!("test-{}-mean", self.eval_metric());
        let fitness = result.last(&key).ok_or_else(|| {
            BoostError::cross_validation(format!("result table has no column {}", key))
        })?;

        log::info!(
            "{} = {:.6} after {} rounds{}",
            key,
            fitness,
            rounds,
            if result.best_iteration.is_some() {
                " (early stopped)"
            } else {
                ""
            }
        );

        self.best_ntree_limit = Some(rounds);
        self.oof = recorder.into_history().into_round(rounds - 1);
        self.cv_result = Some(result);
        Ok(fitness)
    }
}

impl FitnessModel for BoosterFitness {
    fn x_train(&self) -> ArrayView2<'_, f32> {
        self.x_train.view()
    }

    fn y_train(&self) -> ArrayView1<'_, f32> {
        self.y_train.view()
    }

    fn cross_validate(&mut self) -> Result<f64> {
        BoosterFitness::cross_validate(self)
    }
}

/// Builder for [`BoosterFitness`].
#[derive(Debug, Clone)]
pub struct BoosterFitnessBuilder {
    x_train: Array2<f32>,
    y_train: Array1<f32>,
    weights: Option<Array1<f32>>,
    hyperparameters: Hyperparameters,
    booster: String,
    objective: String,
    eval_metric: String,
    num_class: Option<usize>,
    kfold: usize,
    num_boost_round: usize,
    early_stopping_rounds: usize,
    missing: Option<f32>,
    nthread: usize,
    seed: u64,
    stratified: bool,
}

impl BoosterFitnessBuilder {
    pub fn new(x_train: Array2<f32>, y_train: Array1<f32>) -> Self {
        BoosterFitnessBuilder {
            x_train,
            y_train,
            weights: None,
            hyperparameters: Hyperparameters::new(),
            booster: DEFAULT_BOOSTER.to_string(),
            objective: DEFAULT_OBJECTIVE.to_string(),
            eval_metric: DEFAULT_EVAL_METRIC.to_string(),
            num_class: None,
            kfold: DEFAULT_KFOLD,
            num_boost_round: DEFAULT_NUM_BOOST_ROUND,
            early_stopping_rounds: DEFAULT_EARLY_STOPPING_ROUNDS,
            missing: None,
            nthread: DEFAULT_NTHREAD,
            seed: DEFAULT_SEED,
            stratified: false,
        }
    }

    /// Candidate hyperparameters; they override the fixed defaults.
    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.hyperparameters = hyperparameters;
        self
    }

    /// Per-row sample weights
    pub fn with_weights(mut self, weights: Array1<f32>) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn with_booster(mut self, booster: impl Into<String>) -> Self {
        self.booster = booster.into();
        self
    }

    pub fn with_objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    pub fn with_eval_metric(mut self, eval_metric: impl Into<String>) -> Self {
        self.eval_metric = eval_metric.into();
        self
    }

    pub fn with_num_class(mut self, num_class: usize) -> Self {
        self.num_class = Some(num_class);
        self
    }

    pub fn with_kfold(mut self, kfold: usize) -> Self {
        self.kfold = kfold;
        self
    }

    pub fn with_num_boost_round(mut self, rounds: usize) -> Self {
        self.num_boost_round = rounds;
        self
    }

    /// Rounds without improvement before stopping; 0 disables early stopping.
    pub fn with_early_stopping_rounds(mut self, rounds: usize) -> Self {
        self.early_stopping_rounds = rounds;
        self
    }

    /// Feature value that marks a missing entry
    pub fn with_missing(mut self, missing: f32) -> Self {
        self.missing = Some(missing);
        self
    }

    pub fn with_nthread(mut self, nthread: usize) -> Self {
        self.nthread = nthread;
        self
    }

    /// Seed of the fold permutation
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stratified(mut self, stratified: bool) -> Self {
        self.stratified = stratified;
        self
    }

    /// Merge the defaults with the candidate hyperparameters and build the
    /// adapter. Parameter values are only checked by `cross_validate`.
    pub fn build(self) -> Result<BoosterFitness> {
        let nthread = clamp_nthread(self.nthread);

        let mut params = Hyperparameters::new();
        params.insert("booster".into(), self.booster.into());
        params.insert("objective".into(), self.objective.into());
        params.insert("eval_metric".into(), self.eval_metric.into());
        params.insert("nthread".into(), nthread.into());
        params.insert("silent".into(), 1.into());
        if let Some(num_class) = self.num_class {
            params.insert("num_class".into(), num_class.into());
        }
        params.extend(self.hyperparameters);

        // A candidate may ask for more threads than the machine has.
        for key in ["nthread", "n_jobs"] {
            if let Some(requested) = params.get(key).and_then(ParamValue::as_usize) {
                params.insert(key.into(), clamp_nthread(requested).into());
            }
        }

        log::debug!("Fitness parameters: {:?}", params);

        Ok(BoosterFitness {
            x_train: self.x_train,
            y_train: self.y_train,
            weights: self.weights,
            params,
            kfold: self.kfold,
            num_boost_round: self.num_boost_round,
            early_stopping_rounds: self.early_stopping_rounds,
            missing: self.missing,
            nthread,
            seed: self.seed,
            stratified: self.stratified,
            best_ntree_limit: None,
            oof: None,
            cv_result: None,
        })
    }
}
