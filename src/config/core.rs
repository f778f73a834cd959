//! Booster configuration.
//!
//! [`Config`] is the typed form of a hyperparameter map. It is normally built
//! with [`Config::from_params`], which understands the parameter names (and
//! common aliases) that gradient boosting parameter dictionaries use, or with
//! [`ConfigBuilder`] from Rust code.

use crate::core::constants::*;
use crate::core::error::{BoostError, Result};
use crate::core::threading::clamp_nthread;
use crate::core::types::*;

use serde::{Deserialize, Serialize};

/// Typed booster configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // Model family
    /// Booster family
    pub booster: BoosterType,
    /// Learning objective
    pub objective: ObjectiveType,
    /// Evaluation metrics; empty means the objective's default. The last one
    /// drives early stopping.
    pub eval_metric: Vec<MetricType>,
    /// Number of classes for multiclass objectives (0 = unset)
    pub num_class: usize,

    // Shrinkage and regularization
    /// Step size shrinkage applied to every round
    pub eta: f64,
    /// L2 regularization on weights
    pub lambda: f64,
    /// L1 regularization on weights
    pub alpha: f64,
    /// Minimum loss reduction required to split a leaf
    pub gamma: f64,
    /// Maximum absolute leaf weight (0 = unconstrained)
    pub max_delta_step: f64,

    // Tree shape
    /// Maximum tree depth (0 = unlimited)
    pub max_depth: usize,
    /// Maximum number of leaves (0 = unlimited)
    pub max_leaves: usize,
    /// Minimum hessian sum needed in a child
    pub min_child_weight: f64,

    // Sampling
    /// Fraction of rows sampled per tree
    pub subsample: f64,
    /// Fraction of columns sampled per tree
    pub colsample_bytree: f64,

    // Misc
    /// Initial prediction for every row
    pub base_score: f64,
    /// Weight multiplier for positive examples in binary tasks
    pub scale_pos_weight: f64,
    /// Random seed for row/column sampling
    pub seed: u64,
    /// Worker threads, already clamped to the hardware
    pub nthread: usize,
    /// Suppress per-round log output
    pub silent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            booster: BoosterType::GbTree,
            objective: ObjectiveType::SquaredError,
            eval_metric: Vec::new(),
            num_class: 0,

            eta: DEFAULT_ETA,
            lambda: DEFAULT_LAMBDA,
            alpha: 0.0,
            gamma: 0.0,
            max_delta_step: 0.0,

            max_depth: DEFAULT_MAX_DEPTH,
            max_leaves: 0,
            min_child_weight: DEFAULT_MIN_CHILD_WEIGHT,

            subsample: 1.0,
            colsample_bytree: 1.0,

            base_score: DEFAULT_BASE_SCORE,
            scale_pos_weight: 1.0,
            seed: DEFAULT_SEED,
            nthread: clamp_nthread(DEFAULT_NTHREAD),
            silent: false,
        }
    }
}

fn param_f64(name: &str, value: &ParamValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| BoostError::invalid_parameter(name, value.to_string(), "expected a number"))
}

fn param_usize(name: &str, value: &ParamValue) -> Result<usize> {
    value.as_usize().ok_or_else(|| {
        BoostError::invalid_parameter(name, value.to_string(), "expected a non-negative integer")
    })
}

fn param_str<'a>(name: &str, value: &'a ParamValue) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| BoostError::invalid_parameter(name, value.to_string(), "expected a string"))
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and validate a configuration from a hyperparameter map.
    ///
    /// Unknown names are logged and ignored. Values that cannot be parsed or
    /// fall outside their valid range are errors.
    pub fn from_params(params: &Hyperparameters) -> Result<Self> {
        let mut config = Config::default();
        for (name, value) in params {
            config.set_param(name, value)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Apply a single named parameter.
    pub fn set_param(&mut self, name: &str, value: &ParamValue) -> Result<()> {
        match name {
            "booster" => self.booster = param_str(name, value)?.parse()?,
            "objective" => self.objective = param_str(name, value)?.parse()?,
            "eval_metric" => {
                self.eval_metric = param_str(name, value)?
                    .split(',')
                    .map(|m| m.trim().parse())
                    .collect::<Result<Vec<_>>>()?;
            }
            "num_class" => self.num_class = param_usize(name, value)?,
            "eta" | "learning_rate" => self.eta = param_f64(name, value)?,
            "lambda" | "reg_lambda" => self.lambda = param_f64(name, value)?,
            "alpha" | "reg_alpha" => self.alpha = param_f64(name, value)?,
            "gamma" | "min_split_loss" => self.gamma = param_f64(name, value)?,
            "max_delta_step" => self.max_delta_step = param_f64(name, value)?,
            "max_depth" => self.max_depth = param_usize(name, value)?,
            "max_leaves" => self.max_leaves = param_usize(name, value)?,
            "min_child_weight" => self.min_child_weight = param_f64(name, value)?,
            "subsample" => self.subsample = param_f64(name, value)?,
            "colsample_bytree" => self.colsample_bytree = param_f64(name, value)?,
            "base_score" => self.base_score = param_f64(name, value)?,
            "scale_pos_weight" => self.scale_pos_weight = param_f64(name, value)?,
            "seed" | "random_state" => self.seed = param_usize(name, value)? as u64,
            "nthread" | "n_jobs" => self.nthread = clamp_nthread(param_usize(name, value)?),
            "silent" => self.silent = param_f64(name, value)? != 0.0,
            "verbosity" => self.silent = param_f64(name, value)? == 0.0,
            other => {
                log::warn!("Ignoring unknown parameter {} = {}", other, value);
            }
        }
        Ok(())
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.eta > 0.0) {
            return Err(BoostError::invalid_parameter(
                "eta",
                self.eta.to_string(),
                "must be positive",
            ));
        }

        for (name, value) in [
            ("lambda", self.lambda),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("max_delta_step", self.max_delta_step),
            ("min_child_weight", self.min_child_weight),
        ] {
            if !(value >= 0.0) {
                return Err(BoostError::invalid_parameter(
                    name,
                    value.to_string(),
                    "must be non-negative",
                ));
            }
        }

        for (name, value) in [
            ("subsample", self.subsample),
            ("colsample_bytree", self.colsample_bytree),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(BoostError::invalid_parameter(
                    name,
                    value.to_string(),
                    "must be in range (0.0, 1.0]",
                ));
            }
        }

        if !(self.scale_pos_weight > 0.0) {
            return Err(BoostError::invalid_parameter(
                "scale_pos_weight",
                self.scale_pos_weight.to_string(),
                "must be positive",
            ));
        }

        if self.objective.is_multiclass() && self.num_class < 2 {
            return Err(BoostError::invalid_parameter(
                "num_class",
                self.num_class.to_string(),
                "must be at least 2 for multiclass objectives",
            ));
        }

        for metric in &self.eval_metric {
            let multiclass_metric =
                matches!(metric, MetricType::MultiLogLoss | MetricType::MultiError);
            if multiclass_metric != self.objective.is_multiclass() {
                return Err(BoostError::invalid_parameter(
                    "eval_metric",
                    metric.to_string(),
                    format!("not applicable to objective {}", self.objective),
                ));
            }
        }

        Ok(())
    }

    /// Number of margins the booster keeps per row.
    pub fn num_output_groups(&self) -> usize {
        if self.objective.is_multiclass() {
            self.num_class
        } else {
            1
        }
    }
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the booster family
    pub fn booster(mut self, booster: BoosterType) -> Self {
        self.config.booster = booster;
        self
    }

    /// Set the objective function
    pub fn objective(mut self, objective: ObjectiveType) -> Self {
        self.config.objective = objective;
        self
    }

    /// Append an evaluation metric
    pub fn eval_metric(mut self, metric: MetricType) -> Self {
        self.config.eval_metric.push(metric);
        self
    }

    /// Set the number of classes
    pub fn num_class(mut self, num_class: usize) -> Self {
        if num_class < 2 {
            self.validation_errors
                .push("num_class must be at least 2".to_string());
        }
        self.config.num_class = num_class;
        self
    }

    /// Set the shrinkage
    pub fn eta(mut self, eta: f64) -> Self {
        if eta <= 0.0 {
            self.validation_errors.push("eta must be positive".to_string());
        }
        self.config.eta = eta;
        self
    }

    /// Set the maximum tree depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Set the minimum child hessian sum
    pub fn min_child_weight(mut self, weight: f64) -> Self {
        self.config.min_child_weight = weight;
        self
    }

    /// Set L2 regularization
    pub fn lambda(mut self, lambda: f64) -> Self {
        if lambda < 0.0 {
            self.validation_errors
                .push("lambda must be non-negative".to_string());
        }
        self.config.lambda = lambda;
        self
    }

    /// Set L1 regularization
    pub fn alpha(mut self, alpha: f64) -> Self {
        if alpha < 0.0 {
            self.validation_errors
                .push("alpha must be non-negative".to_string());
        }
        self.config.alpha = alpha;
        self
    }

    /// Set the minimum split loss
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.config.gamma = gamma;
        self
    }

    /// Set row subsampling
    pub fn subsample(mut self, fraction: f64) -> Self {
        if fraction <= 0.0 || fraction > 1.0 {
            self.validation_errors
                .push("subsample must be in range (0.0, 1.0]".to_string());
        }
        self.config.subsample = fraction;
        self
    }

    /// Set column subsampling
    pub fn colsample_bytree(mut self, fraction: f64) -> Self {
        if fraction <= 0.0 || fraction > 1.0 {
            self.validation_errors
                .push("colsample_bytree must be in range (0.0, 1.0]".to_string());
        }
        self.config.colsample_bytree = fraction;
        self
    }

    /// Set the base score
    pub fn base_score(mut self, base_score: f64) -> Self {
        self.config.base_score = base_score;
        self
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the worker thread count (clamped to the hardware)
    pub fn nthread(mut self, nthread: usize) -> Self {
        self.config.nthread = clamp_nthread(nthread);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        if !self.validation_errors.is_empty() {
            return Err(BoostError::config(self.validation_errors.join("; ")));
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, ParamValue)]) -> Hyperparameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.booster, BoosterType::GbTree);
        assert_eq!(config.objective, ObjectiveType::SquaredError);
        assert_eq!(config.num_output_groups(), 1);
    }

    #[test]
    fn test_from_params_with_aliases() {
        let config = Config::from_params(&params(&[
            ("learning_rate", 0.05.into()),
            ("reg_lambda", 2.0.into()),
            ("max_depth", 4.into()),
            ("objective", "binary:logistic".into()),
            ("eval_metric", "auc".into()),
        ]))
        .unwrap();

        assert_eq!(config.eta, 0.05);
        assert_eq!(config.lambda, 2.0);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.objective, ObjectiveType::BinaryLogistic);
        assert_eq!(config.eval_metric, vec![MetricType::Auc]);
    }

    #[test]
    fn test_unknown_parameter_is_ignored() {
        let config = Config::from_params(&params(&[("colsample_bynode", 0.5.into())]));
        assert!(config.is_ok());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_params(&params(&[("subsample", 1.5.into())])).unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");

        let err = Config::from_params(&params(&[("max_depth", 2.5.into())])).unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");

        let err = Config::from_params(&params(&[("eta", 0.0.into())])).unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");
    }

    #[test]
    fn test_multiclass_requires_num_class() {
        let err =
            Config::from_params(&params(&[("objective", "multi:softprob".into())])).unwrap_err();
        assert!(err.to_string().contains("num_class"));

        let config = Config::from_params(&params(&[
            ("objective", "multi:softprob".into()),
            ("num_class", 3.into()),
            ("eval_metric", "mlogloss".into()),
        ]))
        .unwrap();
        assert_eq!(config.num_output_groups(), 3);
    }

    #[test]
    fn test_metric_objective_mismatch() {
        let err = Config::from_params(&params(&[("eval_metric", "mlogloss".into())])).unwrap_err();
        assert_eq!(err.category(), "invalid_parameter");
    }

    #[test]
    fn test_nthread_is_clamped() {
        let config = Config::from_params(&params(&[("nthread", 1_000_000.into())])).unwrap();
        assert!(config.nthread <= num_cpus::get());
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .objective(ObjectiveType::BinaryLogistic)
            .eta(0.1)
            .max_depth(3)
            .eval_metric(MetricType::LogLoss)
            .build()
            .unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.eval_metric, vec![MetricType::LogLoss]);

        assert!(ConfigBuilder::new().subsample(0.0).build().is_err());
    }
}
