//! Core data types for boostfit.
//!
//! Objective, booster and metric names follow the strings used by the
//! usual gradient boosting parameter dictionaries (`binary:logistic`,
//! `gbtree`, `rmse`, ...) so a hyperparameter map written for one of those
//! libraries parses unchanged.

use crate::core::error::{BoostError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Prediction and gradient value type.
pub type Score = f32;

/// Target value and sample weight type.
pub type Label = f32;

/// Accumulation type for gradient statistics.
pub type Hist = f64;

/// Feature index type for identifying features in the dataset.
pub type FeatureIndex = usize;

/// Tree node identifier type.
pub type NodeIndex = usize;

/// Iteration number type for boosting rounds.
pub type IterationIndex = usize;

/// Learning objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveType {
    /// Squared error regression (`reg:squarederror`, legacy alias `reg:linear`)
    SquaredError,
    /// Logistic regression on a [0, 1] target (`reg:logistic`)
    RegLogistic,
    /// Binary classification with probability output (`binary:logistic`)
    BinaryLogistic,
    /// Binary classification with margin output (`binary:logitraw`)
    BinaryLogitRaw,
    /// Multiclass classification returning the class index (`multi:softmax`)
    MultiSoftmax,
    /// Multiclass classification returning class probabilities (`multi:softprob`)
    MultiSoftprob,
    /// Poisson regression for counts (`count:poisson`)
    Poisson,
}

impl Default for ObjectiveType {
    fn default() -> Self {
        ObjectiveType::SquaredError
    }
}

impl ObjectiveType {
    /// Whether this objective needs `num_class`.
    pub fn is_multiclass(&self) -> bool {
        matches!(self, ObjectiveType::MultiSoftmax | ObjectiveType::MultiSoftprob)
    }
}

impl fmt::Display for ObjectiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveType::SquaredError => write!(f, "reg:squarederror"),
            ObjectiveType::RegLogistic => write!(f, "reg:logistic"),
            ObjectiveType::BinaryLogistic => write!(f, "binary:logistic"),
            ObjectiveType::BinaryLogitRaw => write!(f, "binary:logitraw"),
            ObjectiveType::MultiSoftmax => write!(f, "multi:softmax"),
            ObjectiveType::MultiSoftprob => write!(f, "multi:softprob"),
            ObjectiveType::Poisson => write!(f, "count:poisson"),
        }
    }
}

impl FromStr for ObjectiveType {
    type Err = BoostError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reg:squarederror" | "reg:linear" => Ok(ObjectiveType::SquaredError),
            "reg:logistic" => Ok(ObjectiveType::RegLogistic),
            "binary:logistic" => Ok(ObjectiveType::BinaryLogistic),
            "binary:logitraw" => Ok(ObjectiveType::BinaryLogitRaw),
            "multi:softmax" => Ok(ObjectiveType::MultiSoftmax),
            "multi:softprob" => Ok(ObjectiveType::MultiSoftprob),
            "count:poisson" => Ok(ObjectiveType::Poisson),
            other => Err(BoostError::invalid_parameter(
                "objective",
                other,
                "unknown objective function",
            )),
        }
    }
}

/// Booster families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoosterType {
    /// Regression trees
    GbTree,
    /// Generalised linear model updated by coordinate descent
    GbLinear,
}

impl Default for BoosterType {
    fn default() -> Self {
        BoosterType::GbTree
    }
}

impl fmt::Display for BoosterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoosterType::GbTree => write!(f, "gbtree"),
            BoosterType::GbLinear => write!(f, "gblinear"),
        }
    }
}

impl FromStr for BoosterType {
    type Err = BoostError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gbtree" => Ok(BoosterType::GbTree),
            "gblinear" => Ok(BoosterType::GbLinear),
            "dart" => Err(BoostError::invalid_parameter(
                "booster",
                s,
                "dart boosting is not supported, use gbtree or gblinear",
            )),
            other => Err(BoostError::invalid_parameter(
                "booster",
                other,
                "expected gbtree or gblinear",
            )),
        }
    }
}

/// Evaluation metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    /// Root mean squared error
    Rmse,
    /// Mean absolute error
    Mae,
    /// Binary negative log-likelihood
    LogLoss,
    /// Binary classification error rate at threshold 0.5
    Error,
    /// Area under the ROC curve
    Auc,
    /// Multiclass negative log-likelihood
    MultiLogLoss,
    /// Multiclass classification error rate
    MultiError,
    /// Poisson negative log-likelihood
    PoissonNLogLik,
}

impl MetricType {
    /// Whether a larger value of this metric is better.
    pub fn is_maximize(&self) -> bool {
        matches!(self, MetricType::Auc)
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricType::Rmse => write!(f, "rmse"),
            MetricType::Mae => write!(f, "mae"),
            MetricType::LogLoss => write!(f, "logloss"),
            MetricType::Error => write!(f, "error"),
            MetricType::Auc => write!(f, "auc"),
            MetricType::MultiLogLoss => write!(f, "mlogloss"),
            MetricType::MultiError => write!(f, "merror"),
            MetricType::PoissonNLogLik => write!(f, "poisson-nloglik"),
        }
    }
}

impl FromStr for MetricType {
    type Err = BoostError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rmse" => Ok(MetricType::Rmse),
            "mae" => Ok(MetricType::Mae),
            "logloss" => Ok(MetricType::LogLoss),
            "error" => Ok(MetricType::Error),
            "auc" => Ok(MetricType::Auc),
            "mlogloss" => Ok(MetricType::MultiLogLoss),
            "merror" => Ok(MetricType::MultiError),
            "poisson-nloglik" => Ok(MetricType::PoissonNLogLik),
            other => Err(BoostError::invalid_parameter(
                "eval_metric",
                other,
                "unknown evaluation metric",
            )),
        }
    }
}

/// A single hyperparameter value.
///
/// Untagged so that `{"max_depth": 6, "eta": 0.3, "booster": "gbtree"}`
/// deserializes directly from JSON or TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean flag
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Str(String),
}

impl ParamValue {
    /// Interpret the value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            ParamValue::Str(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the value as a non-negative integer.
    ///
    /// Floats are accepted only when they carry no fractional part, which is
    /// what a genetic search produces when it encodes integers as reals.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            ParamValue::Int(v) if *v >= 0 => Some(*v as usize),
            ParamValue::Float(v) if *v >= 0.0 && v.fract() == 0.0 => Some(*v as usize),
            ParamValue::Bool(v) => Some(*v as usize),
            ParamValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interpret the value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{}", v),
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Str(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<usize> for ParamValue {
    fn from(v: usize) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// Hyperparameter map, ordered so merged parameter sets print stably.
pub type Hyperparameters = BTreeMap<String, ParamValue>;
