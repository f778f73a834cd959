//! Objective functions.
//!
//! Each objective turns margins into first and second order gradients and
//! knows how to map margins to predictions. Weighted rows scale both the
//! gradient and the hessian.

use crate::config::Config;
use crate::core::constants::{MIN_HESSIAN, PROB_EPSILON};
use crate::core::error::{BoostError, Result};
use crate::core::traits::ObjectiveFunction;
use crate::core::types::*;
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2, Axis};

/// Create the objective function named by `config.objective`.
pub fn create_objective_function(config: &Config) -> Result<Box<dyn ObjectiveFunction>> {
    let objective: Box<dyn ObjectiveFunction> = match config.objective {
        ObjectiveType::SquaredError => Box::new(SquaredErrorObjective),
        ObjectiveType::RegLogistic => Box::new(LogisticObjective::regression()),
        ObjectiveType::BinaryLogistic => {
            Box::new(LogisticObjective::binary(config.scale_pos_weight))
        }
        ObjectiveType::BinaryLogitRaw => {
            Box::new(LogisticObjective::logit_raw(config.scale_pos_weight))
        }
        ObjectiveType::MultiSoftmax => Box::new(SoftmaxObjective::new(config.num_class, false)),
        ObjectiveType::MultiSoftprob => Box::new(SoftmaxObjective::new(config.num_class, true)),
        ObjectiveType::Poisson => Box::new(PoissonObjective::new(config.max_delta_step)),
    };
    Ok(objective)
}

fn check_shapes(
    margins: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    groups: usize,
) -> Result<()> {
    if margins.nrows() != labels.len() || margins.ncols() != groups {
        return Err(BoostError::dimension_mismatch(
            format!("({}, {}) margins", labels.len(), groups),
            format!("({}, {})", margins.nrows(), margins.ncols()),
        ));
    }
    Ok(())
}

fn row_weight(weights: Option<&ArrayView1<'_, Label>>, i: usize) -> f64 {
    weights.map_or(1.0, |w| w[i] as f64)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Squared error regression.
#[derive(Debug)]
pub struct SquaredErrorObjective;

impl ObjectiveFunction for SquaredErrorObjective {
    fn compute_gradients(
        &self,
        margins: &ArrayView2<'_, Score>,
        labels: &ArrayView1<'_, Label>,
        weights: Option<&ArrayView1<'_, Label>>,
        gradients: &mut ArrayViewMut2<'_, Score>,
        hessians: &mut ArrayViewMut2<'_, Score>,
    ) -> Result<()> {
        check_shapes(margins, labels, 1)?;
        for i in 0..labels.len() {
            let w = row_weight(weights, i);
            gradients[[i, 0]] = ((margins[[i, 0]] as f64 - labels[i] as f64) * w) as Score;
            hessians[[i, 0]] = w as Score;
        }
        Ok(())
    }

    fn pred_transform(&self, margins: &ArrayView2<'_, Score>) -> Array2<Score> {
        margins.to_owned()
    }

    fn name(&self) -> &'static str {
        "reg:squarederror"
    }

    fn validate_labels(&self, _labels: &ArrayView1<'_, Label>) -> Result<()> {
        Ok(())
    }

    fn default_metric(&self) -> MetricType {
        MetricType::Rmse
    }
}

/// Logistic loss, shared by `reg:logistic`, `binary:logistic` and
/// `binary:logitraw`.
#[derive(Debug)]
pub struct LogisticObjective {
    name: &'static str,
    output_probability: bool,
    scale_pos_weight: f64,
    default_metric: MetricType,
}

impl LogisticObjective {
    /// `reg:logistic`
    pub fn regression() -> Self {
        LogisticObjective {
            name: "reg:logistic",
            output_probability: true,
            scale_pos_weight: 1.0,
            default_metric: MetricType::Rmse,
        }
    }

    /// `binary:logistic`
    pub fn binary(scale_pos_weight: f64) -> Self {
        LogisticObjective {
            name: "binary:logistic",
            output_probability: true,
            scale_pos_weight,
            default_metric: MetricType::LogLoss,
        }
    }

    /// `binary:logitraw`
    pub fn logit_raw(scale_pos_weight: f64) -> Self {
        LogisticObjective {
            name: "binary:logitraw",
            output_probability: false,
            scale_pos_weight,
            default_metric: MetricType::Auc,
        }
    }
}

impl ObjectiveFunction for LogisticObjective {
    fn compute_gradients(
        &self,
        margins: &ArrayView2<'_, Score>,
        labels: &ArrayView1<'_, Label>,
        weights: Option<&ArrayView1<'_, Label>>,
        gradients: &mut ArrayViewMut2<'_, Score>,
        hessians: &mut ArrayViewMut2<'_, Score>,
    ) -> Result<()> {
        check_shapes(margins, labels, 1)?;
        for i in 0..labels.len() {
            let y = labels[i] as f64;
            let mut w = row_weight(weights, i);
            if y == 1.0 {
                w *= self.scale_pos_weight;
            }
            let p = sigmoid(margins[[i, 0]] as f64);
            gradients[[i, 0]] = ((p - y) * w) as Score;
            hessians[[i, 0]] = ((p * (1.0 - p)).max(MIN_HESSIAN) * w) as Score;
        }
        Ok(())
    }

    fn pred_transform(&self, margins: &ArrayView2<'_, Score>) -> Array2<Score> {
        if self.output_probability {
            margins.mapv(|m| sigmoid(m as f64) as Score)
        } else {
            margins.to_owned()
        }
    }

    fn prob_to_margin(&self, base_score: f64) -> Result<f64> {
        if !(base_score > 0.0 && base_score < 1.0) {
            return Err(BoostError::invalid_parameter(
                "base_score",
                base_score.to_string(),
                "must be in (0, 1) for logistic loss",
            ));
        }
        Ok((base_score / (1.0 - base_score)).ln())
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn validate_labels(&self, labels: &ArrayView1<'_, Label>) -> Result<()> {
        if let Some(bad) = labels.iter().find(|&&y| !(0.0..=1.0).contains(&y)) {
            return Err(crate::dataset_error!(
                "label must be in [0, 1] for logistic loss, got {}",
                bad
            ));
        }
        Ok(())
    }

    fn default_metric(&self) -> MetricType {
        self.default_metric
    }
}

/// Softmax cross entropy for `multi:softmax` and `multi:softprob`.
#[derive(Debug)]
pub struct SoftmaxObjective {
    num_class: usize,
    output_prob: bool,
}

impl SoftmaxObjective {
    /// Create a softmax objective over `num_class` classes.
    pub fn new(num_class: usize, output_prob: bool) -> Self {
        SoftmaxObjective {
            num_class,
            output_prob,
        }
    }

    fn softmax(margins: &ArrayView2<'_, Score>) -> Array2<Score> {
        let mut probs = margins.mapv(|m| m as Score);
        for mut row in probs.axis_iter_mut(Axis(0)) {
            let max = row.iter().copied().fold(Score::NEG_INFINITY, Score::max);
            let mut sum = 0.0f64;
            for v in row.iter_mut() {
                let e = ((*v - max) as f64).exp();
                *v = e as Score;
                sum += e;
            }
            row.mapv_inplace(|v| (v as f64 / sum) as Score);
        }
        probs
    }
}

impl ObjectiveFunction for SoftmaxObjective {
    fn compute_gradients(
        &self,
        margins: &ArrayView2<'_, Score>,
        labels: &ArrayView1<'_, Label>,
        weights: Option<&ArrayView1<'_, Label>>,
        gradients: &mut ArrayViewMut2<'_, Score>,
        hessians: &mut ArrayViewMut2<'_, Score>,
    ) -> Result<()> {
        check_shapes(margins, labels, self.num_class)?;
        let probs = Self::softmax(margins);
        for i in 0..labels.len() {
            let w = row_weight(weights, i);
            let label = labels[i] as usize;
            for k in 0..self.num_class {
                let p = probs[[i, k]] as f64;
                let target = if k == label { 1.0 } else { 0.0 };
                gradients[[i, k]] = ((p - target) * w) as Score;
                hessians[[i, k]] = ((2.0 * p * (1.0 - p)).max(MIN_HESSIAN) * w) as Score;
            }
        }
        Ok(())
    }

    fn pred_transform(&self, margins: &ArrayView2<'_, Score>) -> Array2<Score> {
        if self.output_prob {
            return Self::softmax(margins);
        }
        let mut classes = Array2::zeros((margins.nrows(), 1));
        for (i, row) in margins.axis_iter(Axis(0)).enumerate() {
            let mut best = 0;
            for k in 1..row.len() {
                if row[k] > row[best] {
                    best = k;
                }
            }
            classes[[i, 0]] = best as Score;
        }
        classes
    }

    fn eval_transform(&self, margins: &ArrayView2<'_, Score>) -> Array2<Score> {
        Self::softmax(margins)
    }

    fn num_output_groups(&self) -> usize {
        self.num_class
    }

    fn name(&self) -> &'static str {
        if self.output_prob {
            "multi:softprob"
        } else {
            "multi:softmax"
        }
    }

    fn validate_labels(&self, labels: &ArrayView1<'_, Label>) -> Result<()> {
        for &y in labels.iter() {
            if y < 0.0 || y.fract() != 0.0 || y as usize >= self.num_class {
                return Err(BoostError::dataset(format!(
                    "label must be a class index in [0, {}), got {}",
                    self.num_class, y
                )));
            }
        }
        Ok(())
    }

    fn default_metric(&self) -> MetricType {
        if self.output_prob {
            MetricType::MultiLogLoss
        } else {
            MetricType::MultiError
        }
    }
}

/// Poisson regression with a log link.
#[derive(Debug)]
pub struct PoissonObjective {
    max_delta_step: f64,
}

impl PoissonObjective {
    /// Create a Poisson objective. A zero `max_delta_step` falls back to 0.7,
    /// which keeps the first rounds from overshooting.
    pub fn new(max_delta_step: f64) -> Self {
        PoissonObjective {
            max_delta_step: if max_delta_step > 0.0 {
                max_delta_step
            } else {
                0.7
            },
        }
    }
}

impl ObjectiveFunction for PoissonObjective {
    fn compute_gradients(
        &self,
        margins: &ArrayView2<'_, Score>,
        labels: &ArrayView1<'_, Label>,
        weights: Option<&ArrayView1<'_, Label>>,
        gradients: &mut ArrayViewMut2<'_, Score>,
        hessians: &mut ArrayViewMut2<'_, Score>,
    ) -> Result<()> {
        check_shapes(margins, labels, 1)?;
        for i in 0..labels.len() {
            let w = row_weight(weights, i);
            let m = margins[[i, 0]] as f64;
            gradients[[i, 0]] = ((m.exp() - labels[i] as f64) * w) as Score;
            hessians[[i, 0]] = ((m + self.max_delta_step).exp() * w) as Score;
        }
        Ok(())
    }

    fn pred_transform(&self, margins: &ArrayView2<'_, Score>) -> Array2<Score> {
        margins.mapv(|m| (m as f64).exp() as Score)
    }

    fn prob_to_margin(&self, base_score: f64) -> Result<f64> {
        if !(base_score > 0.0) {
            return Err(BoostError::invalid_parameter(
                "base_score",
                base_score.to_string(),
                "must be positive for poisson regression",
            ));
        }
        Ok(base_score.max(PROB_EPSILON).ln())
    }

    fn name(&self) -> &'static str {
        "count:poisson"
    }

    fn validate_labels(&self, labels: &ArrayView1<'_, Label>) -> Result<()> {
        if let Some(bad) = labels.iter().find(|&&y| y < 0.0) {
            return Err(crate::dataset_error!(
                "poisson regression needs non-negative labels, got {}",
                bad
            ));
        }
        Ok(())
    }

    fn default_metric(&self) -> MetricType {
        MetricType::PoissonNLogLik
    }
}
