//! Linear booster (`gblinear`).
//!
//! The model is one weight per feature and output group plus a bias. Each
//! boosting round makes a single cyclic coordinate descent pass with
//! elastic-net regularization. Missing values contribute nothing, as if the
//! entry were absent from a sparse row.

use crate::config::Config;
use crate::core::types::Score;
use ndarray::{Array1, Array2, ArrayView2, ArrayViewMut2, Axis};
use serde::{Deserialize, Serialize};

/// Hessian sums below this leave a coordinate unchanged.
const MIN_COORDINATE_HESSIAN: f64 = 1e-5;

/// Shrinkage and penalties used by the linear updater.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearParams {
    pub eta: f64,
    pub lambda: f64,
    pub alpha: f64,
}

impl LinearParams {
    pub fn from_config(config: &Config) -> Self {
        LinearParams {
            eta: config.eta,
            lambda: config.lambda,
            alpha: config.alpha,
        }
    }

    /// Penalties are given per unit of instance weight.
    fn denormalized(&self, sum_instance_weight: f64) -> Self {
        LinearParams {
            eta: self.eta,
            lambda: self.lambda * sum_instance_weight,
            alpha: self.alpha * sum_instance_weight,
        }
    }
}

/// Elastic-net coordinate step for one weight. When the L1 penalty would
/// pull a weight past zero the step stops at zero.
pub fn coordinate_delta(
    sum_grad: f64,
    sum_hess: f64,
    weight: f64,
    alpha: f64,
    lambda: f64,
) -> f64 {
    if sum_hess < MIN_COORDINATE_HESSIAN {
        return 0.0;
    }
    let grad_l2 = sum_grad + lambda * weight;
    let hess_l2 = sum_hess + lambda;
    if weight - grad_l2 / hess_l2 >= 0.0 {
        (-(grad_l2 + alpha) / hess_l2).max(-weight)
    } else {
        (-(grad_l2 - alpha) / hess_l2).min(-weight)
    }
}

/// Linear model weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// `(num_features, num_groups)` feature weights
    weights: Array2<f64>,
    /// Per-group bias
    bias: Array1<f64>,
}

impl LinearModel {
    pub fn new(num_features: usize, num_groups: usize) -> Self {
        LinearModel {
            weights: Array2::zeros((num_features, num_groups)),
            bias: Array1::zeros(num_groups),
        }
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    /// Margins contributed by the model, `(num_rows, num_groups)`.
    pub fn predict(&self, features: &ArrayView2<'_, f32>) -> Array2<Score> {
        let groups = self.bias.len();
        let mut out = Array2::zeros((features.nrows(), groups));
        for (i, row) in features.axis_iter(Axis(0)).enumerate() {
            for k in 0..groups {
                let mut sum = self.bias[k];
                for (j, &x) in row.iter().enumerate() {
                    if !x.is_nan() {
                        sum += self.weights[[j, k]] * x as f64;
                    }
                }
                out[[i, k]] = sum as Score;
            }
        }
        out
    }

    /// One coordinate descent pass for every output group.
    ///
    /// `gradients` is updated in place after each coordinate step so later
    /// coordinates see the effect of earlier ones.
    pub fn update(
        &mut self,
        features: &ArrayView2<'_, f32>,
        gradients: &mut ArrayViewMut2<'_, Score>,
        hessians: &ArrayView2<'_, Score>,
        params: &LinearParams,
        sum_instance_weight: f64,
    ) {
        let params = params.denormalized(sum_instance_weight);
        let num_rows = features.nrows();

        for k in 0..self.bias.len() {
            let (sum_grad, sum_hess) = (0..num_rows).fold((0.0, 0.0), |(g, h), i| {
                (g + gradients[[i, k]] as f64, h + hessians[[i, k]] as f64)
            });
            if sum_hess >= MIN_COORDINATE_HESSIAN {
                let delta = -sum_grad / sum_hess * params.eta;
                self.bias[k] += delta;
                for i in 0..num_rows {
                    gradients[[i, k]] += (hessians[[i, k]] as f64 * delta) as Score;
                }
            }

            for j in 0..features.ncols() {
                let column = features.column(j);
                let mut sum_grad = 0.0;
                let mut sum_hess = 0.0;
                for (i, &x) in column.iter().enumerate() {
                    if x.is_nan() {
                        continue;
                    }
                    let x = x as f64;
                    sum_grad += gradients[[i, k]] as f64 * x;
                    sum_hess += hessians[[i, k]] as f64 * x * x;
                }

                let weight = self.weights[[j, k]];
                let delta =
                    coordinate_delta(sum_grad, sum_hess, weight, params.alpha, params.lambda)
                        * params.eta;
                if delta == 0.0 {
                    continue;
                }
                self.weights[[j, k]] += delta;
                for (i, &x) in column.iter().enumerate() {
                    if !x.is_nan() {
                        gradients[[i, k]] += (hessians[[i, k]] as f64 * x as f64 * delta) as Score;
                    }
                }
            }
        }
    }
}
