//! Exact greedy split finding.
//!
//! Candidate thresholds are the midpoints between consecutive distinct
//! feature values of the rows in a node. Rows with a missing value are tried
//! on both sides and the better side becomes the node's default direction.

use crate::config::Config;
use crate::core::constants::RT_EPS;
use crate::core::types::{FeatureIndex, Score};
use ndarray::ArrayView1;
use std::cmp::Ordering;

/// Regularization terms shared by split evaluation and leaf weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitParams {
    /// L2 regularization on leaf weights
    pub lambda: f64,
    /// L1 regularization on leaf weights
    pub alpha: f64,
    /// Minimum loss reduction for a split
    pub gamma: f64,
    /// Maximum absolute leaf weight (0 = unconstrained)
    pub max_delta_step: f64,
    /// Minimum hessian sum in each child
    pub min_child_weight: f64,
}

impl SplitParams {
    /// Extracts the split parameters from a booster configuration.
    pub fn from_config(config: &Config) -> Self {
        SplitParams {
            lambda: config.lambda,
            alpha: config.alpha,
            gamma: config.gamma,
            max_delta_step: config.max_delta_step,
            min_child_weight: config.min_child_weight,
        }
    }

    /// Soft-thresholds `sum_gradient` by the L1 penalty.
    #[inline]
    pub fn threshold_l1(&self, sum_gradient: f64) -> f64 {
        if sum_gradient > self.alpha {
            sum_gradient - self.alpha
        } else if sum_gradient < -self.alpha {
            sum_gradient + self.alpha
        } else {
            0.0
        }
    }

    /// Optimal leaf weight for the given statistics.
    pub fn leaf_weight(&self, sum_gradient: f64, sum_hessian: f64) -> f64 {
        if sum_hessian < self.min_child_weight || sum_hessian <= 0.0 {
            return 0.0;
        }
        let weight = -self.threshold_l1(sum_gradient) / (sum_hessian + self.lambda);
        if self.max_delta_step > 0.0 {
            weight.clamp(-self.max_delta_step, self.max_delta_step)
        } else {
            weight
        }
    }

    /// Structure score of a node: `ThresholdL1(G)^2 / (H + lambda)`.
    pub fn gain(&self, sum_gradient: f64, sum_hessian: f64) -> f64 {
        if sum_hessian < self.min_child_weight || sum_hessian <= 0.0 {
            return 0.0;
        }
        if self.max_delta_step == 0.0 {
            let g = self.threshold_l1(sum_gradient);
            g * g / (sum_hessian + self.lambda)
        } else {
            // The clamped weight is no longer the unconstrained optimum.
            let w = self.leaf_weight(sum_gradient, sum_hessian);
            -(2.0 * sum_gradient * w + (sum_hessian + self.lambda) * w * w)
        }
    }
}

impl Default for SplitParams {
    fn default() -> Self {
        SplitParams {
            lambda: 1.0,
            alpha: 0.0,
            gamma: 0.0,
            max_delta_step: 0.0,
            min_child_weight: 1.0,
        }
    }
}

/// Information about a potential split point.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    /// Feature index for the split
    pub feature: FeatureIndex,
    /// Rows with `value <= threshold` go left
    pub threshold: f64,
    /// Loss reduction of the split
    pub gain: f64,
    /// Left child statistics
    pub left_sum_gradient: f64,
    pub left_sum_hessian: f64,
    pub left_count: usize,
    /// Right child statistics
    pub right_sum_gradient: f64,
    pub right_sum_hessian: f64,
    pub right_count: usize,
    /// Default direction for missing values (true = left)
    pub default_left: bool,
}

impl SplitInfo {
    /// Returns true if the split is worth applying under `params`.
    pub fn is_valid(&self, params: &SplitParams) -> bool {
        self.left_count > 0
            && self.right_count > 0
            && self.gain > RT_EPS
            && self.gain >= params.gamma
    }

    /// Orders splits by gain, breaking ties towards the lower feature index
    /// so the choice does not depend on evaluation order.
    pub fn better_than(&self, other: &SplitInfo) -> bool {
        match self.gain.partial_cmp(&other.gain) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => self.feature < other.feature,
            _ => false,
        }
    }
}

/// Exact greedy split finder for one node.
#[derive(Debug, Clone)]
pub struct SplitFinder {
    params: SplitParams,
}

impl SplitFinder {
    pub fn new(params: SplitParams) -> Self {
        SplitFinder { params }
    }

    pub fn params(&self) -> &SplitParams {
        &self.params
    }

    /// Best split of `rows` on one feature column, if any candidate satisfies
    /// `min_child_weight` on both sides.
    ///
    /// `totals` holds the gradient and hessian sums over all of `rows`.
    pub fn find_best_split_for_feature(
        &self,
        feature: FeatureIndex,
        column: &ArrayView1<'_, f32>,
        rows: &[usize],
        gradients: &ArrayView1<'_, Score>,
        hessians: &ArrayView1<'_, Score>,
        totals: (f64, f64),
    ) -> Option<SplitInfo> {
        let mut present: Vec<(f32, usize)> = rows
            .iter()
            .filter(|&&row| !column[row].is_nan())
            .map(|&row| (column[row], row))
            .collect();
        if present.len() < 2 {
            return None;
        }
        present.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let (total_g, total_h) = totals;
        let (present_g, present_h) = present.iter().fold((0.0, 0.0), |(g, h), &(_, row)| {
            (g + gradients[row] as f64, h + hessians[row] as f64)
        });
        let missing_g = total_g - present_g;
        let missing_h = total_h - present_h;
        let missing_count = rows.len() - present.len();
        let parent_gain = self.params.gain(total_g, total_h);

        let mut best: Option<SplitInfo> = None;
        let mut left_g = 0.0;
        let mut left_h = 0.0;

        for i in 0..present.len() - 1 {
            let (value, row) = present[i];
            left_g += gradients[row] as f64;
            left_h += hessians[row] as f64;

            let next_value = present[i + 1].0;
            if next_value == value {
                continue;
            }
            let threshold = midpoint(value, next_value);
            let left_count = i + 1;

            // Missing rows go right, then left.
            let directions: &[bool] = if missing_count > 0 {
                &[false, true]
            } else {
                &[false]
            };
            for &default_left in directions {
                let (lg, lh, lc) = if default_left {
                    (left_g + missing_g, left_h + missing_h, left_count + missing_count)
                } else {
                    (left_g, left_h, left_count)
                };
                let (rg, rh) = (total_g - lg, total_h - lh);
                if lh < self.params.min_child_weight || rh < self.params.min_child_weight {
                    continue;
                }

                let gain = self.params.gain(lg, lh) + self.params.gain(rg, rh) - parent_gain;
                let candidate = SplitInfo {
                    feature,
                    threshold,
                    gain,
                    left_sum_gradient: lg,
                    left_sum_hessian: lh,
                    left_count: lc,
                    right_sum_gradient: rg,
                    right_sum_hessian: rh,
                    right_count: rows.len() - lc,
                    default_left,
                };
                if best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(candidate);
                }
            }
        }

        best
    }
}

/// Threshold between two adjacent sorted values. Rows with `x <= threshold`
/// go left, so an infinite neighbour falls back to the left value, or to the
/// lowest finite `f64` when the left value is `-inf`.
fn midpoint(value: f32, next_value: f32) -> f64 {
    let mid = (value as f64 + next_value as f64) / 2.0;
    if mid.is_finite() {
        mid
    } else if value.is_finite() {
        value as f64
    } else {
        f64::MIN
    }
}
