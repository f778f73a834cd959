//! Serial exact greedy tree learner.
//!
//! Trees grow depth-wise: nodes are expanded in breadth-first order, so a
//! `max_leaves` budget is spent on the shallow levels first. Per node, every
//! sampled feature is scanned in parallel on the current rayon pool.

use crate::config::Config;
use crate::core::error::{BoostError, Result};
use crate::core::types::{FeatureIndex, NodeIndex, Score};
use crate::tree::split::{SplitFinder, SplitInfo, SplitParams};
use crate::tree::tree::Tree;
use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Configuration for the serial tree learner.
#[derive(Debug, Clone, PartialEq)]
pub struct SerialTreeLearnerConfig {
    /// Maximum tree depth (0 = unlimited)
    pub max_depth: usize,
    /// Maximum number of leaves (0 = unlimited)
    pub max_leaves: usize,
    /// Shrinkage applied to leaf weights
    pub learning_rate: f64,
    /// Fraction of rows sampled per tree
    pub subsample: f64,
    /// Fraction of features sampled per tree
    pub colsample_bytree: f64,
    /// Regularization used for gains and leaf weights
    pub split: SplitParams,
}

impl SerialTreeLearnerConfig {
    /// Derives the learner configuration from booster parameters.
    pub fn from_config(config: &Config) -> Self {
        SerialTreeLearnerConfig {
            max_depth: config.max_depth,
            max_leaves: config.max_leaves,
            learning_rate: config.eta,
            subsample: config.subsample,
            colsample_bytree: config.colsample_bytree,
            split: SplitParams::from_config(config),
        }
    }
}

impl Default for SerialTreeLearnerConfig {
    fn default() -> Self {
        SerialTreeLearnerConfig::from_config(&Config::default())
    }
}

/// Information about a tree node waiting to be expanded.
#[derive(Debug, Clone)]
struct NodeInfo {
    node_index: NodeIndex,
    rows: Vec<usize>,
    depth: usize,
    sum_gradients: f64,
    sum_hessians: f64,
}

/// Serial tree learner implementing exact greedy tree construction.
#[derive(Debug, Clone)]
pub struct SerialTreeLearner {
    config: SerialTreeLearnerConfig,
    split_finder: SplitFinder,
}

impl SerialTreeLearner {
    /// Creates a new serial tree learner with the given configuration.
    pub fn new(config: SerialTreeLearnerConfig) -> Self {
        let split_finder = SplitFinder::new(config.split);
        SerialTreeLearner {
            config,
            split_finder,
        }
    }

    pub fn config(&self) -> &SerialTreeLearnerConfig {
        &self.config
    }

    /// Grows one tree on the given gradients and hessians.
    ///
    /// `rng` drives row and column sampling; the caller owns it so that a
    /// booster with a fixed seed produces the same trees every run.
    pub fn train(
        &self,
        features: &ArrayView2<'_, f32>,
        gradients: &ArrayView1<'_, Score>,
        hessians: &ArrayView1<'_, Score>,
        rng: &mut StdRng,
    ) -> Result<Tree> {
        let num_data = features.nrows();
        if num_data == 0 {
            return Err(BoostError::training("cannot grow a tree on an empty dataset"));
        }
        if gradients.len() != num_data || hessians.len() != num_data {
            return Err(BoostError::dimension_mismatch(
                format!("{} gradients and hessians", num_data),
                format!("{} gradients, {} hessians", gradients.len(), hessians.len()),
            ));
        }

        let rows = self.sample_rows(num_data, rng);
        let columns = self.sample_columns(features.ncols(), rng);

        let (sum_gradients, sum_hessians) = rows.iter().fold((0.0, 0.0), |(g, h), &row| {
            (g + gradients[row] as f64, h + hessians[row] as f64)
        });

        let mut tree = Tree::new(sum_gradients, sum_hessians, rows.len());
        let mut queue = VecDeque::new();
        queue.push_back(NodeInfo {
            node_index: 0,
            rows,
            depth: 0,
            sum_gradients,
            sum_hessians,
        });

        while let Some(node) = queue.pop_front() {
            if self.config.max_leaves > 0 && tree.num_leaves() >= self.config.max_leaves {
                break;
            }
            if self.config.max_depth > 0 && node.depth >= self.config.max_depth {
                continue;
            }

            let split = match self.find_best_split(features, gradients, hessians, &columns, &node)
            {
                Some(split) => split,
                None => continue,
            };

            let (left, right) = tree.split_node(
                node.node_index,
                split.feature,
                split.threshold,
                split.default_left,
                split.gain,
                (split.left_sum_gradient, split.left_sum_hessian, split.left_count),
                (split.right_sum_gradient, split.right_sum_hessian, split.right_count),
            )?;

            let (left_rows, right_rows) = partition_rows(features, &node.rows, &split);
            queue.push_back(NodeInfo {
                node_index: left,
                rows: left_rows,
                depth: node.depth + 1,
                sum_gradients: split.left_sum_gradient,
                sum_hessians: split.left_sum_hessian,
            });
            queue.push_back(NodeInfo {
                node_index: right,
                rows: right_rows,
                depth: node.depth + 1,
                sum_gradients: split.right_sum_gradient,
                sum_hessians: split.right_sum_hessian,
            });
        }

        for index in tree.leaf_indices() {
            let weight = match tree.node(index) {
                Some(leaf) => self
                    .config
                    .split
                    .leaf_weight(leaf.sum_gradients(), leaf.sum_hessians()),
                None => 0.0,
            };
            tree.set_leaf_output(index, (weight * self.config.learning_rate) as Score)?;
        }

        log::trace!(
            "Grew tree with {} leaves, depth {}",
            tree.num_leaves(),
            tree.depth()
        );
        Ok(tree)
    }

    fn find_best_split(
        &self,
        features: &ArrayView2<'_, f32>,
        gradients: &ArrayView1<'_, Score>,
        hessians: &ArrayView1<'_, Score>,
        columns: &[FeatureIndex],
        node: &NodeInfo,
    ) -> Option<SplitInfo> {
        if node.rows.len() < 2 {
            return None;
        }
        let totals = (node.sum_gradients, node.sum_hessians);

        columns
            .par_iter()
            .filter_map(|&feature| {
                self.split_finder.find_best_split_for_feature(
                    feature,
                    &features.column(feature),
                    &node.rows,
                    gradients,
                    hessians,
                    totals,
                )
            })
            .reduce_with(|a, b| if b.better_than(&a) { b } else { a })
            .filter(|split| split.is_valid(&self.config.split))
    }

    fn sample_rows(&self, num_data: usize, rng: &mut StdRng) -> Vec<usize> {
        if self.config.subsample >= 1.0 {
            return (0..num_data).collect();
        }
        (0..num_data)
            .filter(|_| rng.gen::<f64>() < self.config.subsample)
            .collect()
    }

    fn sample_columns(&self, num_features: usize, rng: &mut StdRng) -> Vec<FeatureIndex> {
        if self.config.colsample_bytree >= 1.0 {
            return (0..num_features).collect();
        }
        let amount = ((num_features as f64 * self.config.colsample_bytree) as usize)
            .clamp(1, num_features.max(1));
        let mut columns = rand::seq::index::sample(rng, num_features, amount).into_vec();
        columns.sort_unstable();
        columns
    }
}

fn partition_rows(
    features: &ArrayView2<'_, f32>,
    rows: &[usize],
    split: &SplitInfo,
) -> (Vec<usize>, Vec<usize>) {
    rows.iter().copied().partition(|&row| {
        let value = features[[row, split.feature]];
        if value.is_nan() {
            split.default_left
        } else {
            value as f64 <= split.threshold
        }
    })
}
