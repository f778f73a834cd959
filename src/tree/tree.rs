//! Regression tree used by the gbtree booster.
//!
//! Nodes live in a flat vector with the root at index 0. Leaf weights are
//! stored already multiplied by the learning rate, so predicting is a pure
//! traversal.

use crate::core::error::{BoostError, Result};
use crate::core::types::{FeatureIndex, NodeIndex, Score};
use crate::tree::node::TreeNode;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision tree structure representing a single tree in the ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    /// Vector of tree nodes (index 0 is always the root)
    nodes: Vec<TreeNode>,
    /// Current number of leaf nodes
    num_leaves: usize,
    /// Depth of the deepest node
    max_depth: usize,
}

impl Tree {
    /// Creates a tree holding a single root leaf.
    pub fn new(sum_gradients: f64, sum_hessians: f64, data_count: usize) -> Self {
        Tree {
            nodes: vec![TreeNode::new_leaf(
                sum_gradients,
                sum_hessians,
                data_count,
                0,
            )],
            num_leaves: 1,
            max_depth: 0,
        }
    }

    /// Returns the number of nodes in the tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Returns the tree depth (maximum depth of any node).
    pub fn depth(&self) -> usize {
        self.max_depth
    }

    /// Returns a reference to the node at the given index.
    pub fn node(&self, index: NodeIndex) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// Returns a mutable reference to the node at the given index.
    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut TreeNode> {
        self.nodes.get_mut(index)
    }

    /// Leaf reached by `features`.
    pub fn leaf_index(&self, features: &ArrayView1<'_, f32>) -> NodeIndex {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            let next = node
                .split_feature()
                .and_then(|feature| node.next(features[feature]));
            match next {
                Some(child) => index = child,
                None => return index,
            }
        }
    }

    /// Predicts the output for a single row.
    pub fn predict_row(&self, features: &ArrayView1<'_, f32>) -> Score {
        self.nodes[self.leaf_index(features)]
            .leaf_output()
            .unwrap_or(0.0)
    }

    /// Predicts the output for every row of `features`.
    pub fn predict(&self, features: &ArrayView2<'_, f32>) -> Array1<Score> {
        features
            .axis_iter(Axis(0))
            .map(|row| self.predict_row(&row))
            .collect()
    }

    /// Splits leaf `node_index` and returns the new `(left, right)` leaves.
    #[allow(clippy::too_many_arguments)]
    pub fn split_node(
        &mut self,
        node_index: NodeIndex,
        feature: FeatureIndex,
        threshold: f64,
        default_left: bool,
        gain: f64,
        left_stats: (f64, f64, usize),
        right_stats: (f64, f64, usize),
    ) -> Result<(NodeIndex, NodeIndex)> {
        let depth = match self.nodes.get(node_index) {
            Some(node) if node.is_leaf() => node.depth() + 1,
            Some(_) => {
                return Err(crate::training_error!("node {} is already split", node_index))
            }
            None => {
                return Err(BoostError::internal(format!(
                    "node {} does not exist",
                    node_index
                )))
            }
        };

        let left = self.nodes.len();
        let right = left + 1;
        self.nodes.push(TreeNode::new_leaf(
            left_stats.0,
            left_stats.1,
            left_stats.2,
            depth,
        ));
        self.nodes.push(TreeNode::new_leaf(
            right_stats.0,
            right_stats.1,
            right_stats.2,
            depth,
        ));
        self.nodes[node_index].set_split(feature, threshold, default_left, gain, left, right);

        self.num_leaves += 1;
        self.max_depth = self.max_depth.max(depth);
        Ok((left, right))
    }

    /// Sets the weight of a leaf.
    pub fn set_leaf_output(&mut self, node_index: NodeIndex, output: Score) -> Result<()> {
        match self.nodes.get_mut(node_index) {
            Some(node) if node.is_leaf() => {
                node.set_leaf_output(output);
                Ok(())
            }
            _ => Err(BoostError::internal(format!(
                "node {} is not a leaf",
                node_index
            ))),
        }
    }

    /// Indices of all leaves.
    pub fn leaf_indices(&self) -> Vec<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_leaf())
            .map(|(i, _)| i)
            .collect()
    }

    /// Total split gain per feature.
    pub fn feature_importance(&self, num_features: usize) -> Array1<f64> {
        let mut importance = Array1::zeros(num_features);
        for node in &self.nodes {
            if let Some(feature) = node.split_feature() {
                if feature < num_features {
                    importance[feature] += node.split_gain();
                }
            }
        }
        importance
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn dump(tree: &Tree, index: NodeIndex, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let node = &tree.nodes[index];
            writeln!(f, "{}{}:{}", "\t".repeat(node.depth()), index, node)?;
            if let (Some(left), Some(right)) = (node.left_child(), node.right_child()) {
                dump(tree, left, f)?;
                dump(tree, right, f)?;
            }
            Ok(())
        }
        dump(self, 0, f)
    }
}
