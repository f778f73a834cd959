//! Tree node representation.
//!
//! A node is either an internal split on one feature threshold or a leaf
//! holding a weight. Missing values follow `default_left`.

use crate::core::types::{FeatureIndex, NodeIndex, Score};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tree node supporting both internal and leaf nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Left child node index (internal nodes only)
    left_child: Option<NodeIndex>,
    /// Right child node index (internal nodes only)
    right_child: Option<NodeIndex>,
    /// Split feature index (internal nodes only)
    split_feature: Option<FeatureIndex>,
    /// Rows with `value <= split_threshold` go left
    split_threshold: Option<f64>,
    /// Leaf weight, already scaled by the learning rate
    leaf_output: Option<Score>,
    /// Sum of gradients over the rows that reached this node
    sum_gradients: f64,
    /// Sum of hessians over the rows that reached this node
    sum_hessians: f64,
    /// Number of training rows that reached this node
    data_count: usize,
    /// Loss reduction of the split (internal nodes only)
    split_gain: f64,
    /// Node depth in the tree
    depth: usize,
    /// Default direction for missing values (true = left)
    default_left: bool,
}

impl TreeNode {
    /// Creates a new leaf node with the given statistics.
    pub fn new_leaf(
        sum_gradients: f64,
        sum_hessians: f64,
        data_count: usize,
        depth: usize,
    ) -> Self {
        TreeNode {
            left_child: None,
            right_child: None,
            split_feature: None,
            split_threshold: None,
            leaf_output: Some(0.0),
            sum_gradients,
            sum_hessians,
            data_count,
            split_gain: 0.0,
            depth,
            default_left: false,
        }
    }

    /// Returns true if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        self.split_feature.is_none()
    }

    /// Returns the left child index.
    pub fn left_child(&self) -> Option<NodeIndex> {
        self.left_child
    }

    /// Returns the right child index.
    pub fn right_child(&self) -> Option<NodeIndex> {
        self.right_child
    }

    /// Returns the split feature.
    pub fn split_feature(&self) -> Option<FeatureIndex> {
        self.split_feature
    }

    /// Returns the leaf weight.
    pub fn leaf_output(&self) -> Option<Score> {
        self.leaf_output
    }

    /// Sets the leaf weight.
    pub fn set_leaf_output(&mut self, output: Score) {
        self.leaf_output = Some(output);
    }

    pub fn sum_gradients(&self) -> f64 {
        self.sum_gradients
    }

    pub fn sum_hessians(&self) -> f64 {
        self.sum_hessians
    }

    pub fn split_gain(&self) -> f64 {
        self.split_gain
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Turns this leaf into an internal node.
    pub fn set_split(
        &mut self,
        feature: FeatureIndex,
        threshold: f64,
        default_left: bool,
        gain: f64,
        left_child: NodeIndex,
        right_child: NodeIndex,
    ) {
        self.split_feature = Some(feature);
        self.split_threshold = Some(threshold);
        self.default_left = default_left;
        self.split_gain = gain;
        self.left_child = Some(left_child);
        self.right_child = Some(right_child);
        self.leaf_output = None;
    }

    /// Child to follow for `value`.
    #[inline]
    pub fn next(&self, value: f32) -> Option<NodeIndex> {
        let threshold = self.split_threshold?;
        let go_left = if value.is_nan() {
            self.default_left
        } else {
            value as f64 <= threshold
        };
        if go_left {
            self.left_child
        } else {
            self.right_child
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.split_feature, self.split_threshold) {
            (Some(feature), Some(threshold)) => write!(
                f,
                "[f{}<={}] yes={},no={},missing={} gain={:.6} cover={:.6}",
                feature,
                threshold,
                self.left_child.unwrap_or_default(),
                self.right_child.unwrap_or_default(),
                if self.default_left {
                    self.left_child.unwrap_or_default()
                } else {
                    self.right_child.unwrap_or_default()
                },
                self.split_gain,
                self.sum_hessians
            ),
            _ => write!(
                f,
                "leaf={:.6} cover={:.6} rows={}",
                self.leaf_output.unwrap_or(0.0),
                self.sum_hessians,
                self.data_count
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_then_split() {
        let mut node = TreeNode::new_leaf(-2.0, 4.0, 10, 0);
        assert!(node.is_leaf());
        assert_eq!(node.leaf_output(), Some(0.0));

        node.set_split(3, 0.5, true, 1.25, 1, 2);
        assert!(!node.is_leaf());
        assert_eq!(node.leaf_output(), None);
        assert_eq!(node.next(0.25), Some(1));
        assert_eq!(node.next(0.75), Some(2));
        assert_eq!(node.next(f32::NAN), Some(1));
    }

    #[test]
    fn test_display() {
        let node = TreeNode::new_leaf(0.0, 2.0, 2, 1);
        let text = node.to_string();
        assert!(text.starts_with("leaf="));
        assert!(text.ends_with("rows=2"));
    }
}
