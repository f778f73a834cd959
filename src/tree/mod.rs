//! Regression trees for the gbtree booster.
//!
//! - [`Tree`] / [`TreeNode`]: flat tree storage and traversal
//! - [`split`]: gain, leaf weight and exact greedy threshold search
//! - [`learner`]: depth-wise tree growth with row and column sampling

pub mod learner;
pub mod node;
pub mod split;
#[allow(clippy::module_inception)]
pub mod tree;

pub use learner::{SerialTreeLearner, SerialTreeLearnerConfig};
pub use node::TreeNode;
pub use split::{SplitFinder, SplitInfo, SplitParams};
pub use tree::Tree;
