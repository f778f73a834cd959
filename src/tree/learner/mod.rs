//! Tree learning algorithms.

pub mod serial;

pub use serial::{SerialTreeLearner, SerialTreeLearnerConfig};
