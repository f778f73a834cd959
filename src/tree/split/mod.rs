//! Split finding for regression trees.

pub mod finder;

pub use finder::{SplitFinder, SplitInfo, SplitParams};
