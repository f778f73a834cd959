//! Configuration for boostfit.
//!
//! [`Config`] is the typed booster configuration parsed from a
//! hyperparameter map; [`FitnessConfig`] holds the options of one fitness
//! evaluation and can be loaded from disk.

pub mod core;
pub mod fitness;

pub use self::core::{Config, ConfigBuilder};
pub use self::fitness::FitnessConfig;

/// Default file name looked up by callers that keep the fitness options on disk
pub const DEFAULT_CONFIG_FILE: &str = "boostfit.toml";
