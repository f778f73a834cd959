//! Fitness adapter configuration.
//!
//! Everything the fitness adapter needs besides the training data, in a form
//! that can be read from a `.json` or `.toml` file and overridden from the
//! environment.

use crate::core::constants::*;
use crate::core::error::{BoostError, Result};
use crate::core::types::Hyperparameters;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options of one fitness evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessConfig {
    /// Booster family name
    pub booster: String,
    /// Objective name
    pub objective: String,
    /// Evaluation metric name; its cross-validated mean is the fitness
    pub eval_metric: String,
    /// Number of cross-validation folds
    pub kfold: usize,
    /// Number of classes for multiclass objectives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_class: Option<usize>,
    /// Round budget
    pub num_boost_round: usize,
    /// Rounds without improvement before stopping
    pub early_stopping_rounds: usize,
    /// Value marking a missing feature; `None` means NaN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<f32>,
    /// Requested worker threads, clamped to the hardware
    pub nthread: usize,
    /// Seed for fold shuffling
    pub seed: u64,
    /// Preserve class ratios inside each fold
    pub stratified: bool,
    /// Candidate hyperparameters, layered over the fixed defaults
    pub hyperparameters: Hyperparameters,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        FitnessConfig {
            booster: DEFAULT_BOOSTER.to_string(),
            objective: DEFAULT_OBJECTIVE.to_string(),
            eval_metric: DEFAULT_EVAL_METRIC.to_string(),
            kfold: DEFAULT_KFOLD,
            num_class: None,
            num_boost_round: DEFAULT_NUM_BOOST_ROUND,
            early_stopping_rounds: DEFAULT_EARLY_STOPPING_ROUNDS,
            missing: None,
            nthread: DEFAULT_NTHREAD,
            seed: DEFAULT_SEED,
            stratified: false,
            hyperparameters: Hyperparameters::new(),
        }
    }
}

impl FitnessConfig {
    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: FitnessConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => {
                return Err(BoostError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| BoostError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(BoostError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `BOOSTFIT_*` environment variable overrides.
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Some(val) = env_usize("NTHREAD")? {
            self.nthread = val;
        }
        if let Some(val) = env_usize("KFOLD")? {
            self.kfold = val;
        }
        if let Some(val) = env_usize("NUM_BOOST_ROUND")? {
            self.num_boost_round = val;
        }
        if let Some(val) = env_usize("EARLY_STOPPING_ROUNDS")? {
            self.early_stopping_rounds = val;
        }
        Ok(())
    }
}

fn env_usize(name: &str) -> Result<Option<usize>> {
    let key = format!("{}{}", ENV_PREFIX, name);
    match std::env::var(&key) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| crate::config_error!("Invalid {}: {}", key, val)),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ParamValue;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = FitnessConfig::default();
        assert_eq!(config.booster, "gbtree");
        assert_eq!(config.objective, "reg:linear");
        assert_eq!(config.eval_metric, "rmse");
        assert_eq!(config.kfold, 5);
        assert_eq!(config.num_boost_round, 5000);
        assert_eq!(config.early_stopping_rounds, 100);
        assert_eq!(config.nthread, 8);
        assert!(config.missing.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fitness.toml");

        let mut config = FitnessConfig::default();
        config.kfold = 3;
        config
            .hyperparameters
            .insert("max_depth".to_string(), ParamValue::Int(4));
        config.save_to_file(&path).unwrap();

        let loaded = FitnessConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fitness.json");
        std::fs::write(
            &path,
            r#"{"objective": "binary:logistic", "eval_metric": "auc", "hyperparameters": {"eta": 0.1}}"#,
        )
        .unwrap();

        let loaded = FitnessConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.objective, "binary:logistic");
        assert_eq!(loaded.kfold, 5);
        assert_eq!(loaded.hyperparameters["eta"], ParamValue::Float(0.1));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fitness.yaml");
        std::fs::write(&path, "kfold: 3").unwrap();

        let err = FitnessConfig::load_from_file(&path).unwrap_err();
        assert_eq!(err.category(), "config");

        let err = FitnessConfig::load_from_file(dir.path().join("missing.toml")).unwrap_err();
        assert_eq!(err.category(), "io");
    }

    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    const OVERRIDE_VARS: [&str; 4] = [
        "BOOSTFIT_NTHREAD",
        "BOOSTFIT_KFOLD",
        "BOOSTFIT_NUM_BOOST_ROUND",
        "BOOSTFIT_EARLY_STOPPING_ROUNDS",
    ];

    #[test]
    fn test_environment_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for (var, value) in OVERRIDE_VARS.iter().zip(["2", " 3 ", "40", "7"]) {
            std::env::set_var(var, value);
        }

        let mut config = FitnessConfig::default();
        let applied = config.apply_environment_overrides();

        std::env::set_var("BOOSTFIT_KFOLD", "abc");
        let invalid = FitnessConfig::default().apply_environment_overrides();
        for var in OVERRIDE_VARS {
            std::env::remove_var(var);
        }

        applied.unwrap();
        assert_eq!(config.nthread, 2);
        assert_eq!(config.kfold, 3);
        assert_eq!(config.num_boost_round, 40);
        assert_eq!(config.early_stopping_rounds, 7);

        let err = invalid.unwrap_err();
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("BOOSTFIT_KFOLD"));
    }
}
