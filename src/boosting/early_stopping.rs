//! Early stopping monitor.
//!
//! Tracks one validation score per round and reports when it has not
//! improved for `patience` consecutive rounds.

use crate::core::types::IterationIndex;

/// Configuration for early stopping behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyStoppingConfig {
    /// Number of rounds to wait for improvement before stopping
    pub patience: usize,
    /// Minimum improvement required to reset the patience counter
    pub min_delta: f64,
    /// Whether lower scores are better
    pub minimize: bool,
}

impl EarlyStoppingConfig {
    /// Stop after `patience` rounds without improvement.
    pub fn new(patience: usize, minimize: bool) -> Self {
        EarlyStoppingConfig {
            patience,
            min_delta: 0.0,
            minimize,
        }
    }
}

impl Default for EarlyStoppingConfig {
    fn default() -> Self {
        EarlyStoppingConfig::new(10, true)
    }
}

/// Tracks validation scores and determines when to stop training.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    config: EarlyStoppingConfig,
    best_score: f64,
    best_iteration: IterationIndex,
    patience_counter: usize,
    rounds_seen: usize,
    stopped: bool,
}

impl EarlyStopping {
    /// Creates a new early stopping monitor with the given configuration.
    pub fn new(config: EarlyStoppingConfig) -> Self {
        let best_score = Self::initial_score(config.minimize);
        EarlyStopping {
            config,
            best_score,
            best_iteration: 0,
            patience_counter: 0,
            rounds_seen: 0,
            stopped: false,
        }
    }

    fn initial_score(minimize: bool) -> f64 {
        if minimize {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    }

    /// Records the score of `iteration` and returns true once training
    /// should stop.
    ///
    /// An improvement must be strictly larger than `min_delta`; ties keep
    /// the earlier round as the best one.
    pub fn update(&mut self, score: f64, iteration: IterationIndex) -> bool {
        if self.stopped {
            return true;
        }
        self.rounds_seen += 1;

        let improvement = if self.config.minimize {
            self.best_score - score
        } else {
            score - self.best_score
        };

        if self.rounds_seen == 1 || improvement > self.config.min_delta {
            self.best_score = score;
            self.best_iteration = iteration;
            self.patience_counter = 0;
        } else {
            self.patience_counter += 1;
        }

        if self.patience_counter >= self.config.patience {
            self.stopped = true;
            log::info!(
                "Early stopping triggered at iteration {} (best was {} at iteration {})",
                iteration,
                self.best_score,
                self.best_iteration
            );
        }

        self.stopped
    }

    /// Returns the best score observed so far.
    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    /// Returns the iteration where the best score was observed.
    pub fn best_iteration(&self) -> IterationIndex {
        self.best_iteration
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_after_patience() {
        let mut monitor = EarlyStopping::new(EarlyStoppingConfig::new(2, true));
        assert!(!monitor.update(1.0, 0));
        assert!(!monitor.update(0.5, 1));
        assert!(!monitor.update(0.6, 2));
        assert!(monitor.update(0.7, 3));
        // Further rounds keep reporting the stop.
        assert!(monitor.update(0.1, 4));
        assert_eq!(monitor.best_iteration(), 1);
        assert_eq!(monitor.best_score(), 0.5);
    }

    #[test]
    fn test_ties_do_not_count_as_improvement() {
        let mut monitor = EarlyStopping::new(EarlyStoppingConfig::new(2, true));
        monitor.update(0.5, 0);
        monitor.update(0.5, 1);
        assert!(monitor.update(0.5, 2));
        assert_eq!(monitor.best_iteration(), 0);
    }

    #[test]
    fn test_maximize() {
        let mut monitor = EarlyStopping::new(EarlyStoppingConfig::new(1, false));
        assert!(!monitor.update(0.6, 0));
        assert!(!monitor.update(0.8, 1));
        assert!(monitor.update(0.7, 2));
        assert_eq!(monitor.best_iteration(), 1);
    }

    #[test]
    fn test_min_delta() {
        let mut monitor = EarlyStopping::new(EarlyStoppingConfig {
            patience: 1,
            min_delta: 0.1,
            minimize: true,
        });
        assert!(!monitor.update(1.0, 0));
        // 0.05 better is not enough
        assert!(monitor.update(0.95, 1));
        assert_eq!(monitor.best_score(), 1.0);
    }
}
