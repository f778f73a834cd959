//! Gradient boosting.
//!
//! A [`Booster`] owns the model for one training matrix. Every call to
//! [`Booster::update`] adds one boosting round: one regression tree per
//! output group for `gbtree`, or one coordinate descent pass for `gblinear`.
//! Margins on the training matrix are cached so a round only costs the
//! new trees; other matrices can keep their own [`MarginCache`].

pub mod early_stopping;
pub mod linear;
pub mod objective;

pub use early_stopping::{EarlyStopping, EarlyStoppingConfig};
pub use linear::{LinearModel, LinearParams};
pub use objective::create_objective_function;

use crate::config::Config;
use crate::core::error::{BoostError, Result};
use crate::core::traits::ObjectiveFunction;
use crate::core::types::*;
use crate::dataset::Dataset;
use crate::metrics;
use crate::tree::{SerialTreeLearner, SerialTreeLearnerConfig, Tree};
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Model family state.
#[derive(Debug, Clone)]
enum GradientBooster {
    /// One entry per round, one tree per output group
    Tree {
        learner: SerialTreeLearner,
        rounds: Vec<Vec<Tree>>,
    },
    Linear {
        params: LinearParams,
        model: LinearModel,
    },
}

/// Raw margins of one matrix and the number of rounds they include.
#[derive(Debug, Clone)]
pub struct MarginCache {
    rounds: usize,
    margins: Array2<Score>,
}

impl MarginCache {
    /// Margins as `(num_data, num_output_groups)`.
    pub fn margins(&self) -> &Array2<Score> {
        &self.margins
    }

    /// Number of boosting rounds folded into the margins.
    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

/// A boosted model trained on one matrix.
#[derive(Debug)]
pub struct Booster {
    config: Config,
    objective: Box<dyn ObjectiveFunction>,
    metrics: Vec<MetricType>,
    model: GradientBooster,
    base_margin: f64,
    num_features: usize,
    num_rounds: usize,
    train_cache: MarginCache,
    rng: StdRng,
}

impl Booster {
    /// Create an untrained booster for `dtrain`.
    ///
    /// Labels are validated against the objective here, so a bad label
    /// fails before any round runs.
    pub fn new(config: &Config, dtrain: &Dataset) -> Result<Self> {
        config.validate()?;
        let objective = create_objective_function(config)?;
        objective.validate_labels(&dtrain.labels())?;
        let base_margin = objective.prob_to_margin(config.base_score)?;

        let metrics = if config.eval_metric.is_empty() {
            vec![objective.default_metric()]
        } else {
            config.eval_metric.clone()
        };

        let groups = objective.num_output_groups();
        let model = match config.booster {
            BoosterType::GbTree => GradientBooster::Tree {
                learner: SerialTreeLearner::new(SerialTreeLearnerConfig::from_config(config)),
                rounds: Vec::new(),
            },
            BoosterType::GbLinear => GradientBooster::Linear {
                params: LinearParams::from_config(config),
                model: LinearModel::new(dtrain.num_features(), groups),
            },
        };

        log::debug!(
            "Created {} booster: objective={}, groups={}, base_margin={:.6}",
            config.booster,
            objective.name(),
            groups,
            base_margin
        );

        Ok(Booster {
            config: config.clone(),
            metrics,
            model,
            base_margin,
            num_features: dtrain.num_features(),
            num_rounds: 0,
            train_cache: MarginCache {
                rounds: 0,
                margins: Array2::from_elem((dtrain.num_data(), groups), base_margin as Score),
            },
            rng: StdRng::seed_from_u64(config.seed),
            objective,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn objective(&self) -> &dyn ObjectiveFunction {
        self.objective.as_ref()
    }

    /// Metrics reported by [`Booster::eval`]; the last one is the one early
    /// stopping watches.
    pub fn metrics(&self) -> &[MetricType] {
        &self.metrics
    }

    /// Number of completed boosting rounds.
    pub fn num_rounds(&self) -> usize {
        self.num_rounds
    }

    pub fn num_output_groups(&self) -> usize {
        self.objective.num_output_groups()
    }

    /// Trees of every round, or `None` for `gblinear`.
    pub fn trees(&self) -> Option<&[Vec<Tree>]> {
        match &self.model {
            GradientBooster::Tree { rounds, .. } => Some(rounds),
            GradientBooster::Linear { .. } => None,
        }
    }

    /// Linear weights, or `None` for `gbtree`.
    pub fn linear_model(&self) -> Option<&LinearModel> {
        match &self.model {
            GradientBooster::Linear { model, .. } => Some(model),
            GradientBooster::Tree { .. } => None,
        }
    }

    fn check_features(&self, data: &Dataset) -> Result<()> {
        if data.num_features() != self.num_features {
            return Err(BoostError::dimension_mismatch(
                format!("{} features", self.num_features),
                format!("{} features", data.num_features()),
            ));
        }
        Ok(())
    }

    /// Run one boosting round on `dtrain`, which must be the matrix the
    /// booster was created with.
    pub fn update(&mut self, dtrain: &Dataset, iteration: IterationIndex) -> Result<()> {
        self.check_features(dtrain)?;
        if dtrain.num_data() != self.train_cache.margins.nrows() {
            return Err(BoostError::dimension_mismatch(
                format!("{} training rows", self.train_cache.margins.nrows()),
                format!("{} rows", dtrain.num_data()),
            ));
        }
        crate::ensure!(
            iteration == self.num_rounds,
            crate::training_error!("expected iteration {}, got {}", self.num_rounds, iteration)
        );

        let labels = dtrain.labels();
        let weights = dtrain.weights();
        let shape = self.train_cache.margins.raw_dim();
        let mut gradients = Array2::<Score>::zeros(shape);
        let mut hessians = Array2::<Score>::zeros(shape);
        self.objective.compute_gradients(
            &self.train_cache.margins.view(),
            &labels,
            weights.as_ref(),
            &mut gradients.view_mut(),
            &mut hessians.view_mut(),
        )?;

        let features = dtrain.features();
        match &mut self.model {
            GradientBooster::Tree { learner, rounds } => {
                let mut trees = Vec::with_capacity(gradients.ncols());
                for k in 0..gradients.ncols() {
                    let tree = learner.train(
                        &features,
                        &gradients.column(k),
                        &hessians.column(k),
                        &mut self.rng,
                    )?;
                    let delta = tree.predict(&features);
                    let mut column = self.train_cache.margins.column_mut(k);
                    column += &delta;
                    trees.push(tree);
                }
                rounds.push(trees);
            }
            GradientBooster::Linear { params, model } => {
                let sum_weight = weights
                    .as_ref()
                    .map_or(dtrain.num_data() as f64, |w| {
                        w.iter().map(|&v| v as f64).sum()
                    });
                model.update(
                    &features,
                    &mut gradients.view_mut(),
                    &hessians.view(),
                    params,
                    sum_weight,
                );
                self.train_cache.margins = model.predict(&features) + self.base_margin as Score;
            }
        }

        self.num_rounds += 1;
        self.train_cache.rounds = self.num_rounds;
        if self.train_cache.margins.iter().any(|m| !m.is_finite()) {
            return Err(BoostError::numerical(format!(
                "training margins diverged at iteration {}",
                iteration
            )));
        }
        Ok(())
    }

    /// Start a margin cache for `data` holding only the base margin.
    pub fn new_margin_cache(&self, data: &Dataset) -> Result<MarginCache> {
        self.check_features(data)?;
        let mut cache = MarginCache {
            rounds: 0,
            margins: Array2::from_elem(
                (data.num_data(), self.num_output_groups()),
                self.base_margin as Score,
            ),
        };
        self.refresh_margins(data, &mut cache)?;
        Ok(cache)
    }

    /// Bring `cache` up to date with the rounds trained since it was last
    /// refreshed. `cache` must have been created for `data`.
    pub fn refresh_margins(&self, data: &Dataset, cache: &mut MarginCache) -> Result<()> {
        self.check_features(data)?;
        if cache.margins.nrows() != data.num_data() {
            return Err(BoostError::dimension_mismatch(
                format!("{} cached rows", cache.margins.nrows()),
                format!("{} rows", data.num_data()),
            ));
        }
        let features = data.features();
        match &self.model {
            GradientBooster::Tree { rounds, .. } => {
                for trees in &rounds[cache.rounds..] {
                    for (k, tree) in trees.iter().enumerate() {
                        let delta = tree.predict(&features);
                        let mut column = cache.margins.column_mut(k);
                        column += &delta;
                    }
                }
            }
            GradientBooster::Linear { model, .. } => {
                if cache.rounds != self.num_rounds {
                    cache.margins = model.predict(&features) + self.base_margin as Score;
                }
            }
        }
        cache.rounds = self.num_rounds;
        Ok(())
    }

    /// Raw margins for `data`, `(num_data, num_output_groups)`.
    pub fn predict_raw(&self, data: &Dataset) -> Result<Array2<Score>> {
        Ok(self.new_margin_cache(data)?.margins)
    }

    /// Transformed predictions for `data`: probabilities for logistic and
    /// softprob objectives, class indices for `multi:softmax`.
    pub fn predict(&self, data: &Dataset) -> Result<Array2<Score>> {
        let margins = self.predict_raw(data)?;
        Ok(self.objective.pred_transform(&margins.view()))
    }

    /// Apply the objective's prediction transform to cached margins.
    pub fn transform(&self, cache: &MarginCache) -> Array2<Score> {
        self.objective.pred_transform(&cache.margins.view())
    }

    /// Evaluate every configured metric on `data`.
    pub fn eval(&self, data: &Dataset) -> Result<Vec<(MetricType, f64)>> {
        let cache = self.new_margin_cache(data)?;
        self.eval_margins(&cache, data)
    }

    /// Evaluate every configured metric on the training matrix using the
    /// cached margins.
    pub fn eval_train(&self, dtrain: &Dataset) -> Result<Vec<(MetricType, f64)>> {
        self.eval_margins(&self.train_cache, dtrain)
    }

    /// Evaluate every configured metric on already computed margins.
    pub fn eval_margins(
        &self,
        cache: &MarginCache,
        data: &Dataset,
    ) -> Result<Vec<(MetricType, f64)>> {
        let preds = self.objective.eval_transform(&cache.margins.view());
        let labels = data.labels();
        let weights = data.weights();
        self.metrics
            .iter()
            .map(|&metric| {
                metrics::evaluate(metric, &preds.view(), &labels, weights.as_ref())
                    .map(|value| (metric, value))
            })
            .collect()
    }

    /// Total split gain per feature over all trees. Empty for `gblinear`.
    pub fn feature_importance(&self) -> Array1<f64> {
        let mut importance = Array1::zeros(self.num_features);
        if let Some(rounds) = self.trees() {
            for tree in rounds.iter().flatten() {
                importance += &tree.feature_importance(self.num_features);
            }
        }
        importance
    }

    /// Number of trees across all rounds and groups.
    pub fn num_trees(&self) -> usize {
        self.trees()
            .map_or(0, |rounds| rounds.iter().map(Vec::len).sum())
    }

    /// Mean of the training margins per group, mostly useful for logging.
    pub fn mean_train_margin(&self) -> Array1<Score> {
        self.train_cache
            .margins
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.num_output_groups()))
    }
}
