//! K-fold cross-validation for boosters.
//!
//! [`cross_validate`] trains one [`Booster`] per fold in lock step. After
//! every round it evaluates each fold on its own training and held-out rows,
//! appends the across-fold mean and standard deviation of every metric to a
//! [`CvResult`] table, runs the registered [`CvCallback`]s and finally checks
//! early stopping on the test mean of the last metric.
//!
//! ```rust
//! use boostfit::cv::{cross_validate, CvOptions};
//! use boostfit::{Dataset, Hyperparameters};
//! use ndarray::{Array1, Array2};
//!
//! let x = Array2::from_shape_fn((30, 2), |(i, j)| (i + j) as f32);
//! let y = Array1::from_shape_fn(30, |i| i as f32);
//! let data = Dataset::new(x, y, None, None)?;
//!
//! let mut params = Hyperparameters::new();
//! params.insert("max_depth".into(), 2.into());
//!
//! let options = CvOptions::new().with_nfold(3).with_num_boost_round(5);
//! let result = cross_validate(&params, &data, &options, &mut [])?;
//! assert_eq!(result.len(), 5);
//! assert!(result.last("test-rmse-mean").is_some());
//! # Ok::<(), boostfit::BoostError>(())
//! ```

use crate::boosting::{Booster, EarlyStopping, EarlyStoppingConfig, MarginCache};
use crate::config::Config;
use crate::core::error::{BoostError, Result};
use crate::core::threading::build_pool;
use crate::core::types::*;
use crate::dataset::Dataset;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Options of a cross-validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvOptions {
    /// Number of folds
    pub nfold: usize,
    /// Maximum number of boosting rounds
    pub num_boost_round: usize,
    /// Stop after this many rounds without improvement of the test metric
    pub early_stopping_rounds: Option<usize>,
    /// Keep the label distribution of every fold close to the full set
    pub stratified: bool,
    /// Shuffle rows before partitioning
    pub shuffle: bool,
    /// Seed of the fold permutation
    pub seed: u64,
    /// Force the early stopping direction; by default `auc` is maximized
    /// and everything else minimized
    pub maximize: Option<bool>,
    /// Log every n-th round at info level
    pub verbose_eval: Option<usize>,
}

impl CvOptions {
    /// Create options with default values
    pub fn new() -> Self {
        CvOptions {
            nfold: 3,
            num_boost_round: 10,
            early_stopping_rounds: None,
            stratified: false,
            shuffle: true,
            seed: 0,
            maximize: None,
            verbose_eval: None,
        }
    }

    /// Set the number of folds
    pub fn with_nfold(mut self, nfold: usize) -> Self {
        self.nfold = nfold;
        self
    }

    /// Set the maximum number of rounds
    pub fn with_num_boost_round(mut self, rounds: usize) -> Self {
        self.num_boost_round = rounds;
        self
    }

    /// Stop after `rounds` rounds without improvement; 0 disables it
    pub fn with_early_stopping_rounds(mut self, rounds: usize) -> Self {
        self.early_stopping_rounds = Some(rounds);
        self
    }

    /// Set stratified fold assignment
    pub fn with_stratified(mut self, stratified: bool) -> Self {
        self.stratified = stratified;
        self
    }

    /// Set whether rows are shuffled
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Set the fold permutation seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Override the early stopping direction
    pub fn with_maximize(mut self, maximize: bool) -> Self {
        self.maximize = Some(maximize);
        self
    }

    /// Log progress every `period` rounds
    pub fn with_verbose_eval(mut self, period: usize) -> Self {
        self.verbose_eval = Some(period.max(1));
        self
    }
}

impl Default for CvOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Row indices of one fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldIndices {
    /// Rows the fold trains on, ascending
    pub train_index: Vec<usize>,
    /// Held-out rows, in partition order
    pub test_index: Vec<usize>,
}

/// Partition the rows of `dataset` into `nfold` folds.
///
/// Without stratification the (optionally shuffled) rows are cut into
/// contiguous chunks; the first `num_data % nfold` chunks get one extra row.
/// With stratification every class's shuffled rows are dealt round-robin,
/// continuing where the previous class stopped.
pub fn make_folds(
    dataset: &Dataset,
    nfold: usize,
    stratified: bool,
    shuffle: bool,
    seed: u64,
) -> Result<Vec<FoldIndices>> {
    let num_data = dataset.num_data();
    if nfold < 2 {
        return Err(BoostError::invalid_parameter(
            "nfold",
            nfold.to_string(),
            "cross-validation needs at least 2 folds",
        ));
    }
    if nfold > num_data {
        return Err(BoostError::invalid_parameter(
            "nfold",
            nfold.to_string(),
            format!("more folds than the {} available rows", num_data),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut test_sets: Vec<Vec<usize>> = vec![Vec::new(); nfold];

    if stratified {
        let mut by_class: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (row, label) in dataset.labels().iter().enumerate() {
            by_class.entry(label.to_bits()).or_default().push(row);
        }
        let mut next = 0;
        for rows in by_class.values_mut() {
            if shuffle {
                rows.shuffle(&mut rng);
            }
            for &row in rows.iter() {
                test_sets[next].push(row);
                next = (next + 1) % nfold;
            }
        }
    } else {
        let mut rows: Vec<usize> = (0..num_data).collect();
        if shuffle {
            rows.shuffle(&mut rng);
        }
        let base = num_data / nfold;
        let extra = num_data % nfold;
        let mut start = 0;
        for (k, test) in test_sets.iter_mut().enumerate() {
            let size = base + usize::from(k < extra);
            test.extend_from_slice(&rows[start..start + size]);
            start += size;
        }
    }

    let mut folds = Vec::with_capacity(nfold);
    for test_index in test_sets {
        let mut held_out = vec![false; num_data];
        for &row in &test_index {
            held_out[row] = true;
        }
        let train_index: Vec<usize> = (0..num_data).filter(|&row| !held_out[row]).collect();
        if test_index.is_empty() || train_index.is_empty() {
            return Err(BoostError::cross_validation(format!(
                "degenerate fold: {} training and {} held-out rows",
                train_index.len(),
                test_index.len()
            )));
        }
        folds.push(FoldIndices {
            train_index,
            test_index,
        });
    }
    Ok(folds)
}

/// One fold: its data, its booster and the margins of its held-out rows.
#[derive(Debug)]
pub struct CvFold {
    pub train_index: Vec<usize>,
    pub test_index: Vec<usize>,
    pub dtrain: Dataset,
    pub dtest: Dataset,
    booster: Booster,
    test_cache: MarginCache,
}

impl CvFold {
    /// Materialize a fold and create its booster.
    pub fn new(config: &Config, dataset: &Dataset, indices: FoldIndices) -> Result<Self> {
        let dtrain = dataset.subset(&indices.train_index)?;
        let dtest = dataset.subset(&indices.test_index)?;
        let booster = Booster::new(config, &dtrain)?;
        let test_cache = booster.new_margin_cache(&dtest)?;
        Ok(CvFold {
            train_index: indices.train_index,
            test_index: indices.test_index,
            dtrain,
            dtest,
            booster,
            test_cache,
        })
    }

    pub fn booster(&self) -> &Booster {
        &self.booster
    }

    /// Run one boosting round and refresh the held-out margins.
    pub fn update(&mut self, iteration: IterationIndex) -> Result<()> {
        self.booster.update(&self.dtrain, iteration)?;
        self.booster.refresh_margins(&self.dtest, &mut self.test_cache)
    }

    /// Training metrics followed by held-out metrics, named
    /// `train-<metric>` and `test-<metric>`.
    pub fn eval(&self) -> Result<Vec<(String, f64)>> {
        let train = self.booster.eval_train(&self.dtrain)?;
        let test = self.booster.eval_margins(&self.test_cache, &self.dtest)?;
        Ok(train
            .into_iter()
            .map(|(metric, value)| (format!("train-{}", metric), value))
            .chain(
                test.into_iter()
                    .map(|(metric, value)| (format!("test-{}", metric), value)),
            )
            .collect())
    }

    /// Transformed predictions of the current model on the held-out rows.
    pub fn predict_test(&self) -> Array2<Score> {
        self.booster.transform(&self.test_cache)
    }
}

/// State handed to callbacks after each round.
#[derive(Debug)]
pub struct CvEnv<'a> {
    /// Zero-based round that just finished
    pub iteration: IterationIndex,
    /// Round limit of the run
    pub end_iteration: usize,
    pub folds: &'a [CvFold],
    /// `(name, mean, std)` for every `train-`/`test-` metric of this round
    pub evaluation: &'a [(String, f64, f64)],
}

/// Hook run after every cross-validation round.
pub trait CvCallback {
    /// Called once the round's evaluation is aggregated. Returning `true`
    /// stops training after this round.
    fn after_iteration(&mut self, env: &CvEnv<'_>) -> Result<bool>;
}

/// Held-out predictions and labels of every fold for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OofRound {
    /// One `(fold_test_rows, columns)` prediction matrix per fold
    pub cv_preds: Vec<Array2<Score>>,
    /// One label vector per fold
    pub cv_trues: Vec<Array1<Label>>,
}

/// Out-of-fold predictions of one round together with the rows they
/// belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutOfFold {
    /// Zero-based round the predictions were taken after
    pub iteration: IterationIndex,
    pub round: OofRound,
    /// Held-out row indices of each fold, aligned with `round`
    pub cv_index: Vec<Vec<usize>>,
}

impl OutOfFold {
    pub fn num_folds(&self) -> usize {
        self.round.cv_preds.len()
    }

    /// Scatter the per-fold predictions back into training row order.
    pub fn assemble(&self, num_data: usize) -> Result<Array2<Score>> {
        let columns = self.round.cv_preds.first().map_or(1, |p| p.ncols());
        let mut out = Array2::from_elem((num_data, columns), Score::NAN);
        for (preds, rows) in self.round.cv_preds.iter().zip(&self.cv_index) {
            if preds.nrows() != rows.len() {
                return Err(BoostError::dimension_mismatch(
                    format!("{} held-out rows", rows.len()),
                    format!("{} predictions", preds.nrows()),
                ));
            }
            for (i, &row) in rows.iter().enumerate() {
                if row >= num_data {
                    return Err(BoostError::dataset(format!(
                        "held-out row {} out of bounds for {} rows",
                        row, num_data
                    )));
                }
                out.row_mut(row).assign(&preds.row(i));
            }
        }
        Ok(out)
    }
}

/// Every round's out-of-fold record, in round order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OofHistory {
    pub cv_index: Vec<Vec<usize>>,
    pub cv: Vec<OofRound>,
}

impl OofHistory {
    pub fn len(&self) -> usize {
        self.cv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cv.is_empty()
    }

    /// Take the record of `iteration`, dropping the rest.
    pub fn into_round(mut self, iteration: IterationIndex) -> Option<OutOfFold> {
        if iteration >= self.cv.len() {
            return None;
        }
        let round = self.cv.swap_remove(iteration);
        Some(OutOfFold {
            iteration,
            round,
            cv_index: self.cv_index,
        })
    }
}

/// Callback collecting the held-out predictions of every fold each round.
#[derive(Debug, Default)]
pub struct OofRecorder {
    history: OofHistory,
}

impl OofRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &OofHistory {
        &self.history
    }

    pub fn into_history(self) -> OofHistory {
        self.history
    }
}

impl CvCallback for OofRecorder {
    fn after_iteration(&mut self, env: &CvEnv<'_>) -> Result<bool> {
        if self.history.cv_index.is_empty() {
            self.history.cv_index = env.folds.iter().map(|f| f.test_index.clone()).collect();
        }
        let (cv_preds, cv_trues) = env
            .folds
            .iter()
            .map(|fold| (fold.predict_test(), fold.dtest.labels().to_owned()))
            .unzip();
        self.history.cv.push(OofRound { cv_preds, cv_trues });
        Ok(false)
    }
}

/// One named column of the result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Per-round aggregated metrics of a cross-validation run.
///
/// Columns are `train-<metric>-mean`, `train-<metric>-std`,
/// `test-<metric>-mean` and `test-<metric>-std`, one row per kept round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvResult {
    columns: Vec<CvColumn>,
    /// Set when early stopping fired; the table then ends at this round.
    pub best_iteration: Option<IterationIndex>,
    /// Test score of `best_iteration`
    pub best_score: Option<f64>,
}

impl CvResult {
    /// Number of rounds in the table.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Value of `name` in the last kept round.
    pub fn last(&self, name: &str) -> Option<f64> {
        self.column(name).and_then(|values| values.last().copied())
    }

    fn push_row(&mut self, evaluation: &[(String, f64, f64)]) {
        for (name, mean, std) in evaluation {
            for (suffix, value) in [("mean", *mean), ("std", *std)] {
                let column_name = format!("{}-{}", name, suffix);
                match self.columns.iter_mut().find(|c| c.name == column_name) {
                    Some(column) => column.values.push(value),
                    None => self.columns.push(CvColumn {
                        name: column_name,
                        values: vec![value],
                    }),
                }
            }
        }
    }

    fn truncate(&mut self, rows: usize) {
        for column in &mut self.columns {
            column.values.truncate(rows);
        }
    }

    /// Serialize the table as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Mean and population standard deviation of `(name, value)` lists that
/// share the same names in the same order.
fn aggregate(per_fold: &[Vec<(String, f64)>]) -> Result<Vec<(String, f64, f64)>> {
    let first = per_fold
        .first()
        .ok_or_else(|| BoostError::cross_validation("no folds to aggregate"))?;
    let n = per_fold.len() as f64;

    first
        .iter()
        .enumerate()
        .map(|(i, (name, _))| {
            let values = per_fold
                .iter()
                .map(|fold| {
                    fold.get(i).map(|(_, v)| *v).ok_or_else(|| {
                        BoostError::internal(format!("fold is missing metric {}", name))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            let mean = values.iter().sum::<f64>() / n;
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            Ok((name.clone(), mean, var.sqrt()))
        })
        .collect()
}

fn format_evaluation(iteration: IterationIndex, evaluation: &[(String, f64, f64)]) -> String {
    let mut line = format!("[{}]", iteration);
    for (name, mean, std) in evaluation {
        line.push_str(&format!("\t{}:{:.5}+{:.5}", name, mean, std));
    }
    line
}

/// Cross-validate the booster described by `params` on `dtrain`.
pub fn cross_validate(
    params: &Hyperparameters,
    dtrain: &Dataset,
    options: &CvOptions,
    callbacks: &mut [&mut dyn CvCallback],
) -> Result<CvResult> {
    let config = Config::from_params(params)?;
    cross_validate_with_config(&config, dtrain, options, callbacks)
}

/// Cross-validate with an already parsed configuration.
pub fn cross_validate_with_config(
    config: &Config,
    dtrain: &Dataset,
    options: &CvOptions,
    callbacks: &mut [&mut dyn CvCallback],
) -> Result<CvResult> {
    let indices = make_folds(
        dtrain,
        options.nfold,
        options.stratified,
        options.shuffle,
        options.seed,
    )?;

    let pool = build_pool(config.nthread)?;
    log::info!(
        "Cross-validating {} booster: {} folds, up to {} rounds on {} threads",
        config.booster,
        options.nfold,
        options.num_boost_round,
        pool.current_num_threads()
    );

    let mut folds = pool.install(|| {
        indices
            .into_par_iter()
            .map(|fold| CvFold::new(config, dtrain, fold))
            .collect::<Result<Vec<_>>>()
    })?;

    // Zero patience disables early stopping.
    let patience = options.early_stopping_rounds.filter(|&rounds| rounds > 0);
    let mut monitor = match (patience, folds.first()) {
        (Some(patience), Some(fold)) => {
            let metric = fold.booster().metrics().last().copied().ok_or_else(|| {
                BoostError::cross_validation("early stopping needs an evaluation metric")
            })?;
            let maximize = options.maximize.unwrap_or_else(|| metric.is_maximize());
            log::debug!(
                "Early stopping on test-{} ({}), patience {}",
                metric,
                if maximize { "maximize" } else { "minimize" },
                patience
            );
            Some(EarlyStopping::new(EarlyStoppingConfig::new(patience, !maximize)))
        }
        _ => None,
    };

    let mut result = CvResult::default();
    for iteration in 0..options.num_boost_round {
        let per_fold = pool.install(|| {
            folds
                .par_iter_mut()
                .try_for_each(|fold| fold.update(iteration))?;
            folds
                .par_iter()
                .map(CvFold::eval)
                .collect::<Result<Vec<_>>>()
        })?;
        let evaluation = aggregate(&per_fold)?;
        result.push_row(&evaluation);

        let verbose = !config.silent
            && options
                .verbose_eval
                .filter(|&period| period > 0)
                .map_or(false, |period| iteration % period == 0);
        if verbose {
            log::info!("{}", format_evaluation(iteration, &evaluation));
        } else {
            log::debug!("{}", format_evaluation(iteration, &evaluation));
        }

        let env = CvEnv {
            iteration,
            end_iteration: options.num_boost_round,
            folds: &folds,
            evaluation: &evaluation,
        };
        let mut stop = false;
        for callback in callbacks.iter_mut() {
            stop |= callback.after_iteration(&env)?;
        }
        if stop {
            log::info!("Stopped by callback at iteration {}", iteration);
            break;
        }

        if let Some(monitor) = monitor.as_mut() {
            let score = evaluation
                .iter()
                .rev()
                .find(|(name, _, _)| name.starts_with("test-"))
                .map(|(_, mean, _)| *mean)
                .ok_or_else(|| BoostError::internal("missing test metric"))?;
            if monitor.update(score, iteration) {
                let best = monitor.best_iteration();
                result.truncate(best + 1);
                result.best_iteration = Some(best);
                result.best_score = Some(monitor.best_score());
                break;
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use proptest::prelude::*;

    fn regression_data(n: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| ((i * 7 + j * 3) % 11) as f32);
        let y = Array1::from_shape_fn(n, |i| ((i * 7) % 11) as f32 * 0.5);
        Dataset::new(x, y, None, None).unwrap()
    }

    #[test]
    fn test_fold_sizes_follow_array_split() {
        let data = regression_data(10);
        let folds = make_folds(&data, 3, false, false, 0).unwrap();
        let sizes: Vec<usize> = folds.iter().map(|f| f.test_index.len()).collect();
        assert_eq!(sizes, vec![4, 3, 3]);
        assert_eq!(folds[0].test_index, vec![0, 1, 2, 3]);
        assert_eq!(folds[0].train_index.len(), 6);
    }

    #[test]
    fn test_degenerate_folds_are_rejected() {
        let data = regression_data(4);
        assert!(make_folds(&data, 1, false, true, 0).is_err());
        assert!(make_folds(&data, 5, false, true, 0).is_err());
    }

    #[test]
    fn test_stratified_folds_balance_classes() {
        let x = Array2::zeros((12, 1));
        let y = Array1::from_shape_fn(12, |i| if i < 6 { 0.0 } else { 1.0 });
        let data = Dataset::new(x, y, None, None).unwrap();

        for fold in make_folds(&data, 3, true, true, 42).unwrap() {
            let positives = fold.test_index.iter().filter(|&&r| r >= 6).count();
            assert_eq!(fold.test_index.len(), 4);
            assert_eq!(positives, 2);
        }
    }

    #[test]
    fn test_cross_validate_table_shape() {
        let data = regression_data(30);
        let options = CvOptions::new().with_nfold(3).with_num_boost_round(4);
        let result = cross_validate(&Hyperparameters::new(), &data, &options, &mut []).unwrap();

        assert_eq!(result.len(), 4);
        let names: Vec<&str> = result.columns().collect();
        assert_eq!(
            names,
            vec![
                "train-rmse-mean",
                "train-rmse-std",
                "test-rmse-mean",
                "test-rmse-std"
            ]
        );
        assert!(result.best_iteration.is_none());
        let train = result.column("train-rmse-mean").unwrap();
        assert!(train[3] < train[0]);
    }

    #[test]
    fn test_oof_recorder_collects_every_round() {
        let data = regression_data(20);
        let options = CvOptions::new().with_nfold(4).with_num_boost_round(3);
        let mut recorder = OofRecorder::new();
        cross_validate(
            &Hyperparameters::new(),
            &data,
            &options,
            &mut [&mut recorder],
        )
        .unwrap();

        let history = recorder.into_history();
        assert_eq!(history.len(), 3);
        let oof = history.into_round(2).unwrap();
        assert_eq!(oof.num_folds(), 4);
        let assembled = oof.assemble(20).unwrap();
        assert!(assembled.iter().all(|v| v.is_finite()));
    }

    struct StopAt(usize);

    impl CvCallback for StopAt {
        fn after_iteration(&mut self, env: &CvEnv<'_>) -> Result<bool> {
            Ok(env.iteration + 1 >= self.0)
        }
    }

    #[test]
    fn test_callback_can_stop_training() {
        let data = regression_data(20);
        let options = CvOptions::new().with_num_boost_round(50);
        let mut stop = StopAt(2);
        let result =
            cross_validate(&Hyperparameters::new(), &data, &options, &mut [&mut stop]).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_zero_verbose_period_logs_nothing() {
        let data = regression_data(30);
        let options: CvOptions = serde_json::from_str(
            r#"{"nfold":3,"num_boost_round":3,"early_stopping_rounds":null,
                "stratified":false,"shuffle":true,"seed":0,"maximize":null,
                "verbose_eval":0}"#,
        )
        .unwrap();
        assert_eq!(options.verbose_eval, Some(0));

        let mut params = Hyperparameters::new();
        params.insert("silent".into(), ParamValue::from(0i64));
        let result = cross_validate(&params, &data, &options, &mut []).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_zero_patience_runs_every_round() {
        let data = regression_data(30);
        let options = CvOptions::new()
            .with_nfold(3)
            .with_num_boost_round(6)
            .with_early_stopping_rounds(0);
        let result = cross_validate(&Hyperparameters::new(), &data, &options, &mut []).unwrap();
        assert_eq!(result.len(), 6);
        assert!(result.best_iteration.is_none());
    }

    #[test]
    fn test_aggregate_uses_population_std() {
        let per_fold = vec![
            vec![("test-rmse".to_string(), 1.0)],
            vec![("test-rmse".to_string(), 3.0)],
        ];
        let agg = aggregate(&per_fold).unwrap();
        assert_eq!(agg, vec![("test-rmse".to_string(), 2.0, 1.0)]);
    }

    proptest! {
        #[test]
        fn test_folds_partition_rows(n in 2usize..60, nfold in 2usize..8, seed in any::<u64>()) {
            prop_assume!(nfold <= n);
            let data = regression_data(n);
            let folds = make_folds(&data, nfold, false, true, seed).unwrap();

            let mut seen = vec![0usize; n];
            for fold in &folds {
                prop_assert_eq!(fold.train_index.len() + fold.test_index.len(), n);
                for &row in &fold.test_index {
                    seen[row] += 1;
                }
            }
            prop_assert!(seen.iter().all(|&count| count == 1));
        }
    }
}
