//! Fitness adapter integration tests.

use approx::assert_relative_eq;
use boostfit::*;
use ndarray::{Array1, Array2};
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;
use tempfile::TempDir;

mod common;
use common::*;

#[test]
fn test_regression_fitness_is_finite() {
    let (features, labels) = create_test_data!(regression, 150, 4);
    let mut model = small_fitness(features, labels, small_hyperparameters())
        .build()
        .unwrap();

    let fitness = model.cross_validate().unwrap();
    assert!(fitness.is_finite());
    assert!(fitness >= 0.0);

    let result = model.cv_result().unwrap();
    assert_eq!(result.last("test-rmse-mean"), Some(fitness));
    assert_eq!(model.best_ntree_limit(), Some(result.len()));
}

#[test]
fn test_oof_covers_every_row_once() {
    let (features, labels) = create_test_data!(regression, 101, 3);
    let mut model = small_fitness(features, labels.clone(), small_hyperparameters())
        .with_kfold(4)
        .build()
        .unwrap();
    model.cross_validate().unwrap();

    let oof = model.oof().unwrap();
    assert_eq!(oof.num_folds(), 4);
    assert_eq!(oof.iteration + 1, model.best_ntree_limit().unwrap());

    let mut rows: Vec<usize> = oof.cv_index.iter().flatten().copied().collect();
    rows.sort_unstable();
    assert_eq!(rows, (0..101).collect::<Vec<_>>());

    for ((preds, trues), index) in oof
        .round
        .cv_preds
        .iter()
        .zip(&oof.round.cv_trues)
        .zip(&oof.cv_index)
    {
        assert_eq!(preds.nrows(), index.len());
        for (truth, &row) in trues.iter().zip(index) {
            assert_eq!(*truth, labels[row]);
        }
    }

    let assembled = oof.assemble(101).unwrap();
    assert_eq!(assembled.dim(), (101, 1));
    assert!(assembled.iter().all(|p| p.is_finite()));
}

#[test]
fn test_early_stopping_keeps_best_round() {
    let mut rng = StdRng::seed_from_u64(7);
    let features = Array2::from_shape_fn((120, 3), |_| rng.gen_range(-1.0f32..1.0));
    // Labels unrelated to the features: held-out error soon gets worse.
    let labels = Array1::from_shape_fn(120, |_| rng.gen_range(-1.0f32..1.0));

    let mut hp = Hyperparameters::new();
    hp.insert("eta".into(), 1.0.into());
    hp.insert("max_depth".into(), 6.into());

    let mut model = BoosterFitness::builder(features, labels)
        .with_hyperparameters(hp)
        .with_kfold(3)
        .with_num_boost_round(300)
        .with_early_stopping_rounds(5)
        .build()
        .unwrap();
    let fitness = model.cross_validate().unwrap();

    let result = model.cv_result().unwrap();
    let best = result.best_iteration.unwrap();
    assert_eq!(result.len(), best + 1);
    assert_eq!(model.best_ntree_limit(), Some(best + 1));
    assert_eq!(model.oof().unwrap().iteration, best);

    let means = result.column("test-rmse-mean").unwrap();
    let min = means.iter().cloned().fold(f64::INFINITY, f64::min);
    assert_relative_eq!(fitness, min);
    assert_eq!(result.best_score, Some(fitness));
}

#[test]
fn test_without_early_stopping_all_rounds_are_kept() {
    let (features, labels) = create_test_data!(regression, 60, 3);
    let mut model = small_fitness(features, labels, small_hyperparameters())
        .with_num_boost_round(8)
        .with_early_stopping_rounds(0)
        .build()
        .unwrap();
    model.cross_validate().unwrap();

    assert_eq!(model.best_ntree_limit(), Some(8));
    assert_eq!(model.oof().unwrap().iteration, 7);
    assert!(model.cv_result().unwrap().best_iteration.is_none());
}

#[test]
fn test_binary_auc_fitness() {
    let (features, labels) = create_test_data!(binary, 200, 4);
    let mut model = small_fitness(features, labels, small_hyperparameters())
        .with_objective("binary:logistic")
        .with_eval_metric("auc")
        .with_stratified(true)
        .build()
        .unwrap();

    let auc = model.cross_validate().unwrap();
    assert!(auc > 0.7 && auc <= 1.0, "auc = {}", auc);

    let oof = model.oof().unwrap().assemble(200).unwrap();
    assert!(oof.iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn test_multiclass_oof_has_one_column_per_class() {
    let (features, labels) = create_test_data!(multiclass, 150, 3, 3);
    let mut model = small_fitness(features, labels, small_hyperparameters())
        .with_objective("multi:softprob")
        .with_eval_metric("mlogloss")
        .with_num_class(3)
        .build()
        .unwrap();

    let mlogloss = model.cross_validate().unwrap();
    assert!(mlogloss.is_finite() && mlogloss > 0.0);

    let oof = model.oof().unwrap().assemble(150).unwrap();
    assert_eq!(oof.ncols(), 3);
    for row in oof.rows() {
        assert_relative_eq!(row.sum(), 1.0, epsilon = 1e-4);
    }
}

#[test]
fn test_linear_booster() {
    let (features, labels) = create_test_data!(regression, 120, 3);
    let mut hp = Hyperparameters::new();
    hp.insert("booster".into(), "gblinear".into());
    hp.insert("eta".into(), 0.5.into());
    hp.insert("lambda".into(), 0.0.into());

    let mut model = small_fitness(features, labels, hp)
        .with_num_boost_round(50)
        .build()
        .unwrap();

    // Labels are linear in the features up to small noise.
    let rmse = model.cross_validate().unwrap();
    assert!(rmse < 0.5, "rmse = {}", rmse);
}

#[test]
fn test_weights_and_missing_values() {
    let (features, labels) = create_test_data!(regression, 120, 4);
    let features = with_missing_values(features, 0.2);
    let weights = create_test_weights(120);

    let mut model = small_fitness(features, labels, small_hyperparameters())
        .with_weights(weights)
        .build()
        .unwrap();
    assert!(model.cross_validate().unwrap().is_finite());
}

#[test]
fn test_missing_sentinel() {
    let (features, labels) = create_test_data!(regression, 90, 3);
    let with_nan = with_missing_values(features, 0.1);
    let with_sentinel = with_nan.mapv(|x| if x.is_nan() { -999.0 } else { x });

    let mut nan_model = small_fitness(with_nan, labels.clone(), small_hyperparameters())
        .build()
        .unwrap();
    let mut sentinel_model = small_fitness(with_sentinel, labels, small_hyperparameters())
        .with_missing(-999.0)
        .build()
        .unwrap();

    assert_relative_eq!(
        nan_model.cross_validate().unwrap(),
        sentinel_model.cross_validate().unwrap()
    );
}

#[test]
fn test_repeated_calls_are_reproducible() {
    let (features, labels) = create_test_data!(regression, 80, 3);
    let mut hp = small_hyperparameters();
    hp.insert("subsample".into(), 0.8.into());
    hp.insert("colsample_bytree".into(), 0.7.into());

    let mut model = small_fitness(features, labels, hp).build().unwrap();
    let first = model.cross_validate().unwrap();
    let first_limit = model.best_ntree_limit();
    let second = model.cross_validate().unwrap();

    assert_relative_eq!(first, second);
    assert_eq!(first_limit, model.best_ntree_limit());
}

#[test]
fn test_fitness_model_trait_object() {
    let (features, labels) = create_test_data!(regression, 60, 2);
    let mut model = small_fitness(features, labels, small_hyperparameters())
        .build()
        .unwrap();

    let model: &mut dyn FitnessModel = &mut model;
    assert_eq!(model.x_train().dim(), (60, 2));
    assert_eq!(model.y_train().len(), 60);
    assert!(model.cross_validate().unwrap().is_finite());
}

#[test]
fn test_invalid_hyperparameters_are_errors() {
    let (features, labels) = create_test_data!(regression, 60, 2);

    let mut hp = Hyperparameters::new();
    hp.insert("booster".into(), "dart".into());
    let mut model = small_fitness(features.clone(), labels.clone(), hp)
        .build()
        .unwrap();
    let err = model.cross_validate().unwrap_err();
    assert_eq!(err.category(), "invalid_parameter");
    assert!(model.oof().is_none());

    let mut hp = Hyperparameters::new();
    hp.insert("eta".into(), (-0.5).into());
    let mut model = small_fitness(features.clone(), labels.clone(), hp)
        .build()
        .unwrap();
    assert!(model.cross_validate().is_err());

    let mut hp = Hyperparameters::new();
    hp.insert("eval_metric".into(), "not-a-metric".into());
    let mut model = small_fitness(features, labels, hp).build().unwrap();
    assert!(model.cross_validate().is_err());
}

#[test]
fn test_shape_mismatch_and_degenerate_folds() {
    let (features, labels) = create_test_data!(regression, 60, 2);

    let mut model = BoosterFitness::new(
        features.clone(),
        labels.slice(ndarray::s![..50]).to_owned(),
        Hyperparameters::new(),
    )
    .unwrap();
    assert_eq!(
        model.cross_validate().unwrap_err().category(),
        "dimension_mismatch"
    );

    let mut model = small_fitness(features, labels, Hyperparameters::new())
        .with_kfold(61)
        .build()
        .unwrap();
    assert!(model.cross_validate().is_err());
    assert!(model.best_ntree_limit().is_none());
}

#[test]
fn test_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fitness.toml");

    let mut config = FitnessConfig {
        kfold: 3,
        num_boost_round: 10,
        early_stopping_rounds: 3,
        nthread: 2,
        ..FitnessConfig::default()
    };
    config.hyperparameters = small_hyperparameters();
    config.save_to_file(&path).unwrap();

    let loaded = FitnessConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);

    let (features, labels) = create_test_data!(regression, 60, 3);
    let mut model = BoosterFitness::from_config(features, labels, loaded).unwrap();
    assert_eq!(model.kfold(), 3);
    assert_eq!(model.params()["max_depth"], ParamValue::from(3));
    model.cross_validate().unwrap();
    assert_eq!(model.oof().unwrap().num_folds(), 3);
    assert!(model.best_ntree_limit().unwrap() <= 10);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_nthread_never_exceeds_hardware(requested in 0usize..100_000) {
        let features = Array2::<f32>::zeros((4, 1));
        let labels = Array1::<f32>::zeros(4);

        let mut hp = Hyperparameters::new();
        hp.insert("nthread".into(), requested.into());
        let model = BoosterFitness::builder(features, labels)
            .with_nthread(requested)
            .with_hyperparameters(hp)
            .build()
            .unwrap();

        let cpus = num_cpus::get();
        prop_assert!(model.nthread() >= 1 && model.nthread() <= cpus);
        let merged = model.params()["nthread"].as_usize().unwrap();
        prop_assert!(merged >= 1 && merged <= cpus);
    }
}
