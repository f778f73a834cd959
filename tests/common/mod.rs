//! Common test utilities for boostfit integration tests.

#![allow(dead_code)]

use boostfit::*;
use ndarray::{Array1, Array2};
use rand::prelude::*;
use std::fs;
use std::path::Path;

/// Create test features for regression tasks
pub fn create_test_features_regression(num_samples: usize, num_features: usize) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(42);
    Array2::from_shape_fn((num_samples, num_features), |_| rng.gen_range(-5.0..5.0))
}

/// Create test labels for regression based on features
pub fn create_test_labels_regression(features: &Array2<f32>) -> Array1<f32> {
    let mut rng = StdRng::seed_from_u64(43);
    features
        .rows()
        .into_iter()
        .map(|row| {
            let linear: f32 = row
                .iter()
                .enumerate()
                .map(|(j, x)| x * (j + 1) as f32 * 0.5)
                .sum();
            linear + rng.gen_range(-0.1..0.1)
        })
        .collect()
}

/// Create test features for binary classification
pub fn create_test_features_binary(num_samples: usize, num_features: usize) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(123);
    Array2::from_shape_fn((num_samples, num_features), |_| rng.gen_range(-3.0..3.0))
}

/// Create test labels for binary classification
pub fn create_test_labels_binary(features: &Array2<f32>) -> Array1<f32> {
    features
        .rows()
        .into_iter()
        .map(|row| {
            let score: f32 = row
                .iter()
                .enumerate()
                .map(|(j, x)| if j % 2 == 0 { *x } else { -x })
                .sum();
            if score > 0.0 {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Create test features for multiclass classification
pub fn create_test_features_multiclass(num_samples: usize, num_features: usize) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(456);
    Array2::from_shape_fn((num_samples, num_features), |_| rng.gen_range(-2.0..2.0))
}

/// Create test labels for multiclass classification: the class is decided
/// by which third of the range the first feature falls in.
pub fn create_test_labels_multiclass(features: &Array2<f32>, num_classes: usize) -> Array1<f32> {
    features
        .column(0)
        .iter()
        .map(|x| {
            let bucket = ((x + 2.0) / 4.0 * num_classes as f32) as usize;
            bucket.min(num_classes - 1) as f32
        })
        .collect()
}

/// Create test weights
pub fn create_test_weights(num_samples: usize) -> Array1<f32> {
    let mut rng = StdRng::seed_from_u64(789);
    Array1::from_shape_fn(num_samples, |_| rng.gen_range(0.1..2.0))
}

/// Replace a share of the entries with NaN
pub fn with_missing_values(mut features: Array2<f32>, missing_rate: f32) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(999);
    features.mapv_inplace(|x| {
        if rng.gen::<f32>() < missing_rate {
            f32::NAN
        } else {
            x
        }
    });
    features
}

/// Create test CSV file with the label in the last column
pub fn create_test_csv<P: AsRef<Path>>(
    path: P,
    features: &Array2<f32>,
    labels: &Array1<f32>,
) -> std::io::Result<()> {
    let mut content = String::new();
    let header: Vec<String> = (0..features.ncols())
        .map(|i| format!("feature_{}", i))
        .collect();
    content.push_str(&header.join(","));
    content.push_str(",target\n");

    for (row, label) in features.rows().into_iter().zip(labels.iter()) {
        let values: Vec<String> = row
            .iter()
            .map(|x| if x.is_nan() { String::new() } else { x.to_string() })
            .collect();
        content.push_str(&values.join(","));
        content.push(',');
        content.push_str(&label.to_string());
        content.push('\n');
    }

    fs::write(path, content)
}

/// Hyperparameters for quick tests
pub fn small_hyperparameters() -> Hyperparameters {
    let mut params = Hyperparameters::new();
    params.insert("eta".into(), 0.3.into());
    params.insert("max_depth".into(), 3.into());
    params
}

/// Fitness adapter with a small round budget
pub fn small_fitness(
    features: Array2<f32>,
    labels: Array1<f32>,
    hyperparameters: Hyperparameters,
) -> BoosterFitnessBuilder {
    BoosterFitness::builder(features, labels)
        .with_hyperparameters(hyperparameters)
        .with_kfold(3)
        .with_num_boost_round(30)
        .with_early_stopping_rounds(5)
        .with_nthread(2)
}

/// Macro for creating test data more easily
#[macro_export]
macro_rules! create_test_data {
    (regression, $samples:expr, $features:expr) => {{
        let features = common::create_test_features_regression($samples, $features);
        let labels = common::create_test_labels_regression(&features);
        (features, labels)
    }};

    (binary, $samples:expr, $features:expr) => {{
        let features = common::create_test_features_binary($samples, $features);
        let labels = common::create_test_labels_binary(&features);
        (features, labels)
    }};

    (multiclass, $samples:expr, $features:expr, $classes:expr) => {{
        let features = common::create_test_features_multiclass($samples, $features);
        let labels = common::create_test_labels_multiclass(&features, $classes);
        (features, labels)
    }};
}
