use boostfit::{BoosterFitness, Hyperparameters};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use rand::prelude::*;

const NUM_FEATURES: usize = 8;

fn regression_data(rows: usize) -> (Array2<f32>, Array1<f32>) {
    let mut rng = StdRng::seed_from_u64(42);
    let x = Array2::from_shape_fn((rows, NUM_FEATURES), |_| rng.gen_range(-1.0f32..1.0));
    let y = x
        .rows()
        .into_iter()
        .map(|row| row[0] * 2.0 - row[1] + row[2] * row[3] + rng.gen_range(-0.1f32..0.1))
        .collect();
    (x, y)
}

fn candidate(booster: &str) -> Hyperparameters {
    let mut params = Hyperparameters::new();
    params.insert("booster".into(), booster.into());
    params.insert("eta".into(), 0.3.into());
    params.insert("max_depth".into(), 4.into());
    params.insert("subsample".into(), 0.8.into());
    params
}

fn bench_cross_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("cross_validate");
    group.sample_size(10);

    for &rows in &[500usize, 2_000] {
        let (x, y) = regression_data(rows);
        for booster in ["gbtree", "gblinear"] {
            group.bench_with_input(BenchmarkId::new(booster, rows), &rows, |b, _| {
                b.iter(|| {
                    let mut model = BoosterFitness::builder(x.clone(), y.clone())
                        .with_hyperparameters(candidate(booster))
                        .with_num_boost_round(50)
                        .with_early_stopping_rounds(10)
                        .build()
                        .expect("valid options");
                    black_box(model.cross_validate().expect("cross-validation"))
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_cross_validate);
criterion_main!(benches);
