//! Regression metrics.

use super::{expect_columns, weighted_mean};
use crate::core::constants::PROB_EPSILON;
use crate::core::error::Result;
use crate::core::types::*;
use ndarray::{ArrayView1, ArrayView2};

/// Root mean squared error.
pub fn rmse(
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    expect_columns(preds, 1, "rmse")?;
    let mse = weighted_mean(labels.len(), weights, |i| {
        let diff = preds[[i, 0]] as f64 - labels[i] as f64;
        diff * diff
    })?;
    Ok(mse.sqrt())
}

/// Mean absolute error.
pub fn mae(
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    expect_columns(preds, 1, "mae")?;
    weighted_mean(labels.len(), weights, |i| {
        (preds[[i, 0]] as f64 - labels[i] as f64).abs()
    })
}

/// Poisson negative log-likelihood; `preds` are expected counts.
pub fn poisson_nloglik(
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    expect_columns(preds, 1, "poisson-nloglik")?;
    weighted_mean(labels.len(), weights, |i| {
        let p = (preds[[i, 0]] as f64).max(PROB_EPSILON);
        let y = labels[i] as f64;
        ln_gamma(y + 1.0) + p - y * p.ln()
    })
}

/// Natural log of the gamma function (Lanczos approximation, g = 7).
pub(crate) fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (k, &c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + k as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_rmse_and_mae() {
        let preds = array![[1.0f32], [2.0], [4.0]];
        let labels = array![1.0f32, 3.0, 2.0];

        let r = rmse(&preds.view(), &labels.view(), None).unwrap();
        assert_relative_eq!(r, (5.0f64 / 3.0).sqrt(), epsilon = 1e-9);

        let m = mae(&preds.view(), &labels.view(), None).unwrap();
        assert_relative_eq!(m, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_weighted_rmse() {
        let preds = array![[0.0f32], [0.0]];
        let labels = array![1.0f32, 3.0];
        let weights = array![3.0f32, 1.0];

        let r = rmse(&preds.view(), &labels.view(), Some(&weights.view())).unwrap();
        assert_relative_eq!(r, (12.0f64 / 4.0).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_zero_weights_error() {
        let preds = array![[0.0f32]];
        let labels = array![1.0f32];
        let weights = array![0.0f32];
        assert!(rmse(&preds.view(), &labels.view(), Some(&weights.view())).is_err());
    }

    #[test]
    fn test_ln_gamma() {
        assert_relative_eq!(ln_gamma(1.0), 0.0, epsilon = 1e-10);
        assert_relative_eq!(ln_gamma(2.0), 0.0, epsilon = 1e-10);
        assert_relative_eq!(ln_gamma(5.0), 24.0f64.ln(), epsilon = 1e-10);
        assert_relative_eq!(ln_gamma(0.5), std::f64::consts::PI.sqrt().ln(), epsilon = 1e-10);
    }

    #[test]
    fn test_poisson_nloglik() {
        let preds = array![[2.0f32]];
        let labels = array![1.0f32];
        let v = poisson_nloglik(&preds.view(), &labels.view(), None).unwrap();
        assert_relative_eq!(v, 2.0 - 2.0f64.ln(), epsilon = 1e-6);
    }
}
