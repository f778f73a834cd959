//! Evaluation metrics.
//!
//! Every metric is a weighted average over rows and consumes predictions
//! laid out as `(num_data, columns)`: one column for regression and binary
//! probabilities, `num_class` columns of probabilities for multiclass.
//!
//! ```rust
//! use boostfit::metrics::evaluate;
//! use boostfit::MetricType;
//! use ndarray::array;
//!
//! let preds = array![[1.0f32], [2.0], [3.0]];
//! let labels = array![1.0f32, 2.0, 5.0];
//! let rmse = evaluate(MetricType::Rmse, &preds.view(), &labels.view(), None)?;
//! assert!((rmse - (4.0f64 / 3.0).sqrt()).abs() < 1e-9);
//! # Ok::<(), boostfit::BoostError>(())
//! ```

pub mod classification;
pub mod regression;

use crate::core::error::{BoostError, Result};
use crate::core::types::*;
use ndarray::{ArrayView1, ArrayView2};

/// Evaluate one metric.
pub fn evaluate(
    metric: MetricType,
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    if preds.nrows() != labels.len() {
        return Err(BoostError::dimension_mismatch(
            format!("{} prediction rows", labels.len()),
            format!("{} prediction rows", preds.nrows()),
        ));
    }

    let value = match metric {
        MetricType::Rmse => regression::rmse(preds, labels, weights)?,
        MetricType::Mae => regression::mae(preds, labels, weights)?,
        MetricType::PoissonNLogLik => regression::poisson_nloglik(preds, labels, weights)?,
        MetricType::LogLoss => classification::logloss(preds, labels, weights)?,
        MetricType::Error => classification::error(preds, labels, weights)?,
        MetricType::Auc => classification::auc(preds, labels, weights)?,
        MetricType::MultiLogLoss => classification::mlogloss(preds, labels, weights)?,
        MetricType::MultiError => classification::merror(preds, labels, weights)?,
    };

    if value.is_nan() {
        return Err(BoostError::numerical(format!("{} evaluated to NaN", metric)));
    }
    Ok(value)
}

/// Weighted mean of `loss(row)` over all rows.
pub(crate) fn weighted_mean<F>(
    num_data: usize,
    weights: Option<&ArrayView1<'_, Label>>,
    mut loss: F,
) -> Result<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut sum = 0.0;
    let mut wsum = 0.0;
    for i in 0..num_data {
        let w = weights.map_or(1.0, |w| w[i] as f64);
        sum += w * loss(i);
        wsum += w;
    }
    if wsum <= 0.0 {
        return Err(BoostError::numerical("sum of sample weights is zero"));
    }
    Ok(sum / wsum)
}

fn expect_columns(preds: &ArrayView2<'_, Score>, expected: usize, metric: &str) -> Result<()> {
    if preds.ncols() != expected {
        return Err(BoostError::dimension_mismatch(
            format!("{} prediction column(s) for {}", expected, metric),
            format!("{} column(s)", preds.ncols()),
        ));
    }
    Ok(())
}
