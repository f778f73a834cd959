//! Classification metrics.
//!
//! Binary metrics read probabilities from a single column and accept soft
//! labels in `[0, 1]`. Multiclass metrics read one probability column per
//! class and need integral labels.

use super::{expect_columns, weighted_mean};
use crate::core::constants::PROB_EPSILON;
use crate::core::error::{BoostError, Result};
use crate::core::types::*;
use ndarray::{ArrayView1, ArrayView2};
use std::cmp::Ordering;

/// Binary negative log-likelihood.
pub fn logloss(
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    expect_columns(preds, 1, "logloss")?;
    weighted_mean(labels.len(), weights, |i| {
        let p = (preds[[i, 0]] as f64).clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
        let y = labels[i] as f64;
        -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
    })
}

/// Binary error rate with a 0.5 threshold.
pub fn error(
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    expect_columns(preds, 1, "error")?;
    weighted_mean(labels.len(), weights, |i| {
        let y = labels[i] as f64;
        if preds[[i, 0]] > 0.5 {
            1.0 - y
        } else {
            y
        }
    })
}

/// Weighted area under the ROC curve. Tied predictions share credit.
///
/// Fails when the rows contain only one class, which happens for degenerate
/// folds.
pub fn auc(
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    expect_columns(preds, 1, "auc")?;

    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| {
        preds[[b, 0]]
            .partial_cmp(&preds[[a, 0]])
            .unwrap_or(Ordering::Equal)
    });

    let mut area = 0.0;
    let mut total_pos = 0.0;
    let mut total_neg = 0.0;
    let mut start = 0;
    while start < order.len() {
        let score = preds[[order[start], 0]];
        let mut group_pos = 0.0;
        let mut group_neg = 0.0;
        let mut end = start;
        while end < order.len() && preds[[order[end], 0]] == score {
            let row = order[end];
            let w = weights.map_or(1.0, |w| w[row] as f64);
            let y = labels[row] as f64;
            group_pos += w * y;
            group_neg += w * (1.0 - y);
            end += 1;
        }
        area += group_neg * (total_pos + 0.5 * group_pos);
        total_pos += group_pos;
        total_neg += group_neg;
        start = end;
    }

    if total_pos <= 0.0 || total_neg <= 0.0 {
        return Err(BoostError::numerical(
            "AUC is undefined when only one class is present",
        ));
    }
    Ok(area / (total_pos * total_neg))
}

fn class_index(label: Label, num_class: usize, row: usize) -> Result<usize> {
    if label < 0.0 || label.fract() != 0.0 || label as usize >= num_class {
        return Err(BoostError::dataset(format!(
            "label {} at row {} is not a class index in [0, {})",
            label, row, num_class
        )));
    }
    Ok(label as usize)
}

/// Multiclass negative log-likelihood.
pub fn mlogloss(
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    let num_class = preds.ncols();
    let classes = labels
        .iter()
        .enumerate()
        .map(|(i, &y)| class_index(y, num_class, i))
        .collect::<Result<Vec<_>>>()?;

    weighted_mean(labels.len(), weights, |i| {
        let p = (preds[[i, classes[i]]] as f64).max(PROB_EPSILON);
        -p.ln()
    })
}

/// Multiclass error rate.
pub fn merror(
    preds: &ArrayView2<'_, Score>,
    labels: &ArrayView1<'_, Label>,
    weights: Option<&ArrayView1<'_, Label>>,
) -> Result<f64> {
    let num_class = preds.ncols();
    let classes = labels
        .iter()
        .enumerate()
        .map(|(i, &y)| class_index(y, num_class, i))
        .collect::<Result<Vec<_>>>()?;

    weighted_mean(labels.len(), weights, |i| {
        let row = preds.row(i);
        let mut best = 0;
        for k in 1..num_class {
            if row[k] > row[best] {
                best = k;
            }
        }
        if best == classes[i] {
            0.0
        } else {
            1.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_logloss() {
        let preds = array![[0.9f32], [0.2]];
        let labels = array![1.0f32, 0.0];
        let v = logloss(&preds.view(), &labels.view(), None).unwrap();
        let expected = -(0.9f64.ln() + 0.8f64.ln()) / 2.0;
        assert_relative_eq!(v, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_error() {
        let preds = array![[0.9f32], [0.6], [0.1], [0.4]];
        let labels = array![1.0f32, 0.0, 0.0, 1.0];
        let v = error(&preds.view(), &labels.view(), None).unwrap();
        assert_relative_eq!(v, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_auc_perfect_and_inverted() {
        let labels = array![0.0f32, 0.0, 1.0, 1.0];

        let preds = array![[0.1f32], [0.2], [0.8], [0.9]];
        assert_relative_eq!(
            auc(&preds.view(), &labels.view(), None).unwrap(),
            1.0,
            epsilon = 1e-12
        );

        let preds = array![[0.9f32], [0.8], [0.2], [0.1]];
        assert_relative_eq!(
            auc(&preds.view(), &labels.view(), None).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_auc_ties_count_half() {
        let labels = array![0.0f32, 1.0];
        let preds = array![[0.5f32], [0.5]];
        assert_relative_eq!(
            auc(&preds.view(), &labels.view(), None).unwrap(),
            0.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_auc_single_class_fails() {
        let labels = array![1.0f32, 1.0];
        let preds = array![[0.3f32], [0.7]];
        assert!(auc(&preds.view(), &labels.view(), None).is_err());
    }

    #[test]
    fn test_multiclass_metrics() {
        let preds = array![[0.7f32, 0.2, 0.1], [0.1, 0.3, 0.6]];
        let labels = array![0.0f32, 1.0];

        let ll = mlogloss(&preds.view(), &labels.view(), None).unwrap();
        assert_relative_eq!(ll, -(0.7f64.ln() + 0.3f64.ln()) / 2.0, epsilon = 1e-6);

        let err = merror(&preds.view(), &labels.view(), None).unwrap();
        assert_relative_eq!(err, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_multiclass_rejects_out_of_range_label() {
        let preds = array![[0.5f32, 0.5]];
        let labels = array![2.0f32];
        assert!(mlogloss(&preds.view(), &labels.view(), None).is_err());
    }
}
