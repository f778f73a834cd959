//! Training matrix container.
//!
//! A [`Dataset`] pairs a row-major feature matrix with its labels and
//! optional sample weights. Whatever value the caller uses to mark a missing
//! feature is rewritten to NaN on construction, so tree learners only ever
//! test `is_nan()`.

use crate::core::error::{BoostError, Result};
use crate::core::types::*;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Feature matrix with labels and optional weights.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature matrix (num_data × num_features)
    features: Array2<f32>,
    /// Target labels (num_data,)
    labels: Array1<Label>,
    /// Sample weights (optional)
    weights: Option<Array1<Label>>,
}

impl Dataset {
    /// Create a dataset, validating shapes and normalising missing values.
    ///
    /// `missing` is the sentinel marking absent feature values; `None` (or a
    /// NaN sentinel) leaves the matrix untouched.
    pub fn new(
        mut features: Array2<f32>,
        labels: Array1<Label>,
        weights: Option<Array1<Label>>,
        missing: Option<f32>,
    ) -> Result<Self> {
        let num_data = features.nrows();

        if num_data == 0 {
            return Err(BoostError::dataset("dataset has no rows"));
        }
        if features.ncols() == 0 {
            return Err(BoostError::dataset("dataset has no feature columns"));
        }
        if labels.len() != num_data {
            return Err(BoostError::dimension_mismatch(
                format!("labels length: {}", num_data),
                format!("labels length: {}", labels.len()),
            ));
        }
        if let Some(ref w) = weights {
            if w.len() != num_data {
                return Err(BoostError::dimension_mismatch(
                    format!("weights length: {}", num_data),
                    format!("weights length: {}", w.len()),
                ));
            }
            if w.iter().any(|&v| !(v >= 0.0) || !v.is_finite()) {
                return Err(BoostError::dataset(
                    "sample weights must be finite and non-negative",
                ));
            }
        }
        if labels.iter().any(|v| !v.is_finite()) {
            return Err(BoostError::dataset("labels must be finite"));
        }

        if let Some(sentinel) = missing.filter(|m| !m.is_nan()) {
            features.par_mapv_inplace(|v| if v == sentinel { f32::NAN } else { v });
        }
        // NaN marks a missing value; infinities have no split threshold.
        if let Some(((row, column), value)) = features
            .indexed_iter()
            .find(|(_, v)| v.is_infinite())
        {
            return Err(crate::dataset_error!(
                "feature {} at row {}, column {} is infinite",
                value,
                row,
                column
            ));
        }

        Ok(Dataset {
            features,
            labels,
            weights,
        })
    }

    /// Number of rows
    pub fn num_data(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns
    pub fn num_features(&self) -> usize {
        self.features.ncols()
    }

    /// Feature matrix view
    pub fn features(&self) -> ArrayView2<'_, f32> {
        self.features.view()
    }

    /// Label view
    pub fn labels(&self) -> ArrayView1<'_, Label> {
        self.labels.view()
    }

    /// Weight view, if weights were given
    pub fn weights(&self) -> Option<ArrayView1<'_, Label>> {
        self.weights.as_ref().map(|w| w.view())
    }

    /// Copy the given rows into a new dataset.
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.num_data()) {
            return Err(BoostError::dataset(format!(
                "row index {} out of bounds for {} rows",
                bad,
                self.num_data()
            )));
        }
        if indices.is_empty() {
            return Err(BoostError::dataset("cannot build an empty subset"));
        }

        Ok(Dataset {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
            weights: self.weights.as_ref().map(|w| w.select(Axis(0), indices)),
        })
    }
}
