//! Core trait definitions for boostfit.
//!
//! Two seams live here: [`ObjectiveFunction`], which the boosters call to turn
//! margins into gradients, and [`FitnessModel`], which is what an outer
//! hyperparameter search sees of a model.

use crate::core::error::Result;
use crate::core::types::*;
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2};
use std::fmt::Debug;

/// Trait for objective functions that compute gradients and hessians.
///
/// Margins, gradients and hessians are laid out as `(num_data,
/// num_output_groups)`; single-output objectives use one column.
pub trait ObjectiveFunction: Send + Sync + Debug {
    /// Compute first and second order gradients of the loss at `margins`.
    fn compute_gradients(
        &self,
        margins: &ArrayView2<'_, Score>,
        labels: &ArrayView1<'_, Label>,
        weights: Option<&ArrayView1<'_, Label>>,
        gradients: &mut ArrayViewMut2<'_, Score>,
        hessians: &mut ArrayViewMut2<'_, Score>,
    ) -> Result<()>;

    /// Transform raw margins into the user-facing prediction.
    fn pred_transform(&self, margins: &ArrayView2<'_, Score>) -> Array2<Score>;

    /// Transform raw margins into what evaluation metrics consume.
    fn eval_transform(&self, margins: &ArrayView2<'_, Score>) -> Array2<Score> {
        self.pred_transform(margins)
    }

    /// Convert the configured base score into a starting margin.
    fn prob_to_margin(&self, base_score: f64) -> Result<f64> {
        Ok(base_score)
    }

    /// Number of margins produced per row.
    fn num_output_groups(&self) -> usize {
        1
    }

    /// Objective name as accepted by the `objective` parameter.
    fn name(&self) -> &'static str;

    /// Validate labels for this objective function.
    fn validate_labels(&self, labels: &ArrayView1<'_, Label>) -> Result<()>;

    /// Default evaluation metric for this objective.
    fn default_metric(&self) -> MetricType;
}

/// A model that can score one hyperparameter configuration.
///
/// A genetic search holds one implementor per candidate and reads the
/// returned fitness; what happens inside is the implementor's business.
pub trait FitnessModel {
    /// Training features the model was built with.
    fn x_train(&self) -> ArrayView2<'_, f32>;

    /// Training labels the model was built with.
    fn y_train(&self) -> ArrayView1<'_, f32>;

    /// Run cross-validation and return the mean validation metric.
    fn cross_validate(&mut self) -> Result<f64>;
}
