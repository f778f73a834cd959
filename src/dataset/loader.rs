//! CSV loading into a [`Dataset`].

use crate::core::error::{BoostError, Result};
use crate::dataset::Dataset;

use ndarray::{Array1, Array2};
use std::path::Path;

/// Options for reading a CSV file.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Zero-based column holding the label
    pub label_column: usize,
    /// Zero-based column holding sample weights, if any
    pub weight_column: Option<usize>,
    /// Whether the first record is a header
    pub has_header: bool,
    /// Value marking missing features (empty cells are always missing)
    pub missing: Option<f32>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            label_column: 0,
            weight_column: None,
            has_header: true,
            missing: None,
        }
    }
}

fn parse_cell(cell: &str, row: usize, column: usize) -> Result<f32> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("na") {
        return Ok(f32::NAN);
    }
    cell.parse().map_err(|_| {
        BoostError::dataset(format!(
            "cannot parse '{}' at row {}, column {}",
            cell, row, column
        ))
    })
}

/// Read a numeric CSV file. Every column other than the label and weight
/// columns becomes a feature, in file order.
pub fn load_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_header)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;

    let mut values: Vec<f32> = Vec::new();
    let mut labels: Vec<f32> = Vec::new();
    let mut weights: Vec<f32> = Vec::new();
    let mut num_features: Option<usize> = None;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if options.label_column >= record.len() {
            return Err(BoostError::dataset(format!(
                "label column {} missing in row {}",
                options.label_column, row
            )));
        }

        let mut row_features = 0;
        for (column, cell) in record.iter().enumerate() {
            if column == options.label_column {
                let label = parse_cell(cell, row, column)?;
                if label.is_nan() {
                    return Err(BoostError::dataset(format!("missing label in row {}", row)));
                }
                labels.push(label);
            } else if Some(column) == options.weight_column {
                weights.push(parse_cell(cell, row, column)?);
            } else {
                values.push(parse_cell(cell, row, column)?);
                row_features += 1;
            }
        }

        match num_features {
            None => num_features = Some(row_features),
            Some(n) if n != row_features => {
                return Err(BoostError::dimension_mismatch(
                    format!("{} features", n),
                    format!("{} features in row {}", row_features, row),
                ))
            }
            Some(_) => {}
        }
    }

    let num_features =
        num_features.ok_or_else(|| BoostError::dataset("CSV file contains no records"))?;
    let num_data = labels.len();
    let features = Array2::from_shape_vec((num_data, num_features), values)
        .map_err(|e| BoostError::internal(format!("feature matrix shape: {}", e)))?;
    let weights = options.weight_column.map(|_| Array1::from_vec(weights));

    log::debug!(
        "Loaded CSV with {} rows and {} features",
        num_data,
        num_features
    );

    Dataset::new(features, Array1::from_vec(labels), weights, options.missing)
}
