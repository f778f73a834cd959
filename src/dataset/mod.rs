//! Dataset management for boostfit.
//!
//! - [`Dataset`]: in-memory feature matrix, labels and weights
//! - [`loader`]: CSV ingestion (behind the `csv` feature)

#[allow(clippy::module_inception)]
pub mod dataset;
#[cfg(feature = "csv")]
#[cfg_attr(docsrs, doc(cfg(feature = "csv")))]
pub mod loader;

pub use dataset::Dataset;
#[cfg(feature = "csv")]
pub use loader::{load_csv, CsvOptions};
