//! Error handling and error types for boostfit.
//!
//! Every fallible operation in the crate returns [`Result`]. The fitness
//! adapter never inspects these errors: whatever the dataset constructor,
//! parameter parser, fold builder or booster reports is handed back to the
//! caller untouched.

use std::io;
use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum BoostError {
    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Dataset-related errors
    #[error("Dataset error: {message}")]
    Dataset { message: String },

    /// Training-related errors
    #[error("Training error: {message}")]
    Training { message: String },

    /// Cross-validation setup errors (degenerate folds and the like)
    #[error("Cross-validation error: {message}")]
    CrossValidation { message: String },

    /// Numerical computation errors (overflow, NaN)
    #[error("Numerical error: {message}")]
    Numerical { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// CSV parsing errors
    #[cfg(feature = "csv")]
    #[error("CSV parsing error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },

    /// Thread pool construction errors
    #[error("Threading error: {message}")]
    Threading { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using BoostError
pub type Result<T> = std::result::Result<T, BoostError>;

impl BoostError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        BoostError::Config {
            message: message.into(),
        }
    }

    /// Create a dataset error
    pub fn dataset<S: Into<String>>(message: S) -> Self {
        BoostError::Dataset {
            message: message.into(),
        }
    }

    /// Create a training error
    pub fn training<S: Into<String>>(message: S) -> Self {
        BoostError::Training {
            message: message.into(),
        }
    }

    /// Create a cross-validation error
    pub fn cross_validation<S: Into<String>>(message: S) -> Self {
        BoostError::CrossValidation {
            message: message.into(),
        }
    }

    /// Create a numerical error
    pub fn numerical<S: Into<String>>(message: S) -> Self {
        BoostError::Numerical {
            message: message.into(),
        }
    }

    /// Create a threading error
    pub fn threading<S: Into<String>>(message: S) -> Self {
        BoostError::Threading {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        BoostError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        BoostError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        BoostError::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// A genetic search can keep going after a recoverable error by assigning
    /// the candidate a worst-case fitness.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BoostError::Config { .. } => false,
            BoostError::Dataset { .. } => false,
            BoostError::Training { .. } => true,
            BoostError::CrossValidation { .. } => false,
            BoostError::Numerical { .. } => true,
            BoostError::IO { .. } => false,
            #[cfg(feature = "csv")]
            BoostError::Csv { .. } => false,
            BoostError::Json { .. } => false,
            BoostError::Toml { .. } => false,
            BoostError::Threading { .. } => true,
            BoostError::InvalidParameter { .. } => true,
            BoostError::DimensionMismatch { .. } => false,
            BoostError::Internal { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            BoostError::Config { .. } => "config",
            BoostError::Dataset { .. } => "dataset",
            BoostError::Training { .. } => "training",
            BoostError::CrossValidation { .. } => "cross_validation",
            BoostError::Numerical { .. } => "numerical",
            BoostError::IO { .. } => "io",
            #[cfg(feature = "csv")]
            BoostError::Csv { .. } => "csv",
            BoostError::Json { .. } => "json",
            BoostError::Toml { .. } => "toml",
            BoostError::Threading { .. } => "threading",
            BoostError::InvalidParameter { .. } => "invalid_parameter",
            BoostError::DimensionMismatch { .. } => "dimension_mismatch",
            BoostError::Internal { .. } => "internal",
        }
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::BoostError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::BoostError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! dataset_error {
    ($msg:expr) => {
        $crate::core::error::BoostError::dataset($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::BoostError::dataset(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! training_error {
    ($msg:expr) => {
        $crate::core::error::BoostError::training($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::BoostError::training(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
