//! Error types for budgetscope.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific failure conditions and keeps messages consistent
//! between the loader, the selection layer, and the aggregator.

use thiserror::Error;

/// Validation errors that occur when checking user-supplied selections.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Year {year} is outside the supported range [{min}, {max})")]
    YearOutOfRange {
        year: i64,
        min: u16,
        max: u16,
    },

    #[error("Constituency code '{code}' is not a well-formed GSS code")]
    MalformedConstituencyCode {
        code: String,
    },

    #[error("Unknown provision id '{id}'")]
    UnknownProvision {
        id: String,
    },
}

/// Data errors that occur while loading or parsing the impact table.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Input is empty: no header line found")]
    EmptyInput,

    #[error("Required column '{column}' is missing from the header")]
    MissingColumn {
        column: String,
    },

    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error type for the crate.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Channel disconnected: {path}")]
    Disconnected {
        /// Which stream disconnected.
        path: String,
    },
}

/// Convenience result alias used throughout the crate.
pub type BudgetResult<T> = Result<T, BudgetError>;
