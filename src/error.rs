use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Caller data does not have the width the model or stats were built for.
    #[error("{context}: expected {expected} columns, got {got}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("dataset has {features} feature rows but {targets} targets")]
    LengthMismatch { features: usize, targets: usize },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("row {row}, column {column}: '{value}' is not a number")]
    ParseNumber {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("row {row} has no column {column}")]
    MissingColumn { row: usize, column: usize },

    #[error("column {column} has no values to impute from")]
    NoValues { column: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
