//! Error types shared by the filter and the map renderer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input is empty, expected a header row")]
    EmptyInput,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: cannot parse {field} value '{value}' as a number")]
    InvalidCoordinate {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("minimum sample count '{0}' is not a non-negative integer")]
    InvalidThreshold(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
