// src/error.rs
//! Crate error type.
//!
//! Only structural problems are errors. "No feasible roster" and
//! "solver ran out of time" are ordinary outcomes (`optimize::Outcome`),
//! and an event source that failed is recorded as `ingest::SourceStatus`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Persisted catalog is missing a required field or has a bad value.
    /// `row` is the 1-based data row; 0 means the header row.
    #[error("Malformed catalog (row {row}): {reason}")]
    MalformedSource { row: usize, reason: String },

    /// Mandatory names that are not in the catalog (strict policy only).
    #[error("Unknown mandatory rider(s): {}", .0.join(", "))]
    UnknownMandatoryKey(Vec<String>),

    #[error("Invalid constraints: {0}")]
    InvalidConstraints(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
        Error::MalformedSource { row, reason: reason.into() }
    }
}
