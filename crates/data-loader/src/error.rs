//! Error types for the data-loader crate.
//!
//! Every variant aborts the load: there is no partial-table recovery, a
//! single bad row fails the whole file.

use thiserror::Error;

/// Errors that can occur while loading and aggregating transactions
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The csv reader itself failed (bad quoting, invalid UTF-8, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header row doesn't name exactly the expected columns
    #[error("Invalid header: expected columns [{expected}] but found [{found}]")]
    InvalidHeader { expected: String, found: String },

    /// A row failed to parse: missing field, bad date, bad amount
    ///
    /// `line` is the 1-based line number in the source file, header included.
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// No transactions at all, so there are no customers to score
    #[error("No transactions supplied")]
    EmptyInput,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
