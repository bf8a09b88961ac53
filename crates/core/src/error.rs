//! Conversion error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `ConvertError`.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting a sales report into a return.
///
/// Line numbers are 1-based physical lines of the source, so the header
/// row is line 1 and the first sale is line 2.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required column is absent from the header or from a row.
    #[error("Missing field '{column}' at line {line}")]
    MissingField {
        /// Column name.
        column: String,
        /// Source line.
        line: u64,
    },

    /// A numeric column holds text that is not a decimal number.
    #[error("Invalid number in '{column}' at line {line}: {value:?}")]
    Parse {
        /// Column name.
        column: String,
        /// Source line.
        line: u64,
        /// Raw cell content.
        value: String,
    },

    /// The sales report could not be opened.
    #[error("Could not open input file '{}': {source}", path.display())]
    SourceUnavailable {
        /// Path that was tried.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The delimited input itself is malformed.
    #[error("Malformed input: {0}")]
    Csv(#[from] csv::Error),

    /// Rows name different sellers and mixing is not allowed.
    #[error("Mixed seller GSTINs: '{first}' and '{other}' (line {line})")]
    MixedFilers {
        /// Seller seen first.
        first: String,
        /// Conflicting seller.
        other: String,
        /// Line of the conflicting row.
        line: u64,
    },

    /// An amount or running total left the representable range.
    #[error("Amount out of range for '{field}'")]
    AmountOutOfRange {
        /// Output field name.
        field: &'static str,
    },
}

impl ConvertError {
    /// Returns true if the input could not be read at all.
    #[must_use]
    pub const fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}
