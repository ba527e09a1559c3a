//! Error types for the Norma 43 decoder.

use crate::model::Document;
use thiserror::Error;

/// Result type alias for decoder operations
pub type Result<T> = std::result::Result<T, Norma43Error>;

/// Errors that can occur while reading, decoding or rendering a statement.
///
/// Line numbers are 1-based positions in the input line sequence.
#[derive(Error, Debug)]
pub enum Norma43Error {
    /// The 2-character record code is not one of 11, 22, 23, 33 or 88
    #[error("Invalid line code {code:?} at line {line}")]
    InvalidLineCode { line: usize, code: String },

    /// A date field is not six digits, or its groups name an impossible
    /// date such as month 13 or 30 February. Out-of-range parts are rejected,
    /// never rolled over into the next month or year.
    #[error("Invalid date {value:?} at line {line}")]
    InvalidDate { line: usize, value: String },

    /// An amount, count or balance field is not numeric
    #[error("Invalid number in {field} at line {line}: {value:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// The line is shorter than the last field offset its record kind requires
    #[error("Truncated record at line {line}: expected at least {expected} characters, found {found}")]
    TruncatedRecord {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// The record sequence does not nest as header, movements, footer, end of file
    #[error("Malformed document at line {line}: {message}")]
    MalformedDocument { line: usize, message: String },

    /// An include/exclude pattern failed to compile
    #[error("Invalid {which} pattern: {source}")]
    InvalidPattern {
        which: &'static str,
        #[source]
        source: regex::Error,
    },

    /// A template selector names a field the record does not have
    #[error("Unknown {record} field {name:?} in template")]
    UnknownField { record: &'static str, name: String },

    /// The report separator is not a single ASCII character
    #[error("Separator {0:?} is not a single ASCII character")]
    InvalidSeparator(char),

    /// Failed to open or read the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write the delimited report
    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

/// A failed parse: the error that stopped it and everything decoded before it.
///
/// The parse is fail-fast, so `partial` holds every account opened up to the
/// offending line, including the (possibly footer-less) account being read.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct ParseFailure {
    #[source]
    pub error: Norma43Error,
    pub partial: Document,
}

impl ParseFailure {
    /// Discards the partial document and keeps the error.
    pub fn into_error(self) -> Norma43Error {
        self.error
    }
}

impl From<ParseFailure> for Norma43Error {
    fn from(failure: ParseFailure) -> Self {
        failure.error
    }
}
