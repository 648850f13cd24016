//! Date formatting.
//!
//! A property may carry a [`DatePattern`] written with the familiar letter
//! syntax (`dd-MM-yyyy hh:mm:ss`). Without a pattern, date-time values use
//! ISO-8601 (`2021-11-05T02:30:00`), and integer inputs are read as epoch
//! milliseconds.

// -----------------------------------------------------------------------------
// Modules

mod date_pattern;

// -----------------------------------------------------------------------------
// Exports

pub use date_pattern::DatePattern;

use chrono::{DateTime, NaiveDateTime};
use thiserror::Error;

// -----------------------------------------------------------------------------
// FormatError

/// A pattern that cannot be compiled, or a value that cannot be rendered or
/// parsed with it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FormatError {
    #[error("unsupported letter `{letter}` in pattern `{pattern}`")]
    UnsupportedLetter { pattern: String, letter: char },

    #[error("unterminated quote in pattern `{0}`")]
    UnterminatedQuote(String),

    #[error("pattern `{0}` has no date fields")]
    MissingDate(String),

    #[error("pattern `{pattern}` cannot render a {found} value")]
    NotTemporal { pattern: String, found: &'static str },

    #[error("failed to render a value with pattern `{0}`")]
    Render(String),

    #[error("`{text}` does not match pattern `{pattern}`: {source}")]
    Parse {
        text: String,
        pattern: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("epoch milliseconds {0} are out of range")]
    OutOfRange(i64),
}

// -----------------------------------------------------------------------------
// ISO-8601

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const ISO_SPACED: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Renders a date-time as ISO-8601 without offset.
pub fn format_iso(value: &NaiveDateTime) -> String {
    value.format(ISO_FORMAT).to_string()
}

/// Parses ISO-8601 without offset; a space may stand in for the `T`.
pub fn parse_iso(text: &str) -> Result<NaiveDateTime, FormatError> {
    NaiveDateTime::parse_from_str(text, ISO_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, ISO_SPACED))
        .map_err(|source| FormatError::Parse {
            text: text.to_owned(),
            pattern: ISO_FORMAT.to_owned(),
            source,
        })
}

/// Converts epoch milliseconds (UTC) to a date-time.
pub fn from_epoch_millis(millis: i64) -> Result<NaiveDateTime, FormatError> {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .ok_or(FormatError::OutOfRange(millis))
}
