//! Flexible date parsing shared by user and passport validation

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Accepted input formats, tried in this exact order. The order is part of
/// the contract: an ambiguous value like `01-02-2000` resolves to the first
/// matching format (here `%d-%m-%Y`, i.e. February 1st), never by guessing.
pub const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", // 2000-01-01
    "%d.%m.%Y", // 01.01.2000
    "%d/%m/%Y", // 01/01/2000
    "%d-%m-%Y", // 01-02-2000
    "%Y.%m.%d", // 2000.01.01
    "%Y/%m/%d", // 2000/01/01
];

static DATE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d./\- ]+$").expect("valid regex"));

/// Errors from parsing or range-checking a date field
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} contains invalid characters")]
    InvalidCharacters { field: &'static str },

    #[error(
        "{field} must be in one of the formats: \
         YYYY-MM-DD, DD.MM.YYYY, DD/MM/YYYY, DD-MM-YYYY, YYYY.MM.DD, YYYY/MM/DD"
    )]
    UnrecognizedFormat { field: &'static str },

    #[error("{field} cannot be in the future")]
    InFuture { field: &'static str },
}

/// Parse a date string against [`DATE_FORMATS`], first match wins.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, DateError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(DateError::Empty { field });
    }

    if !DATE_CHARS.is_match(value) {
        return Err(DateError::InvalidCharacters { field });
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }

    Err(DateError::UnrecognizedFormat { field })
}

/// Parse a date that must not be later than `today` (birth dates).
pub fn parse_date_not_in_future(
    field: &'static str,
    value: &str,
    today: NaiveDate,
) -> Result<NaiveDate, DateError> {
    let parsed = parse_date(field, value)?;

    if parsed > today {
        return Err(DateError::InFuture { field });
    }

    Ok(parsed)
}
