//! Passport field validation

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::dates::{self, DateError};

/// Errors that can occur during passport validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PassportValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("passport_series must be exactly {0} characters long")]
    SeriesLength(usize),

    #[error("passport_series must contain only digits and cannot start with zero")]
    SeriesFormat,

    #[error("passport_number must be exactly {0} characters long")]
    NumberLength(usize),

    #[error("passport_number must contain only digits")]
    NumberFormat,

    #[error(transparent)]
    Date(#[from] DateError),

    #[error("receipt_date cannot be before birth_date")]
    ReceiptBeforeBirth,

    #[error("passport id cannot be empty")]
    EmptyId,

    #[error("'{0}' is not a valid passport id")]
    MalformedId(String),
}

pub const SERIES_LENGTH: usize = 4;
pub const NUMBER_LENGTH: usize = 6;

static SERIES_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]{3}$").expect("valid regex"));
static NUMBER_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{6}$").expect("valid regex"));

/// Validate a passport series: 4 digits, first non-zero. The result is
/// uppercased, a no-op for digits but kept for alphanumeric series variants.
pub fn validate_passport_series(value: &str) -> Result<String, PassportValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(PassportValidationError::EmptyField("passport_series"));
    }

    if value.chars().count() != SERIES_LENGTH {
        return Err(PassportValidationError::SeriesLength(SERIES_LENGTH));
    }

    if !SERIES_FORMAT.is_match(value) {
        return Err(PassportValidationError::SeriesFormat);
    }

    Ok(value.to_uppercase())
}

/// Validate a passport number: exactly 6 digits
pub fn validate_passport_number(value: &str) -> Result<String, PassportValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(PassportValidationError::EmptyField("passport_number"));
    }

    if value.chars().count() != NUMBER_LENGTH {
        return Err(PassportValidationError::NumberLength(NUMBER_LENGTH));
    }

    if !NUMBER_FORMAT.is_match(value) {
        return Err(PassportValidationError::NumberFormat);
    }

    Ok(value.to_string())
}

/// Parse a receipt date; unlike birth dates, future dates are allowed
pub fn validate_receipt_date(value: &str) -> Result<NaiveDate, PassportValidationError> {
    Ok(dates::parse_date("receipt_date", value)?)
}

/// Parse a birth date (must not be after `today`)
pub fn validate_birth_date(
    value: &str,
    today: NaiveDate,
) -> Result<NaiveDate, PassportValidationError> {
    Ok(dates::parse_date_not_in_future("birth_date", value, today)?)
}

/// The receipt date must not precede the birth date; equal dates are fine
pub fn check_date_order(
    birth_date: NaiveDate,
    receipt_date: NaiveDate,
) -> Result<(), PassportValidationError> {
    if receipt_date < birth_date {
        return Err(PassportValidationError::ReceiptBeforeBirth);
    }
    Ok(())
}
